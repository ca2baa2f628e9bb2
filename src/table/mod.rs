//! Campaign table view model — filtering, sorting and pagination.
//!
//! The core is the pure reducer [`view`]: given the full record set and the
//! current [`FilterState`], [`SortState`] and [`PageState`] it returns the
//! rows of the requested page plus [`PageMeta`]. Nothing here renders.
//!
//! [`TableState`] wraps the reducer with the user actions the dashboard
//! exposes (typing a query, toggling a status, clicking a column header,
//! paging). Any filter change sends the user back to page 1, and the
//! reducer clamps a stale page number into range.

pub mod csv;
pub mod query;

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::campaign::{Campaign, CampaignField, CampaignStatus};
use crate::format;

pub use query::TableQuery;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 5;

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Inclusive start-date window. Only applied when both bounds are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => true,
        }
    }
}

/// Combined predicate configuration. All predicates are ANDed; an empty
/// query or empty selection set means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub query: String,
    pub date_range: DateRange,
    pub statuses: BTreeSet<CampaignStatus>,
    pub platforms: BTreeSet<String>,
}

impl FilterState {
    /// Whether a record passes every active predicate.
    pub fn matches(&self, campaign: &Campaign) -> bool {
        self.matches_text(campaign)
            && self.date_range.contains(campaign.start_date)
            && self.matches_status(campaign)
            && self.matches_platform(campaign)
    }

    /// Case-insensitive substring match against every field's string form.
    pub fn matches_text(&self, campaign: &Campaign) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        campaign
            .fields()
            .any(|(_, value)| value.to_string().to_lowercase().contains(&needle))
    }

    pub fn matches_status(&self, campaign: &Campaign) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&campaign.status)
    }

    pub fn matches_platform(&self, campaign: &Campaign) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&campaign.platform)
    }

    /// Number of filter groups currently narrowing the table (shown as a
    /// badge on the filter button).
    pub fn active_count(&self) -> usize {
        [
            !self.query.is_empty(),
            self.date_range.start.is_some(),
            !self.statuses.is_empty(),
            !self.platforms.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// Single-column sort. `field == None` keeps the source order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: Option<CampaignField>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(field: CampaignField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    /// Header click: the active column flips direction, a new column starts
    /// ascending.
    pub fn request(&mut self, field: CampaignField) {
        if self.field == Some(field) {
            self.direction = self.direction.flipped();
        } else {
            self.field = Some(field);
            self.direction = SortDirection::Ascending;
        }
    }

    fn compare(&self, a: &Campaign, b: &Campaign) -> Ordering {
        let Some(field) = self.field else {
            return Ordering::Equal;
        };
        let ord = a.field(field).compare(&b.field(field));
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub page: usize,
    pub page_size: usize,
}

impl PageState {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// First page with the given size.
    pub fn first(page_size: usize) -> Self {
        Self::new(1, page_size)
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// Pagination summary for one rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// The page actually returned (after clamping).
    pub page: usize,
    pub page_size: usize,
    /// `ceil(filtered_count / page_size)`; zero when nothing matches.
    pub total_pages: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    /// 1-based index of the first row shown, or 0 for an empty page.
    pub first_row: usize,
    /// 1-based index of the last row shown, or 0 for an empty page.
    pub last_row: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageMeta {
    /// `"Showing 1 to 5 of 8 results"`.
    pub fn summary(&self) -> String {
        format!(
            "Showing {} to {} of {} results",
            self.first_row, self.last_row, self.filtered_count
        )
    }
}

/// One page of the table.
#[derive(Debug, Clone, Serialize)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a Campaign>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

/// Apply filters, then a stable sort. The result borrows from `records`.
pub fn filter_and_sort<'a>(
    records: &'a [Campaign],
    filters: &FilterState,
    sort: &SortState,
) -> Vec<&'a Campaign> {
    let mut rows: Vec<&Campaign> = records.iter().filter(|c| filters.matches(c)).collect();
    if sort.field.is_some() {
        // `sort_by` is stable, so equal keys keep their source order.
        rows.sort_by(|a, b| sort.compare(a, b));
    }
    rows
}

/// Produce the requested page of filtered, sorted records.
///
/// A page beyond the last one is clamped to the last page (or page 1 when
/// nothing matches).
pub fn view<'a>(
    records: &'a [Campaign],
    filters: &FilterState,
    sort: &SortState,
    page: PageState,
) -> TablePage<'a> {
    let filtered = filter_and_sort(records, filters, sort);
    let page_size = page.page_size.max(1);
    let filtered_count = filtered.len();
    let total_pages = filtered_count.div_ceil(page_size);
    let current = page.page.clamp(1, total_pages.max(1));

    let start = ((current - 1) * page_size).min(filtered_count);
    let end = (start + page_size).min(filtered_count);
    let rows = filtered[start..end].to_vec();

    let (first_row, last_row) = if rows.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    TablePage {
        rows,
        meta: PageMeta {
            page: current,
            page_size,
            total_pages,
            filtered_count,
            total_count: records.len(),
            first_row,
            last_row,
            has_previous: current > 1,
            has_next: current < total_pages,
        },
    }
}

// ---------------------------------------------------------------------------
// Filter options
// ---------------------------------------------------------------------------

/// One entry of a multi-select filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    /// Number of records carrying this value.
    pub count: usize,
}

/// Status options with per-status record counts.
pub fn status_options(records: &[Campaign]) -> Vec<FilterOption> {
    CampaignStatus::ALL
        .iter()
        .map(|status| FilterOption {
            value: status.as_str().to_string(),
            label: format::capitalize(status.as_str()),
            count: records.iter().filter(|c| c.status == *status).count(),
        })
        .collect()
}

/// Platform options in first-seen order with per-platform record counts.
pub fn platform_options(records: &[Campaign]) -> Vec<FilterOption> {
    let mut options: Vec<FilterOption> = Vec::new();
    for campaign in records {
        match options.iter_mut().find(|o| o.value == campaign.platform) {
            Some(option) => option.count += 1,
            None => options.push(FilterOption {
                value: campaign.platform.clone(),
                label: campaign.platform.clone(),
                count: 1,
            }),
        }
    }
    options
}

// ---------------------------------------------------------------------------
// Stateful table
// ---------------------------------------------------------------------------

/// The campaign table with its interactive state.
#[derive(Debug, Clone)]
pub struct TableState {
    records: Vec<Campaign>,
    pub filters: FilterState,
    pub sort: SortState,
    pub page: PageState,
}

impl TableState {
    pub fn new(records: Vec<Campaign>, page_size: usize) -> Self {
        Self {
            records,
            filters: FilterState::default(),
            sort: SortState::default(),
            page: PageState::first(page_size),
        }
    }

    pub fn records(&self) -> &[Campaign] {
        &self.records
    }

    /// Current page of rows and its metadata.
    pub fn view(&self) -> TablePage<'_> {
        view(&self.records, &self.filters, &self.sort, self.page)
    }

    /// Every row that passes the filters, in sort order (export source).
    pub fn filtered(&self) -> Vec<&Campaign> {
        filter_and_sort(&self.records, &self.filters, &self.sort)
    }

    pub fn set_query(&mut self, query: &str) {
        self.filters.query = query.to_string();
        self.reset_page();
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.filters.date_range = range;
        self.reset_page();
    }

    pub fn toggle_status(&mut self, status: CampaignStatus) {
        if !self.filters.statuses.remove(&status) {
            self.filters.statuses.insert(status);
        }
        self.reset_page();
    }

    pub fn toggle_platform(&mut self, platform: &str) {
        if !self.filters.platforms.remove(platform) {
            self.filters.platforms.insert(platform.to_string());
        }
        self.reset_page();
    }

    /// Replace every filter at once (API requests carry the full state).
    pub fn set_filters(&mut self, filters: FilterState) {
        if filters != self.filters {
            self.filters = filters;
            self.reset_page();
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterState::default();
        self.reset_page();
    }

    pub fn request_sort(&mut self, field: CampaignField) {
        self.sort.request(field);
    }

    pub fn next_page(&mut self) {
        let meta = self.view().meta;
        if meta.has_next {
            self.page.page = meta.page + 1;
        }
    }

    pub fn previous_page(&mut self) {
        let meta = self.view().meta;
        if meta.has_previous {
            self.page.page = meta.page - 1;
        }
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page.page = page.max(1);
    }

    pub fn status_options(&self) -> Vec<FilterOption> {
        status_options(&self.records)
    }

    pub fn platform_options(&self) -> Vec<FilterOption> {
        platform_options(&self.records)
    }

    fn reset_page(&mut self) {
        self.page.page = 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::mock;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_filters_keep_everything() {
        let records = mock::campaigns();
        let rows = filter_and_sort(&records, &FilterState::default(), &SortState::default());
        assert_eq!(rows.len(), records.len());
        assert_eq!(rows[0].name, "Black Friday");
    }

    #[test]
    fn text_search_is_case_insensitive_across_fields() {
        let records = mock::campaigns();
        let filters = FilterState {
            query: "INSTAGRAM".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(&records, &filters, &SortState::default()).len(), 2);

        // Numbers are searchable through their string form.
        let filters = FilterState {
            query: "73200".to_string(),
            ..Default::default()
        };
        let rows = filter_and_sort(&records, &filters, &SortState::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Black Friday");
    }

    #[test]
    fn date_range_needs_both_bounds() {
        let records = mock::campaigns();
        let only_start = FilterState {
            date_range: DateRange::new(Some(ymd(2030, 1, 1)), None),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(&records, &only_start, &SortState::default()).len(), 8);

        let december = FilterState {
            date_range: DateRange::new(Some(ymd(2024, 12, 1)), Some(ymd(2024, 12, 26))),
            ..Default::default()
        };
        let names: Vec<_> = filter_and_sort(&records, &december, &SortState::default())
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        // Bounds are inclusive: Holiday Special starts on the 1st, New Year on the 26th.
        assert_eq!(names, vec!["Holiday Special", "Cyber Monday", "New Year"]);
    }

    #[test]
    fn status_and_platform_sets_are_anded() {
        let records = mock::campaigns();
        let filters = FilterState {
            statuses: [CampaignStatus::Active].into_iter().collect(),
            platforms: ["Google Ads".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let names: Vec<_> = filter_and_sort(&records, &filters, &SortState::default())
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["New Year", "Valentine's Day"]);
    }

    #[test]
    fn sort_request_toggles_and_resets() {
        let mut sort = SortState::default();
        sort.request(CampaignField::Budget);
        assert_eq!(sort, SortState::by(CampaignField::Budget, SortDirection::Ascending));
        sort.request(CampaignField::Budget);
        assert_eq!(sort.direction, SortDirection::Descending);
        sort.request(CampaignField::Budget);
        assert_eq!(sort.direction, SortDirection::Ascending);
        sort.request(CampaignField::Budget);
        assert_eq!(sort.direction, SortDirection::Descending);
        sort.request(CampaignField::Name);
        assert_eq!(sort, SortState::by(CampaignField::Name, SortDirection::Ascending));
    }

    #[test]
    fn numeric_sort_is_numeric_not_lexicographic() {
        let records = mock::campaigns();
        let sort = SortState::by(CampaignField::Budget, SortDirection::Descending);
        let rows = filter_and_sort(&records, &FilterState::default(), &sort);
        let budgets: Vec<f64> = rows.iter().map(|c| c.budget).collect();
        assert_eq!(budgets[0], 75_000.0);
        assert_eq!(budgets[7], 25_000.0);
    }

    #[test]
    fn descending_sort_keeps_ties_in_source_order() {
        let records = mock::campaigns();
        let sort = SortState::by(CampaignField::Platform, SortDirection::Descending);
        let rows = filter_and_sort(&records, &FilterState::default(), &sort);
        let instagram: Vec<_> = rows
            .iter()
            .take_while(|c| c.platform == "Instagram Ads")
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(instagram, vec!["Summer Sale", "Back to School"]);
    }

    #[test]
    fn pagination_metadata() {
        let records = mock::campaigns();
        let page = view(
            &records,
            &FilterState::default(),
            &SortState::default(),
            PageState::new(2, 5),
        );
        assert_eq!(page.meta.total_pages, 2);
        assert_eq!(page.rows.len(), 3);
        assert_eq!(page.meta.first_row, 6);
        assert_eq!(page.meta.last_row, 8);
        assert!(page.meta.has_previous);
        assert!(!page.meta.has_next);
        assert_eq!(page.meta.summary(), "Showing 6 to 8 of 8 results");
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let records = mock::campaigns();
        let page = view(
            &records,
            &FilterState::default(),
            &SortState::default(),
            PageState::new(9, 5),
        );
        assert_eq!(page.meta.page, 2);
        assert_eq!(page.rows.len(), 3);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let records = mock::campaigns();
        let filters = FilterState {
            query: "no such campaign".to_string(),
            ..Default::default()
        };
        let page = view(&records, &filters, &SortState::default(), PageState::default());
        assert_eq!(page.meta.total_pages, 0);
        assert_eq!(page.meta.page, 1);
        assert!(page.rows.is_empty());
        assert_eq!(page.meta.first_row, 0);
        assert!(!page.meta.has_next);
    }

    #[test]
    fn filter_change_resets_page() {
        let mut table = TableState::new(mock::campaigns(), 5);
        table.next_page();
        assert_eq!(table.page.page, 2);
        table.toggle_platform("Google Ads");
        assert_eq!(table.page.page, 1);
        assert_eq!(table.view().meta.filtered_count, 4);
    }

    #[test]
    fn paging_stops_at_bounds() {
        let mut table = TableState::new(mock::campaigns(), 5);
        table.previous_page();
        assert_eq!(table.page.page, 1);
        table.next_page();
        table.next_page();
        assert_eq!(table.page.page, 2);
    }

    #[test]
    fn active_filter_count() {
        let mut table = TableState::new(mock::campaigns(), 5);
        assert_eq!(table.filters.active_count(), 0);
        table.set_query("sale");
        table.toggle_status(CampaignStatus::Completed);
        assert_eq!(table.filters.active_count(), 2);
        table.toggle_status(CampaignStatus::Completed);
        assert_eq!(table.filters.active_count(), 1);
        table.clear_filters();
        assert!(table.filters.is_empty());
    }

    #[test]
    fn options_carry_counts() {
        let records = mock::campaigns();
        let statuses = status_options(&records);
        assert_eq!(statuses[0].value, "active");
        assert_eq!(statuses[0].label, "Active");
        assert_eq!(statuses[0].count, 3);
        assert_eq!(statuses[1].count, 5);
        assert_eq!(statuses[2].count, 0);

        let platforms = platform_options(&records);
        let counts: Vec<_> = platforms.iter().map(|o| (o.value.as_str(), o.count)).collect();
        assert_eq!(
            counts,
            vec![("Google Ads", 4), ("Facebook Ads", 2), ("Instagram Ads", 2)]
        );
    }
}
