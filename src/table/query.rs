//! Table state as carried by a CLI invocation or an API query string.

use anyhow::{Context, Result, bail};

use super::{DateRange, FilterState, SortDirection, SortState, TableState};
use crate::campaign::{CampaignField, CampaignStatus, parse_date};

/// Unvalidated filter/sort/page request. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    pub search: Option<String>,
    pub statuses: Vec<String>,
    pub platforms: Vec<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<usize>,
}

impl TableQuery {
    /// Build from decoded `key=value` pairs. Unknown keys are ignored;
    /// `status` and `platform` may repeat.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key {
                "search" | "q" => query.search = Some(value.to_string()),
                "status" => query.statuses.push(value.to_string()),
                "platform" => query.platforms.push(value.to_string()),
                "from" => query.from = Some(value.to_string()),
                "to" => query.to = Some(value.to_string()),
                "sort" => query.sort = Some(value.to_string()),
                "dir" => query.direction = Some(value.to_string()),
                "page" => {
                    let page = value
                        .parse()
                        .with_context(|| format!("invalid page '{value}'"))?;
                    query.page = Some(page);
                }
                _ => {}
            }
        }
        Ok(query)
    }

    /// Validate into filter and sort state.
    pub fn resolve(&self) -> Result<(FilterState, SortState)> {
        let statuses = self
            .statuses
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<CampaignStatus>())
            .collect::<Result<_>>()?;

        let start = self.from.as_deref().filter(|s| !s.is_empty()).map(parse_date).transpose()?;
        let end = self.to.as_deref().filter(|s| !s.is_empty()).map(parse_date).transpose()?;
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            bail!("date range starts after it ends ({start} > {end})");
        }

        let filters = FilterState {
            query: self.search.clone().unwrap_or_default(),
            date_range: DateRange::new(start, end),
            statuses,
            platforms: self
                .platforms
                .iter()
                .filter(|p| !p.is_empty())
                .cloned()
                .collect(),
        };

        let direction = match self.direction.as_deref() {
            None | Some("") => SortDirection::Ascending,
            Some(raw) => SortDirection::parse(raw)
                .with_context(|| format!("invalid sort direction '{raw}' (expected asc or desc)"))?,
        };
        let sort = match self.sort.as_deref() {
            None | Some("") => SortState::default(),
            Some(raw) => SortState::by(raw.parse::<CampaignField>()?, direction),
        };

        Ok((filters, sort))
    }

    /// Validate, then load the result into `table`. Nothing changes on
    /// error.
    pub fn apply(&self, table: &mut TableState) -> Result<()> {
        let (filters, sort) = self.resolve()?;
        table.set_filters(filters);
        table.sort = sort;
        if let Some(page) = self.page {
            table.go_to_page(page);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::mock;

    #[test]
    fn pairs_collect_repeated_keys() {
        let query = TableQuery::from_pairs([
            ("status", "active"),
            ("status", "paused"),
            ("platform", "Google Ads"),
            ("sort", "budget"),
            ("dir", "desc"),
            ("page", "2"),
            ("unknown", "x"),
        ])
        .unwrap();
        assert_eq!(query.statuses, ["active", "paused"]);
        assert_eq!(query.platforms, ["Google Ads"]);
        assert_eq!(query.page, Some(2));
    }

    #[test]
    fn bad_page_is_rejected() {
        assert!(TableQuery::from_pairs([("page", "two")]).is_err());
    }

    #[test]
    fn resolve_validates_values() {
        let bad_status = TableQuery {
            statuses: vec!["archived".to_string()],
            ..Default::default()
        };
        assert!(bad_status.resolve().is_err());

        let bad_sort = TableQuery {
            sort: Some("colour".to_string()),
            ..Default::default()
        };
        assert!(bad_sort.resolve().is_err());

        let backwards = TableQuery {
            from: Some("2024-12-31".to_string()),
            to: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert!(backwards.resolve().is_err());
    }

    #[test]
    fn apply_sets_table_state() {
        let mut table = TableState::new(mock::campaigns(), 5);
        let query = TableQuery {
            platforms: vec!["Google Ads".to_string()],
            sort: Some("budget".to_string()),
            direction: Some("desc".to_string()),
            ..Default::default()
        };
        query.apply(&mut table).unwrap();

        let page = table.view();
        assert_eq!(page.meta.filtered_count, 4);
        assert_eq!(page.rows[0].name, "Black Friday");
        assert_eq!(table.sort.direction, SortDirection::Descending);
    }

    #[test]
    fn failed_apply_leaves_table_alone() {
        let mut table = TableState::new(mock::campaigns(), 5);
        table.set_query("black");
        let query = TableQuery {
            search: Some("cyber".to_string()),
            sort: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(query.apply(&mut table).is_err());
        assert_eq!(table.filters.query, "black");
    }
}
