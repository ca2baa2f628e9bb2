//! Campaign records — the rows behind the dashboard table.
//!
//! A [`Campaign`] is a typed row, but the table engine treats it as a list
//! of named fields: [`Campaign::fields`] yields each [`CampaignField`] with a
//! [`FieldValue`] whose `Display` output is the field's string
//! representation (used by text search and CSV export).

pub mod mock;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle state of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Completed,
    Paused,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 3] = [Self::Active, Self::Completed, Self::Paused];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "paused" => Ok(Self::Paused),
            other => bail!("unknown campaign status '{other}' (expected active, completed or paused)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// A named column of the campaign table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignField {
    Name,
    Platform,
    Status,
    Budget,
    Spent,
    Impressions,
    Clicks,
    Conversions,
    Ctr,
    Cpc,
    Cpa,
    StartDate,
    EndDate,
}

impl CampaignField {
    /// All columns in table order.
    pub const ALL: [CampaignField; 13] = [
        Self::Name,
        Self::Platform,
        Self::Status,
        Self::Budget,
        Self::Spent,
        Self::Impressions,
        Self::Clicks,
        Self::Conversions,
        Self::Ctr,
        Self::Cpc,
        Self::Cpa,
        Self::StartDate,
        Self::EndDate,
    ];

    /// The column key used in CSV headers, query strings and JSON.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Platform => "platform",
            Self::Status => "status",
            Self::Budget => "budget",
            Self::Spent => "spent",
            Self::Impressions => "impressions",
            Self::Clicks => "clicks",
            Self::Conversions => "conversions",
            Self::Ctr => "ctr",
            Self::Cpc => "cpc",
            Self::Cpa => "cpa",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
        }
    }

    /// Header label shown above the column.
    pub fn label(&self) -> String {
        crate::format::column_label(self.key())
    }
}

impl fmt::Display for CampaignField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CampaignField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        // Also accept camelCase (`startDate`).
        let wanted = match wanted.as_str() {
            "startdate" => "start_date".to_string(),
            "enddate" => "end_date".to_string(),
            _ => wanted,
        };
        Self::ALL
            .into_iter()
            .find(|field| field.key() == wanted)
            .ok_or_else(|| anyhow::anyhow!("unknown campaign field '{s}'"))
    }
}

/// A single field value borrowed from a campaign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Date(NaiveDate),
}

impl FieldValue<'_> {
    /// Total ordering within one column: numbers numerically, text
    /// lexicographically, dates chronologically.
    pub fn compare(&self, other: &FieldValue<'_>) -> Ordering {
        match (self, other) {
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
            // Mixed kinds never occur within one column; fall back to text.
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

// ---------------------------------------------------------------------------
// Campaign
// ---------------------------------------------------------------------------

/// One campaign's performance row.
///
/// Rates are derived at construction and rounded to two decimals; a rate
/// whose denominator is zero is `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub name: String,
    pub platform: String,
    pub status: CampaignStatus,
    pub budget: f64,
    pub spent: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    /// Click-through rate in percent.
    pub ctr: f64,
    /// Cost per click.
    pub cpc: f64,
    /// Cost per acquisition.
    pub cpa: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Campaign {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        platform: &str,
        status: CampaignStatus,
        budget: f64,
        spent: f64,
        impressions: u64,
        clicks: u64,
        conversions: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.to_string(),
            platform: platform.to_string(),
            status,
            budget,
            spent,
            impressions,
            clicks,
            conversions,
            ctr: ratio(clicks as f64 * 100.0, impressions as f64),
            cpc: ratio(spent, clicks as f64),
            cpa: ratio(spent, conversions as f64),
            start_date,
            end_date,
        }
    }

    /// Value of a single column.
    pub fn field(&self, field: CampaignField) -> FieldValue<'_> {
        match field {
            CampaignField::Name => FieldValue::Text(&self.name),
            CampaignField::Platform => FieldValue::Text(&self.platform),
            CampaignField::Status => FieldValue::Text(self.status.as_str()),
            CampaignField::Budget => FieldValue::Number(self.budget),
            CampaignField::Spent => FieldValue::Number(self.spent),
            CampaignField::Impressions => FieldValue::Number(self.impressions as f64),
            CampaignField::Clicks => FieldValue::Number(self.clicks as f64),
            CampaignField::Conversions => FieldValue::Number(self.conversions as f64),
            CampaignField::Ctr => FieldValue::Number(self.ctr),
            CampaignField::Cpc => FieldValue::Number(self.cpc),
            CampaignField::Cpa => FieldValue::Number(self.cpa),
            CampaignField::StartDate => FieldValue::Date(self.start_date),
            CampaignField::EndDate => FieldValue::Date(self.end_date),
        }
    }

    /// All columns in table order.
    pub fn fields(&self) -> impl Iterator<Item = (CampaignField, FieldValue<'_>)> + '_ {
        CampaignField::ALL.into_iter().map(move |f| (f, self.field(f)))
    }
}

/// `numerator / denominator` rounded to two decimals, or zero when the
/// denominator is zero.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        (numerator / denominator * 100.0).round() / 100.0
    }
}

/// Parse a `YYYY-MM-DD` date as used by filters and query strings.
pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{raw}' (expected YYYY-MM-DD): {e}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn derived_rates_are_rounded() {
        let c = Campaign::new(
            "Test",
            "Google Ads",
            CampaignStatus::Active,
            1000.0,
            900.0,
            10_000,
            300,
            12,
            date(2024, 1, 1),
            date(2024, 1, 31),
        );
        assert_eq!(c.ctr, 3.0);
        assert_eq!(c.cpc, 3.0);
        assert_eq!(c.cpa, 75.0);
    }

    #[test]
    fn zero_denominators_yield_zero_rates() {
        let c = Campaign::new(
            "Empty",
            "Google Ads",
            CampaignStatus::Paused,
            100.0,
            0.0,
            0,
            0,
            0,
            date(2024, 1, 1),
            date(2024, 1, 2),
        );
        assert_eq!(c.ctr, 0.0);
        assert_eq!(c.cpc, 0.0);
        assert_eq!(c.cpa, 0.0);
    }

    #[test]
    fn field_values_render_as_plain_strings() {
        let c = &mock::campaigns()[0];
        assert_eq!(c.field(CampaignField::Status).to_string(), "completed");
        assert_eq!(c.field(CampaignField::Budget).to_string(), "75000");
        assert_eq!(c.field(CampaignField::StartDate).to_string(), "2024-11-20");
    }

    #[test]
    fn field_parsing_accepts_variants() {
        assert_eq!("budget".parse::<CampaignField>().unwrap(), CampaignField::Budget);
        assert_eq!("start-date".parse::<CampaignField>().unwrap(), CampaignField::StartDate);
        assert_eq!("startDate".parse::<CampaignField>().unwrap(), CampaignField::StartDate);
        assert!("roi".parse::<CampaignField>().is_err());
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!("Active".parse::<CampaignStatus>().unwrap(), CampaignStatus::Active);
        assert!("archived".parse::<CampaignStatus>().is_err());
    }

    #[test]
    fn compare_orders_by_kind() {
        assert_eq!(
            FieldValue::Number(2.0).compare(&FieldValue::Number(10.0)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Text("b").compare(&FieldValue::Text("a")),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::Date(date(2024, 1, 1)).compare(&FieldValue::Date(date(2024, 1, 1))),
            Ordering::Equal
        );
    }

    #[test]
    fn compare_accepts_values_borrowed_from_different_rows() {
        let records = mock::campaigns();
        let name = String::from("Black Friday");
        let local = FieldValue::Text(&name);
        for record in &records {
            let value = record.field(CampaignField::Name);
            assert_eq!(value.compare(&local), record.name.as_str().cmp("Black Friday"));
            assert_eq!(local.compare(&value), "Black Friday".cmp(record.name.as_str()));
        }
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert_eq!(parse_date("2024-06-15").unwrap(), date(2024, 6, 15));
        assert!(parse_date("15/06/2024").is_err());
    }
}
