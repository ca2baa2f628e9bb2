//! Display formatting for dashboard values.
//!
//! Every function here is pure and infallible: inputs are assumed to be
//! finite numbers. Output follows `en-US` conventions (comma grouping,
//! `$` prefix, `.` decimal separator).

use chrono::{DateTime, Utc};

use crate::campaign::{CampaignField, FieldValue};

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Format an amount as whole US dollars: `485000.4` → `"$485,000"`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = group_digits(&format!("{:.0}", rounded.abs()));
    if rounded < 0.0 {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// Format a number with comma grouping and up to three fraction digits.
///
/// Trailing fractional zeros are dropped: `57800.0` → `"57,800"`,
/// `12.50` → `"12.5"`.
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let grouped = group_digits(int_part);

    let is_zero = int_part.chars().all(|c| c == '0') && frac.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// Format an integer count with comma grouping.
pub fn format_count(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Format a percentage with one decimal: `12.46` → `"12.5%"`.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Format a percentage delta with an explicit sign: `5.5` → `"+5.5%"`,
/// `-8.0` → `"-8.0%"`. Values that round to zero render as `"0.0%"`.
pub fn format_change(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded > 0.0 {
        format!("+{rounded:.1}%")
    } else if rounded < 0.0 {
        format!("{rounded:.1}%")
    } else {
        "0.0%".to_string()
    }
}

/// Format a rate (CTR, CPC, CPA) with two decimals.
pub fn format_rate(value: f64) -> String {
    format!("{value:.2}")
}

/// Format one table cell according to its column: money columns as
/// currency, counts grouped, rates with two decimals, anything else as-is.
pub fn format_cell(field: CampaignField, value: FieldValue<'_>) -> String {
    match (field, value) {
        (CampaignField::Budget | CampaignField::Spent, FieldValue::Number(n)) => {
            format_currency(n)
        }
        (
            CampaignField::Impressions | CampaignField::Clicks | CampaignField::Conversions,
            FieldValue::Number(n),
        ) => format_number(n),
        (CampaignField::Ctr | CampaignField::Cpc | CampaignField::Cpa, FieldValue::Number(n)) => {
            format_rate(n)
        }
        (_, other) => other.to_string(),
    }
}

/// Insert comma separators into a string of ASCII digits.
fn group_digits(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Turn a snake_case column key into a header label: `start_date` →
/// `"Start Date"`.
pub fn column_label(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first character of a word.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Label shown on a multi-select filter button.
///
/// No selection shows the placeholder title, one or two selections are
/// listed, anything more collapses to a count.
pub fn selection_label(title: &str, selected: &[String]) -> String {
    match selected.len() {
        0 => title.to_string(),
        1 | 2 => selected.join(", "),
        n => format!("{n} selected"),
    }
}

/// Coarse "time ago" label used by the anomaly and feedback feeds.
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let (amount, unit) = match secs {
        0..=59 => return "Just now".to_string(),
        60..=3_599 => (secs / 60, "minute"),
        3_600..=86_399 => (secs / 3_600, "hour"),
        _ => (secs / 86_400, "day"),
    };
    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn currency_has_no_decimals() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(485_000.0), "$485,000");
        assert_eq!(format_currency(73_199.6), "$73,200");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
        assert_eq!(format_currency(-2_500.0), "-$2,500");
    }

    #[test]
    fn number_groups_and_trims() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(57_800.0), "57,800");
        assert_eq!(format_number(1_250_000.0), "1,250,000");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(3.14159), "3.142");
        assert_eq!(format_number(-8.0), "-8");
        assert_eq!(format_number(-0.0001), "0");
    }

    #[test]
    fn count_groups_digits() {
        assert_eq!(format_count(42), "42");
        assert_eq!(format_count(6_250), "6,250");
    }

    #[test]
    fn percentage_has_one_decimal() {
        assert_eq!(format_percentage(12.46), "12.5%");
        assert_eq!(format_percentage(0.0), "0.0%");
    }

    #[test]
    fn change_is_sign_aware() {
        assert_eq!(format_change(5.5), "+5.5%");
        assert_eq!(format_change(-8.0), "-8.0%");
        assert_eq!(format_change(0.0), "0.0%");
        assert_eq!(format_change(-0.04), "0.0%");
    }

    #[test]
    fn rate_has_two_decimals() {
        assert_eq!(format_rate(3.6), "3.60");
        assert_eq!(format_rate(1.626_666), "1.63");
    }

    #[test]
    fn cells_format_by_column() {
        use chrono::NaiveDate;
        assert_eq!(
            format_cell(CampaignField::Budget, FieldValue::Number(75_000.0)),
            "$75,000"
        );
        assert_eq!(
            format_cell(CampaignField::Impressions, FieldValue::Number(1_250_000.0)),
            "1,250,000"
        );
        assert_eq!(format_cell(CampaignField::Ctr, FieldValue::Number(3.6)), "3.60");
        assert_eq!(
            format_cell(CampaignField::Name, FieldValue::Text("Black Friday")),
            "Black Friday"
        );
        let date = NaiveDate::from_ymd_opt(2024, 11, 20).unwrap();
        assert_eq!(format_cell(CampaignField::StartDate, FieldValue::Date(date)), "2024-11-20");
    }

    #[test]
    fn column_labels_are_title_case() {
        assert_eq!(column_label("start_date"), "Start Date");
        assert_eq!(column_label("ctr"), "Ctr");
        assert_eq!(column_label("name"), "Name");
    }

    #[test]
    fn selection_label_collapses_after_two() {
        let none: Vec<String> = Vec::new();
        assert_eq!(selection_label("All Status", &none), "All Status");
        assert_eq!(
            selection_label("All Status", &["active".to_string()]),
            "active"
        );
        assert_eq!(
            selection_label(
                "All Platforms",
                &["Google Ads".to_string(), "Facebook Ads".to_string()]
            ),
            "Google Ads, Facebook Ads"
        );
        let three = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(selection_label("All", &three), "3 selected");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(format_relative(now, now), "Just now");
        assert_eq!(format_relative(now - Duration::minutes(2), now), "2 minutes ago");
        assert_eq!(format_relative(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(format_relative(now - Duration::days(3), now), "3 days ago");
    }
}
