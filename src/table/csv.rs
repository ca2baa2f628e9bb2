//! CSV export of the filtered campaign table.
//!
//! The header row is the fixed column schema, so an export of an empty
//! result set is a valid header-only file. Every data field is wrapped in
//! double quotes with embedded quotes doubled.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::campaign::{Campaign, CampaignField};

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("whitespace regex is valid")
});

/// Render rows as CSV text (lines joined with `\n`, no trailing newline).
pub fn to_csv<'a>(rows: impl IntoIterator<Item = &'a Campaign>) -> String {
    let header = CampaignField::ALL
        .iter()
        .map(|f| f.key())
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = vec![header];
    lines.extend(rows.into_iter().map(|row| {
        row.fields()
            .map(|(_, value)| quote(&value.to_string()))
            .collect::<Vec<_>>()
            .join(",")
    }));
    lines.join("\n")
}

/// Download file name for a table title: `"Campaign Performance"` →
/// `"campaign-performance-data.csv"`.
pub fn export_file_name(title: &str) -> String {
    let slug = WHITESPACE_RE.replace_all(&title.to_lowercase(), "-").into_owned();
    format!("{slug}-data.csv")
}

/// Write the export into `dir` and return the full path of the new file.
pub fn write_export<'a>(
    dir: &Path,
    title: &str,
    rows: impl IntoIterator<Item = &'a Campaign>,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(export_file_name(title));
    fs::write(&path, to_csv(rows))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Wrap a field in double quotes, doubling any embedded quotes.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::mock;

    #[test]
    fn header_lists_every_column() {
        let csv = to_csv(std::iter::empty());
        assert_eq!(
            csv,
            "name,platform,status,budget,spent,impressions,clicks,conversions,ctr,cpc,cpa,start_date,end_date"
        );
    }

    #[test]
    fn rows_are_quoted() {
        let records = mock::campaigns();
        let csv = to_csv(records.iter().take(1));
        let mut lines = csv.lines();
        lines.next();
        let row = lines.next().unwrap();
        assert!(row.starts_with("\"Black Friday\",\"Google Ads\",\"completed\",\"75000\""));
        assert!(row.ends_with("\"2024-11-20\",\"2024-11-30\""));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn file_name_is_slugged() {
        assert_eq!(
            export_file_name("Campaign Performance"),
            "campaign-performance-data.csv"
        );
        assert_eq!(export_file_name("Top   Ads\tQ4"), "top-ads-q4-data.csv");
    }

    #[test]
    fn write_export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let records = mock::campaigns();
        let path = write_export(dir.path(), "My Table", &records).unwrap();
        assert_eq!(path.file_name().unwrap(), "my-table-data.csv");
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 9);
    }
}
