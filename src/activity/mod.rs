use std::fmt;
use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Activity log entry (JSONL)
// ---------------------------------------------------------------------------

/// What kind of user-visible action an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Chat,
    Export,
    Theme,
    Anomaly,
    Optimizer,
    Server,
    Config,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Chat => "chat",
            Self::Export => "export",
            Self::Theme => "theme",
            Self::Anomaly => "anomaly",
            Self::Optimizer => "optimizer",
            Self::Server => "server",
            Self::Config => "config",
        };
        f.write_str(s)
    }
}

/// A single line of the activity log (`~/.insights/activity.jsonl` by
/// default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub kind: ActivityKind,
    pub detail: String,
}

// ---------------------------------------------------------------------------
// Log handle
// ---------------------------------------------------------------------------

/// Append-only JSONL log of dashboard actions.
///
/// Writes are best-effort: a failure to log never fails the action being
/// logged.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: Option<PathBuf>,
    enabled: bool,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            path: Some(path.into()),
            enabled,
        }
    }

    /// A log that records nothing.
    pub fn disabled() -> Self {
        Self {
            path: None,
            enabled: false,
        }
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        match expand_home(&config.path) {
            Some(path) => Self::new(path, config.enabled),
            None => Self::disabled(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && self.path.is_some()
    }

    /// Record an action. Silently does nothing when disabled or when the
    /// file can't be written.
    pub fn record(&self, kind: ActivityKind, detail: impl Into<String>) {
        if !self.is_enabled() {
            return;
        }
        let event = ActivityEvent {
            timestamp: Utc::now().to_rfc3339(),
            kind,
            detail: detail.into(),
        };
        let _ = self.append(&event);
    }

    /// The most recent `limit` entries, oldest first. Malformed lines are
    /// skipped; a missing file reads as empty.
    pub fn read_recent(&self, limit: usize) -> Vec<ActivityEvent> {
        let mut events = self.read_all();
        let skip = events.len().saturating_sub(limit);
        events.drain(..skip);
        events
    }

    pub fn read_all(&self) -> Vec<ActivityEvent> {
        let Some(path) = &self.path else {
            return Vec::new();
        };
        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<ActivityEvent>(&line).ok())
            .collect()
    }

    fn append(&self, event: &ActivityEvent) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }
}

/// Resolve a leading `~/` against the home directory.
pub fn expand_home(raw: &str) -> Option<PathBuf> {
    match raw.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None if raw == "~" => dirs::home_dir(),
        None => Some(PathBuf::from(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_reads_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path().join("logs").join("activity.jsonl"), true);
        log.record(ActivityKind::Chat, "revenue forecast");
        log.record(ActivityKind::Theme, "dark");
        log.record(ActivityKind::Export, "campaign-performance-data.csv");

        let all = log.read_all();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].kind, ActivityKind::Chat);

        let recent = log.read_recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].detail, "dark");
        assert_eq!(recent[1].kind, ActivityKind::Export);
    }

    #[test]
    fn disabled_log_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        let log = ActivityLog::new(&path, false);
        log.record(ActivityKind::Chat, "hi");
        assert!(!path.exists());
        assert!(ActivityLog::disabled().read_all().is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("activity.jsonl");
        fs::write(&path, "garbage\n").unwrap();
        let log = ActivityLog::new(&path, true);
        log.record(ActivityKind::Server, "127.0.0.1:9747");
        let all = log.read_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].kind, ActivityKind::Server);
    }

    #[test]
    fn expands_home_prefix() {
        assert_eq!(expand_home("/tmp/x.jsonl"), Some(PathBuf::from("/tmp/x.jsonl")));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.insights/a"), Some(home.join(".insights/a")));
        }
    }
}
