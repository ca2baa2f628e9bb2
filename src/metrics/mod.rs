//! KPI snapshots and the sources that feed them.
//!
//! Presentation code only talks to [`MetricsSource`]. The built-in
//! [`SimulatedSource`] jitters mock values on a timer; [`StaticSource`]
//! serves fixed snapshots and stands in for a real feed in tests.

pub mod rng;
pub mod simulated;
pub mod ticker;

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::format;

pub use simulated::SimulatedSource;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// How a metric value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Currency,
    Number,
    Percentage,
}

/// Direction of the latest change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn from_change(change: Option<f64>) -> Self {
        match change {
            Some(c) if c > 0.0 => Self::Up,
            Some(c) if c < 0.0 => Self::Down,
            _ => Self::Flat,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Flat => "•",
        }
    }
}

/// Latest value of one KPI card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Stable identifier (`revenue`, `users`, ...).
    pub key: String,
    pub title: String,
    pub kind: MetricKind,
    pub current: f64,
    pub previous: f64,
    /// Percent change from `previous`; `None` when `previous` is zero.
    pub change: Option<f64>,
    pub trend: Trend,
}

impl MetricSnapshot {
    pub fn new(key: &str, title: &str, kind: MetricKind, current: f64, previous: f64) -> Self {
        let mut snapshot = Self {
            key: key.to_string(),
            title: title.to_string(),
            kind,
            current,
            previous,
            change: None,
            trend: Trend::Flat,
        };
        snapshot.recompute();
        snapshot
    }

    /// Move `current` by `delta` and refresh the derived fields.
    pub fn nudge(&mut self, delta: f64) {
        self.current += delta;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.change = percent_change(self.previous, self.current);
        self.trend = Trend::from_change(self.change);
    }

    /// Card value in its display format.
    pub fn display_value(&self) -> String {
        match self.kind {
            MetricKind::Currency => format::format_currency(self.current),
            MetricKind::Number => format::format_number(self.current.round()),
            MetricKind::Percentage => format::format_percentage(self.current),
        }
    }

    /// Signed change, or `n/a` when there is no baseline.
    pub fn display_change(&self) -> String {
        self.change
            .map(format::format_change)
            .unwrap_or_else(|| "n/a".to_string())
    }
}

/// `(current - previous) / previous * 100`, guarded against a zero baseline.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous.abs() * 100.0)
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Anything that can produce the current KPI snapshots.
///
/// `poll` is called from the dashboard loop with the current instant; a
/// source decides for itself whether enough time has passed to refresh.
pub trait MetricsSource {
    /// Short name shown in health output.
    fn name(&self) -> &str;

    /// Latest snapshots, refreshed as of `now`.
    fn poll(&mut self, now: Instant) -> Vec<MetricSnapshot>;
}

/// A source that always returns the same snapshots.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    snapshots: Vec<MetricSnapshot>,
}

impl StaticSource {
    pub fn new(snapshots: Vec<MetricSnapshot>) -> Self {
        Self { snapshots }
    }
}

impl MetricsSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn poll(&mut self, _now: Instant) -> Vec<MetricSnapshot> {
        self.snapshots.clone()
    }
}

/// The four KPI cards at their starting values.
pub fn default_snapshots() -> Vec<MetricSnapshot> {
    vec![
        MetricSnapshot::new("revenue", "Total Revenue", MetricKind::Currency, 485_000.0, 431_100.0),
        MetricSnapshot::new("users", "Active Users", MetricKind::Number, 57_800.0, 52_400.0),
        MetricSnapshot::new("conversions", "Conversions", MetricKind::Number, 6_250.0, 6_800.0),
        MetricSnapshot::new("growth", "Growth Rate", MetricKind::Percentage, 12.5, 11.2),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_and_trend_follow_current() {
        let mut m = MetricSnapshot::new("x", "X", MetricKind::Number, 110.0, 100.0);
        assert!((m.change.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(m.trend, Trend::Up);
        m.nudge(-20.0);
        assert!((m.change.unwrap() + 10.0).abs() < 1e-9);
        assert_eq!(m.trend, Trend::Down);
        assert_eq!(m.display_change(), "-10.0%");
    }

    #[test]
    fn zero_baseline_has_no_change() {
        let m = MetricSnapshot::new("x", "X", MetricKind::Number, 5.0, 0.0);
        assert_eq!(m.change, None);
        assert_eq!(m.trend, Trend::Flat);
        assert_eq!(m.display_change(), "n/a");
    }

    #[test]
    fn display_value_uses_kind() {
        let cards = default_snapshots();
        assert_eq!(cards[0].display_value(), "$485,000");
        assert_eq!(cards[1].display_value(), "57,800");
        assert_eq!(cards[3].display_value(), "12.5%");
    }

    #[test]
    fn static_source_is_stable() {
        let mut source = StaticSource::new(default_snapshots());
        let now = Instant::now();
        assert_eq!(source.poll(now), source.poll(now + std::time::Duration::from_secs(60)));
    }
}
