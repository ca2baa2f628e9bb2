//! Anomaly feed: seeded alerts plus randomly injected ones while
//! monitoring is on.

use anyhow::{Result, bail};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::Level;
use crate::metrics::rng::SimRng;

/// Probability that a monitoring pass surfaces a new anomaly.
const DETECTION_CHANCE: f64 = 0.2;
/// The feed never grows past this many entries.
pub const MAX_ANOMALIES: usize = 10;

const METRICS: [&str; 4] = ["Conversion Rate", "Revenue", "User Engagement", "Bounce Rate"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Spike,
    Drop,
    Pattern,
    Trend,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spike => "spike",
            Self::Drop => "drop",
            Self::Pattern => "pattern",
            Self::Trend => "trend",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyStatus {
    Active,
    Investigating,
    Monitoring,
    Resolved,
}

impl AnomalyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Investigating => "investigating",
            Self::Monitoring => "monitoring",
            Self::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Serialize)]
pub struct Anomaly {
    pub id: u64,
    pub kind: AnomalyKind,
    pub metric: String,
    pub severity: Level,
    pub description: String,
    pub detected_at: DateTime<Utc>,
    pub value: f64,
    pub normal_range: String,
    pub confidence: u8,
    pub status: AnomalyStatus,
    pub impact: Impact,
    pub recommendation: String,
}

/// Summary counters shown above the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetectionStats {
    pub total: usize,
    pub resolved: usize,
    pub active: usize,
    pub false_positive: usize,
}

/// One point of the detection chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub time: &'static str,
    pub value: f64,
    pub threshold: f64,
    pub anomaly: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnomalyDetector {
    pub anomalies: Vec<Anomaly>,
    pub monitoring: bool,
    #[serde(skip)]
    next_id: u64,
    #[serde(skip)]
    detected: usize,
    #[serde(skip)]
    resolved: usize,
    #[serde(skip)]
    dismissed: usize,
}

impl AnomalyDetector {
    /// Seed feed with detection times relative to `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        let anomalies = seed_anomalies(now);
        let next_id = anomalies.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        Self {
            anomalies,
            monitoring: true,
            next_id,
            detected: 0,
            resolved: 0,
            dismissed: 0,
        }
    }

    /// One monitoring pass. Does nothing while monitoring is paused.
    /// Returns the id of a newly surfaced anomaly, if any.
    pub fn tick(&mut self, rng: &mut SimRng, now: DateTime<Utc>) -> Option<u64> {
        if !self.monitoring || !rng.chance(DETECTION_CHANCE) {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        let kind = if rng.chance(0.5) { AnomalyKind::Spike } else { AnomalyKind::Drop };
        let metric = rng.pick(&METRICS).copied().unwrap_or(METRICS[0]);
        let severity = rng.pick(&Level::ALL).copied().unwrap_or(Level::Low);
        let impact = if rng.chance(0.5) { Impact::Positive } else { Impact::Negative };

        self.anomalies.insert(
            0,
            Anomaly {
                id,
                kind,
                metric: metric.to_string(),
                severity,
                description: format!("New anomaly detected in {metric}"),
                detected_at: now,
                value: rng.range_i64(0, 1_000) as f64,
                normal_range: "2.1 - 4.2".to_string(),
                confidence: rng.range_i64(80, 100) as u8,
                status: AnomalyStatus::Active,
                impact,
                recommendation: "AI is analyzing the pattern...".to_string(),
            },
        );
        self.anomalies.truncate(MAX_ANOMALIES);
        self.detected += 1;
        Some(id)
    }

    pub fn get(&self, id: u64) -> Option<&Anomaly> {
        self.anomalies.iter().find(|a| a.id == id)
    }

    /// Mark an anomaly resolved. Resolving twice is a no-op.
    pub fn resolve(&mut self, id: u64) -> Result<&Anomaly> {
        let Some(anomaly) = self.anomalies.iter_mut().find(|a| a.id == id) else {
            bail!("no anomaly with id {id}");
        };
        if anomaly.status != AnomalyStatus::Resolved {
            anomaly.status = AnomalyStatus::Resolved;
            self.resolved += 1;
        }
        Ok(&*anomaly)
    }

    /// Drop an anomaly from the feed as a false positive.
    pub fn dismiss(&mut self, id: u64) -> Result<Anomaly> {
        let Some(pos) = self.anomalies.iter().position(|a| a.id == id) else {
            bail!("no anomaly with id {id}");
        };
        self.dismissed += 1;
        Ok(self.anomalies.remove(pos))
    }

    pub fn set_monitoring(&mut self, on: bool) {
        self.monitoring = on;
    }

    pub fn stats(&self) -> DetectionStats {
        DetectionStats {
            total: 24 + self.detected,
            resolved: 18 + self.resolved,
            active: self
                .anomalies
                .iter()
                .filter(|a| a.status != AnomalyStatus::Resolved)
                .count(),
            false_positive: 2 + self.dismissed,
        }
    }

    /// Conversion-rate readings over the last day; points above the
    /// threshold are flagged.
    pub fn series(&self) -> Vec<SeriesPoint> {
        const THRESHOLD: f64 = 4.2;
        const POINTS: [(&str, f64); 12] = [
            ("00:00", 2.1),
            ("02:00", 2.3),
            ("04:00", 2.0),
            ("06:00", 2.5),
            ("08:00", 2.8),
            ("10:00", 3.1),
            ("12:00", 8.5),
            ("14:00", 7.2),
            ("16:00", 4.8),
            ("18:00", 3.5),
            ("20:00", 3.2),
            ("22:00", 2.9),
        ];
        POINTS
            .iter()
            .map(|&(time, value)| SeriesPoint {
                time,
                value,
                threshold: THRESHOLD,
                anomaly: value > THRESHOLD,
            })
            .collect()
    }
}

#[allow(clippy::too_many_arguments)]
fn seeded(
    id: u64,
    kind: AnomalyKind,
    metric: &str,
    severity: Level,
    description: &str,
    detected_at: DateTime<Utc>,
    value: f64,
    normal_range: &str,
    confidence: u8,
    status: AnomalyStatus,
    impact: Impact,
    recommendation: &str,
) -> Anomaly {
    Anomaly {
        id,
        kind,
        metric: metric.to_string(),
        severity,
        description: description.to_string(),
        detected_at,
        value,
        normal_range: normal_range.to_string(),
        confidence,
        status,
        impact,
        recommendation: recommendation.to_string(),
    }
}

fn seed_anomalies(now: DateTime<Utc>) -> Vec<Anomaly> {
    vec![
        seeded(
            1,
            AnomalyKind::Spike,
            "Conversion Rate",
            Level::High,
            "Unusual 45% spike in conversion rate detected",
            now - Duration::minutes(2),
            8.5,
            "2.1 - 4.2",
            94,
            AnomalyStatus::Active,
            Impact::Positive,
            "Investigate traffic source quality",
        ),
        seeded(
            2,
            AnomalyKind::Drop,
            "Revenue",
            Level::Medium,
            "Revenue dropped 23% below expected range",
            now - Duration::minutes(15),
            485_000.0,
            "520000 - 580000",
            87,
            AnomalyStatus::Investigating,
            Impact::Negative,
            "Check campaign performance and ad spend",
        ),
        seeded(
            3,
            AnomalyKind::Pattern,
            "User Engagement",
            Level::Low,
            "New usage pattern detected during off-peak hours",
            now - Duration::hours(1),
            85.0,
            "60 - 75",
            76,
            AnomalyStatus::Monitoring,
            Impact::Neutral,
            "Monitor for sustained pattern change",
        ),
        seeded(
            4,
            AnomalyKind::Trend,
            "Bounce Rate",
            Level::High,
            "Bounce rate increasing trend detected",
            now - Duration::hours(3),
            68.0,
            "45 - 55",
            91,
            AnomalyStatus::Resolved,
            Impact::Negative,
            "Optimize landing page experience",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::rng::Stream;

    #[test]
    fn seed_stats() {
        let detector = AnomalyDetector::new(Utc::now());
        let stats = detector.stats();
        assert_eq!(stats.total, 24);
        assert_eq!(stats.resolved, 18);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.false_positive, 2);
    }

    #[test]
    fn resolve_and_dismiss() {
        let mut detector = AnomalyDetector::new(Utc::now());
        detector.resolve(1).unwrap();
        detector.resolve(1).unwrap();
        assert_eq!(detector.get(1).unwrap().status, AnomalyStatus::Resolved);
        assert_eq!(detector.stats().resolved, 19);

        let removed = detector.dismiss(2).unwrap();
        assert_eq!(removed.metric, "Revenue");
        assert!(detector.get(2).is_none());
        assert_eq!(detector.stats().false_positive, 3);
        assert_eq!(detector.stats().active, 1);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let mut detector = AnomalyDetector::new(Utc::now());
        assert!(detector.resolve(99).is_err());
        assert!(detector.dismiss(99).is_err());
    }

    #[test]
    fn paused_monitoring_never_detects() {
        let mut detector = AnomalyDetector::new(Utc::now());
        detector.set_monitoring(false);
        let mut rng = SimRng::new(1, Stream::Anomalies);
        for _ in 0..200 {
            assert!(detector.tick(&mut rng, Utc::now()).is_none());
        }
        assert_eq!(detector.anomalies.len(), 4);
    }

    #[test]
    fn feed_is_capped() {
        let mut detector = AnomalyDetector::new(Utc::now());
        let mut rng = SimRng::new(1, Stream::Anomalies);
        let mut found = 0;
        for _ in 0..500 {
            if let Some(id) = detector.tick(&mut rng, Utc::now()) {
                found += 1;
                let newest = &detector.anomalies[0];
                assert_eq!(newest.id, id);
                assert!(newest.value < 1_000.0);
                assert!((80..100).contains(&newest.confidence));
            }
        }
        assert!(found > 10);
        assert_eq!(detector.anomalies.len(), MAX_ANOMALIES);
        assert_eq!(detector.stats().total, 24 + found);
    }

    #[test]
    fn series_flags_points_over_threshold() {
        let detector = AnomalyDetector::new(Utc::now());
        let flagged: Vec<_> = detector
            .series()
            .into_iter()
            .filter(|p| p.anomaly)
            .map(|p| p.time)
            .collect();
        assert_eq!(flagged, ["12:00", "14:00", "16:00"]);
    }
}
