//! Simulated "AI" widgets: predictions, sentiment, anomalies and the
//! auto-optimizer.
//!
//! None of these analyse anything. Each holds canned seed data and a
//! `tick` that mutates it with a [`SimRng`](crate::metrics::rng::SimRng);
//! the dashboard decides when to tick.

pub mod anomalies;
pub mod optimizer;
pub mod predictions;
pub mod sentiment;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use anomalies::AnomalyDetector;
pub use optimizer::AutoOptimizer;
pub use predictions::Predictions;
pub use sentiment::SentimentAnalyzer;

/// Severity / expected impact shared by insights, anomalies and
/// optimizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub const ALL: [Level; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
