//! Forecast widget — predicted KPIs that wander on every analysis pass.

use serde::Serialize;

use super::Level;
use crate::metrics::rng::SimRng;

/// Current and predicted value of one KPI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub current: f64,
    pub predicted: f64,
    /// Confidence in percent.
    pub confidence: u8,
}

impl Prediction {
    fn new(current: f64, predicted: f64, confidence: u8) -> Self {
        Self {
            current,
            predicted,
            confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Opportunity,
    Alert,
    Trend,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opportunity => "opportunity",
            Self::Alert => "alert",
            Self::Trend => "trend",
        }
    }
}

/// A static recommendation card.
#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub id: u32,
    pub kind: InsightKind,
    pub title: &'static str,
    pub description: &'static str,
    pub impact: Level,
    pub confidence: u8,
    pub action: &'static str,
}

/// One point of the revenue forecast chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub label: &'static str,
    pub revenue: f64,
    pub predicted: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Predictions {
    pub revenue: Prediction,
    pub conversions: Prediction,
    pub users: Prediction,
    pub growth: Prediction,
    pub insights: Vec<Insight>,
}

impl Default for Predictions {
    fn default() -> Self {
        Self::new()
    }
}

impl Predictions {
    pub fn new() -> Self {
        Self {
            revenue: Prediction::new(485_000.0, 520_000.0, 87),
            conversions: Prediction::new(6_250.0, 6_800.0, 92),
            users: Prediction::new(57_800.0, 61_200.0, 89),
            growth: Prediction::new(12.5, 14.2, 85),
            insights: seed_insights(),
        }
    }

    /// One analysis pass: every predicted value drifts by a bounded offset.
    pub fn tick(&mut self, rng: &mut SimRng) {
        self.revenue.predicted += rng.range_i64(-2_500, 2_500) as f64;
        self.conversions.predicted += rng.range_i64(-50, 50) as f64;
        self.users.predicted += rng.range_i64(-250, 250) as f64;
        self.growth.predicted += rng.range_f64(-0.25, 0.25);
    }

    /// Three-month revenue outlook: actuals grow 5% a month, the model's
    /// line 3%.
    pub fn forecast(&self) -> Vec<ForecastPoint> {
        const STEPS: [(&str, f64, f64); 4] = [
            ("Current", 1.0, 1.0),
            ("Next Month", 1.05, 1.03),
            ("2 Months", 1.10, 1.06),
            ("3 Months", 1.15, 1.09),
        ];
        STEPS
            .iter()
            .map(|&(label, actual, model)| ForecastPoint {
                label,
                revenue: self.revenue.current * actual,
                predicted: self.revenue.predicted * model,
            })
            .collect()
    }
}

fn seed_insights() -> Vec<Insight> {
    vec![
        Insight {
            id: 1,
            kind: InsightKind::Opportunity,
            title: "High-Performing Campaign Detected",
            description: "Your \"Black Friday\" campaign is performing 23% above average. Consider increasing budget allocation.",
            impact: Level::High,
            confidence: 94,
            action: "Increase budget by 15%",
        },
        Insight {
            id: 2,
            kind: InsightKind::Alert,
            title: "Conversion Rate Decline",
            description: "Mobile conversion rate dropped 8% this week. Optimizing mobile landing pages is suggested.",
            impact: Level::Medium,
            confidence: 87,
            action: "Review mobile UX",
        },
        Insight {
            id: 3,
            kind: InsightKind::Trend,
            title: "Seasonal Pattern Identified",
            description: "User engagement rises 15% during evening hours. Consider time-based targeting.",
            impact: Level::Low,
            confidence: 76,
            action: "Adjust ad scheduling",
        },
        Insight {
            id: 4,
            kind: InsightKind::Opportunity,
            title: "Cross-Platform Synergy",
            description: "Google Ads + Facebook Ads combination shows 31% better ROI than individual platforms.",
            impact: Level::High,
            confidence: 91,
            action: "Optimize cross-platform strategy",
        },
    ]
}
