//! Customer sentiment widget.

use serde::Serialize;

use crate::metrics::Trend;
use crate::metrics::rng::SimRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

/// Aggregate scores, all in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentScores {
    pub overall: i64,
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
    pub trend: Trend,
    /// Week-over-week change of `overall`, in points.
    pub change: i64,
}

/// One piece of customer feedback.
#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub id: u32,
    pub text: &'static str,
    pub sentiment: Sentiment,
    /// Classifier score in `[0, 1]`.
    pub score: f64,
    pub source: &'static str,
    pub age_hours: u32,
    pub category: &'static str,
    pub keywords: [&'static str; 3],
}

impl Feedback {
    pub fn age_label(&self) -> String {
        match self.age_hours {
            0 => "Just now".to_string(),
            1 => "1 hour ago".to_string(),
            h if h < 24 => format!("{h} hours ago"),
            h if h < 48 => "1 day ago".to_string(),
            h => format!("{} days ago", h / 24),
        }
    }
}

/// Daily split for the trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySentiment {
    pub day: &'static str,
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentAnalyzer {
    pub scores: SentimentScores,
    pub feedback: Vec<Feedback>,
    pub trend: Vec<DailySentiment>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            scores: SentimentScores {
                overall: 78,
                positive: 65,
                neutral: 20,
                negative: 15,
                trend: Trend::Up,
                change: 12,
            },
            feedback: seed_feedback(),
            trend: seed_trend(),
        }
    }

    /// One analysis pass over the incoming feedback stream.
    pub fn tick(&mut self, rng: &mut SimRng) {
        let s = &mut self.scores;
        s.overall += rng.range_i64(-3, 3);
        s.positive += rng.range_i64(-2, 2);
        s.neutral += rng.range_i64(-1, 2);
        s.negative += rng.range_i64(-1, 2);
    }

    /// Feedback counts per sentiment, in `positive, neutral, negative` order.
    pub fn breakdown(&self) -> [(Sentiment, usize); 3] {
        let count = |kind| self.feedback.iter().filter(|f| f.sentiment == kind).count();
        [
            (Sentiment::Positive, count(Sentiment::Positive)),
            (Sentiment::Neutral, count(Sentiment::Neutral)),
            (Sentiment::Negative, count(Sentiment::Negative)),
        ]
    }
}

fn seed_feedback() -> Vec<Feedback> {
    vec![
        Feedback {
            id: 1,
            text: "Amazing product! The quality exceeded my expectations. Highly recommend!",
            sentiment: Sentiment::Positive,
            score: 0.92,
            source: "Website Review",
            age_hours: 2,
            category: "Product Quality",
            keywords: ["amazing", "quality", "recommend"],
        },
        Feedback {
            id: 2,
            text: "Customer service was terrible. Waited 30 minutes on hold.",
            sentiment: Sentiment::Negative,
            score: 0.15,
            source: "Social Media",
            age_hours: 4,
            category: "Customer Service",
            keywords: ["terrible", "waited", "hold"],
        },
        Feedback {
            id: 3,
            text: "The app works fine, nothing special but gets the job done.",
            sentiment: Sentiment::Neutral,
            score: 0.48,
            source: "App Store",
            age_hours: 6,
            category: "User Experience",
            keywords: ["works", "fine", "done"],
        },
        Feedback {
            id: 4,
            text: "Love the new features! Interface is so intuitive now.",
            sentiment: Sentiment::Positive,
            score: 0.89,
            source: "Email Survey",
            age_hours: 24,
            category: "User Experience",
            keywords: ["love", "features", "intuitive"],
        },
        Feedback {
            id: 5,
            text: "Pricing is too high for what you get. Not worth it.",
            sentiment: Sentiment::Negative,
            score: 0.23,
            source: "Website Review",
            age_hours: 24,
            category: "Pricing",
            keywords: ["pricing", "high", "worth"],
        },
    ]
}

fn seed_trend() -> Vec<DailySentiment> {
    const DAYS: [(&str, u32, u32, u32); 7] = [
        ("Mon", 62, 25, 13),
        ("Tue", 68, 22, 10),
        ("Wed", 71, 20, 9),
        ("Thu", 65, 23, 12),
        ("Fri", 75, 18, 7),
        ("Sat", 78, 17, 5),
        ("Sun", 82, 15, 3),
    ];
    DAYS.iter()
        .map(|&(day, positive, neutral, negative)| DailySentiment {
            day,
            positive,
            neutral,
            negative,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::rng::Stream;

    #[test]
    fn tick_jitter_is_bounded() {
        let mut analyzer = SentimentAnalyzer::new();
        let mut rng = SimRng::new(2, Stream::Sentiment);
        analyzer.tick(&mut rng);
        let s = &analyzer.scores;
        assert!((75..81).contains(&s.overall));
        assert!((63..67).contains(&s.positive));
        assert!((19..22).contains(&s.neutral));
        assert!((14..17).contains(&s.negative));
    }

    #[test]
    fn breakdown_counts_feedback() {
        let analyzer = SentimentAnalyzer::new();
        let [pos, neu, neg] = analyzer.breakdown();
        assert_eq!(pos.1, 2);
        assert_eq!(neu.1, 1);
        assert_eq!(neg.1, 2);
    }

    #[test]
    fn trend_covers_a_week() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.trend.len(), 7);
        assert!(analyzer.trend.iter().all(|d| d.positive + d.neutral + d.negative == 100));
    }

    #[test]
    fn age_labels() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.feedback[0].age_label(), "2 hours ago");
        assert_eq!(analyzer.feedback[3].age_label(), "1 day ago");
    }
}
