//! Canned-response chat assistant.
//!
//! Questions are matched against a fixed list of keyword groups, checked
//! in order; the first group with a keyword contained in the lowercased
//! question supplies the reply. Nothing here understands language: the
//! replies and their data payloads are pre-written.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::format;

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// Category of an assistant reply, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Insight,
    Alert,
    Prediction,
    Optimization,
    General,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insight => "insight",
            Self::Alert => "alert",
            Self::Prediction => "prediction",
            Self::Optimization => "optimization",
            Self::General => "general",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named number attached to a reply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    pub key: &'static str,
    pub value: f64,
}

impl DataPoint {
    /// Value formatted according to its key.
    pub fn display(&self) -> String {
        format_data_point(self.key, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub kind: ResponseKind,
    pub content: &'static str,
    pub data: Vec<DataPoint>,
}

struct Rule {
    keywords: &'static [&'static str],
    kind: ResponseKind,
    content: &'static str,
    data: &'static [(&'static str, f64)],
}

const RULES: [Rule; 4] = [
    Rule {
        keywords: &["performance", "top", "best"],
        kind: ResponseKind::Insight,
        content: "Your top performing campaigns are:\n\n\
1. **Black Friday** - 23% above average ROI\n\
2. **Holiday Special** - 18% conversion rate\n\
3. **Cyber Monday** - 31% revenue growth\n\n\
I recommend increasing budget allocation to these campaigns.",
        data: &[("revenue", 485_000.0), ("growth", 12.5)],
    },
    Rule {
        keywords: &["conversion", "drop", "decline"],
        kind: ResponseKind::Alert,
        content: "I've analyzed your conversion data and found:\n\n\
• Mobile conversion rate dropped 8% this week\n\
• Desktop conversions are stable (+2%)\n\
• Email campaigns show 15% better conversion\n\n\
**Recommendation:** Optimize mobile landing pages and increase email marketing budget.",
        data: &[("conversions", 6_250.0), ("change", -8.0)],
    },
    Rule {
        keywords: &["revenue", "predict", "forecast"],
        kind: ResponseKind::Prediction,
        content: "Based on current trends and historical data, I predict:\n\n\
• **Next Month:** $520k (+7.2%)\n\
• **Q1 2025:** $1.8M (+15%)\n\
• **Confidence Level:** 87%\n\n\
Key drivers: Holiday season, improved targeting, and new product launches.",
        data: &[("predicted", 520_000.0), ("confidence", 87.0)],
    },
    Rule {
        keywords: &["optimize", "improve", "better"],
        kind: ResponseKind::Optimization,
        content: "Here are my optimization recommendations:\n\n\
1. **Budget Reallocation:** Move 15% from underperforming to top campaigns\n\
2. **Targeting:** Switch to custom audiences (+12% expected)\n\
3. **Bidding:** Enable auto-bidding for efficiency\n\
4. **Creative:** Implement dynamic ads (+15% engagement)\n\n\
Expected impact: +18% overall ROI",
        data: &[("potential_gain", 18.0)],
    },
];

const FALLBACK: &str = "I understand you're asking about your analytics. \
Let me analyze the data and provide you with actionable insights.";

pub const GREETING: &str = "Hello! I'm your AI analytics assistant. I can help you \
understand your data, find insights, and optimize your campaigns. What would you like to know?";

pub const SUGGESTIONS: [&str; 4] = [
    "Show me top performing campaigns",
    "What's causing the conversion drop?",
    "Predict next month's revenue",
    "Optimize my ad spend",
];

/// Canned reply for a question, or `None` when the question is blank.
pub fn respond(input: &str) -> Option<Reply> {
    let question = input.trim();
    if question.is_empty() {
        return None;
    }
    let lower = question.to_lowercase();

    let reply = RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
        .map(|rule| Reply {
            kind: rule.kind,
            content: rule.content,
            data: rule
                .data
                .iter()
                .map(|&(key, value)| DataPoint { key, value })
                .collect(),
        })
        .unwrap_or(Reply {
            kind: ResponseKind::General,
            content: FALLBACK,
            data: Vec::new(),
        });
    Some(reply)
}

/// Format a payload value by its key: revenue as currency, confidence as a
/// plain percent, gains with a `+`, changes signed, anything else grouped.
pub fn format_data_point(key: &str, value: f64) -> String {
    if key.contains("revenue") {
        format::format_currency(value)
    } else if key.contains("confidence") {
        format!("{}%", format::format_number(value))
    } else if key.contains("gain") {
        format!("+{}%", format::format_number(value))
    } else if key.contains("change") {
        let sign = if value > 0.0 { "+" } else { "" };
        format!("{sign}{}%", format::format_number(value))
    } else {
        format::format_number(value)
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    /// Reply category; `None` for user messages and the greeting.
    pub kind: Option<ResponseKind>,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<DataPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    pub sent_at: DateTime<Utc>,
}

/// Chat history, opened by the assistant's greeting.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(now: DateTime<Utc>) -> Self {
        let greeting = Message {
            id: 1,
            role: Role::Assistant,
            kind: None,
            content: GREETING.to_string(),
            data: Vec::new(),
            suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            sent_at: now,
        };
        Self {
            messages: vec![greeting],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Record a question and the assistant's reply. Blank questions are
    /// ignored and leave the history untouched.
    pub fn ask(&mut self, question: &str, now: DateTime<Utc>) -> Option<&Message> {
        let reply = respond(question)?;
        self.push(Role::User, None, question.trim().to_string(), Vec::new(), now);
        self.push(
            Role::Assistant,
            Some(reply.kind),
            reply.content.to_string(),
            reply.data,
            now,
        );
        self.messages.last()
    }

    fn push(
        &mut self,
        role: Role,
        kind: Option<ResponseKind>,
        content: String,
        data: Vec<DataPoint>,
        now: DateTime<Utc>,
    ) {
        let id = self.messages.last().map_or(1, |m| m.id + 1);
        self.messages.push(Message {
            id,
            role,
            kind,
            content,
            data,
            suggestions: Vec::new(),
            sent_at: now,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
