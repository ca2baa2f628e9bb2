/// Configuration schema and defaults for the insights dashboard.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[general]`, `[refresh]`, `[assistant]`, `[theme]`, `[server]` and
/// `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::theme::ThemePreference;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level dashboard configuration.
///
/// Maps directly to the `~/.insights/config.toml` and `.insights.toml` file
/// schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub general: GeneralConfig,
    pub refresh: RefreshConfig,
    pub assistant: AssistantConfig,
    pub theme: ThemeConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [general]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Table title; also the stem of exported CSV file names.
    pub title: String,
    /// Rows per table page.
    pub page_size: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "Campaign Performance".to_string(),
            page_size: crate::table::DEFAULT_PAGE_SIZE,
        }
    }
}

// ---------------------------------------------------------------------------
// [refresh]
// ---------------------------------------------------------------------------

/// Tick intervals of the simulated components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub metrics_interval_secs: u64,
    pub predictions_interval_secs: u64,
    pub sentiment_interval_secs: u64,
    pub anomaly_interval_secs: u64,
    pub optimizer_interval_secs: u64,
    /// Fixed RNG seed. Unset means a fresh random seed per run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            metrics_interval_secs: 5,
            predictions_interval_secs: 30,
            sentiment_interval_secs: 60,
            anomaly_interval_secs: 30,
            optimizer_interval_secs: 60,
            seed: None,
        }
    }
}

impl RefreshConfig {
    pub fn metrics_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_interval_secs)
    }

    pub fn predictions_interval(&self) -> Duration {
        Duration::from_secs(self.predictions_interval_secs)
    }

    pub fn sentiment_interval(&self) -> Duration {
        Duration::from_secs(self.sentiment_interval_secs)
    }

    pub fn anomaly_interval(&self) -> Duration {
        Duration::from_secs(self.anomaly_interval_secs)
    }

    pub fn optimizer_interval(&self) -> Duration {
        Duration::from_secs(self.optimizer_interval_secs)
    }
}

// ---------------------------------------------------------------------------
// [assistant]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Pause before the CLI prints a chat reply.
    pub thinking_delay_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            thinking_delay_ms: 1500,
        }
    }
}

// ---------------------------------------------------------------------------
// [theme]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Used until the user picks a theme, which is then remembered in the
    /// preference store.
    pub preference: ThemePreference,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    /// Open the dashboard in the default browser on `serve`.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9747".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// JSONL activity log; a leading `~/` is expanded.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.insights/activity.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl InsightsConfig {
    /// Annotated config written by `insights config init`.
    pub fn default_toml() -> String {
        r#"# insights configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (INSIGHTS_*)
#   2. Project config (.insights.toml in current directory)
#   3. User global config (~/.insights/config.toml)
#   4. Built-in defaults

[general]
title = "Campaign Performance"
page_size = 5

[refresh]
metrics_interval_secs = 5
predictions_interval_secs = 30
sentiment_interval_secs = 60
anomaly_interval_secs = 30
optimizer_interval_secs = 60
# seed = 42                      # Fix the simulation seed for reproducible runs

[assistant]
thinking_delay_ms = 1500

[theme]
preference = "light"             # light | dark

[server]
addr = "127.0.0.1:9747"
open_browser = true

[logging]
enabled = true
path = "~/.insights/activity.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toml_parses_back() {
        let config: InsightsConfig = toml::from_str(&InsightsConfig::default_toml()).unwrap();
        assert_eq!(config, InsightsConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: InsightsConfig = toml::from_str(
            r#"
[general]
page_size = 10

[theme]
preference = "dark"
"#,
        )
        .unwrap();
        assert_eq!(config.general.page_size, 10);
        assert_eq!(config.general.title, "Campaign Performance");
        assert_eq!(config.theme.preference, ThemePreference::Dark);
        assert_eq!(config.refresh.metrics_interval_secs, 5);
    }

    #[test]
    fn seed_is_optional() {
        let config: InsightsConfig = toml::from_str("[refresh]\nseed = 7\n").unwrap();
        assert_eq!(config.refresh.seed, Some(7));
        let out = toml::to_string_pretty(&InsightsConfig::default()).unwrap();
        assert!(!out.contains("seed"));
    }

    #[test]
    fn intervals_convert_to_durations() {
        let refresh = RefreshConfig::default();
        assert_eq!(refresh.metrics_interval(), Duration::from_secs(5));
        assert_eq!(refresh.optimizer_interval(), Duration::from_secs(60));
    }
}
