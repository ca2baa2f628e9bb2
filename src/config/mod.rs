/// Configuration system for the insights dashboard.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::InsightsConfig::default()`]
/// 2. **User global config** — `~/.insights/config.toml`
/// 3. **Project local config** — `.insights.toml` in the current working directory
/// 4. **Environment variables** — `INSIGHTS_*` overrides (highest precedence)
///
/// # Usage
///
/// ```rust,ignore
/// use brand_insights::config;
///
/// let cfg = config::load();
/// println!("{} rows per page", cfg.general.page_size);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::InsightsConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> InsightsConfig {
    let mut config = load_files(global_config_path(), project_config_path());
    apply_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

/// Merge the file layers only.
///
/// Each file overrides only the keys it sets; everything else keeps the
/// value from the layer below.
pub fn load_files(global: Option<PathBuf>, project: Option<PathBuf>) -> InsightsConfig {
    let Ok(mut merged) = toml::Value::try_from(InsightsConfig::default()) else {
        return InsightsConfig::default();
    };

    for layer in [global, project].into_iter().filter_map(load_toml_file) {
        merge_values(&mut merged, layer);
    }

    merged.try_into().unwrap_or_default()
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed or doesn't fit the schema. A broken config file
/// never stops the dashboard from starting.
fn load_toml_file(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    // Reject the whole layer if it doesn't deserialize on its own.
    value.clone().try_into::<InsightsConfig>().ok()?;
    Some(value)
}

/// Deep-merge `overlay` into `base`: tables merge key by key, any other
/// value replaces the base value.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.insights/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".insights").join("config.toml"))
}

/// Path to the project local config: `.insights.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".insights.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `INSIGHTS_PAGE_SIZE` — rows per table page
/// - `INSIGHTS_THEME` — `light` or `dark`
/// - `INSIGHTS_SEED` — fixed simulation seed
/// - `INSIGHTS_ADDR` — web server bind address
/// - `INSIGHTS_LOGGING` — activity log on/off (`1`/`true`/`yes`/`on`)
///
/// Unparseable values are ignored.
pub fn apply_overrides(config: &mut InsightsConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("INSIGHTS_PAGE_SIZE")
        && let Ok(n) = val.trim().parse::<usize>()
        && n > 0
    {
        config.general.page_size = n;
    }
    if let Some(val) = var("INSIGHTS_THEME")
        && let Ok(theme) = val.parse()
    {
        config.theme.preference = theme;
    }
    if let Some(val) = var("INSIGHTS_SEED")
        && let Ok(seed) = val.trim().parse::<u64>()
    {
        config.refresh.seed = Some(seed);
    }
    if let Some(val) = var("INSIGHTS_ADDR")
        && !val.is_empty()
    {
        config.server.addr = val;
    }
    if let Some(val) = var("INSIGHTS_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.insights/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    init_config_at(&path, force)?;
    Ok(path)
}

pub fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, InsightsConfig::default_toml()).context("failed to write config file")
}

/// Set a single config key to a value in the global config file.
///
/// Supports dotted keys like `general.page_size`.
pub fn set_config_value(key: &str, value: &str) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)?;
    Ok(path)
}

/// Set a dotted key in the config file at `path`, creating it from the
/// defaults if missing. The edited file must still parse as a config.
pub fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = if path.exists() {
        fs::read_to_string(path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&InsightsConfig::default())
            .context("failed to serialize default config")?
    };

    let mut value_table: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut value_table, key, value)?;

    let output =
        toml::to_string_pretty(&value_table).context("failed to serialize updated config")?;
    toml::from_str::<InsightsConfig>(&output)
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The existing value's type decides how `raw_value` is parsed. New keys
/// are stored as integers when they parse as one, strings otherwise.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("invalid config key '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::Table(_)) => {
            anyhow::bail!("'{key}' is a section, not a value");
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => match raw_value.parse::<i64>() {
            Ok(n) => toml::Value::Integer(n),
            Err(_) => toml::Value::String(raw_value.to_string()),
        },
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn load_files_without_files_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_files(Some(dir.path().join("missing.toml")), None);
        assert_eq!(config, InsightsConfig::default());
    }

    #[test]
    fn project_file_wins_over_global() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(&global, "[general]\npage_size = 8\n").unwrap();
        fs::write(&project, "[general]\npage_size = 3\n").unwrap();

        let config = load_files(Some(global.clone()), Some(project));
        assert_eq!(config.general.page_size, 3);

        let config = load_files(Some(global), None);
        assert_eq!(config.general.page_size, 8);
    }

    #[test]
    fn partial_layers_keep_lower_values() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(&global, "[general]\npage_size = 10\n\n[refresh]\nseed = 11\n").unwrap();
        fs::write(&project, "[theme]\npreference = \"dark\"\n").unwrap();

        let config = load_files(Some(global), Some(project));
        assert_eq!(config.general.page_size, 10);
        assert_eq!(config.refresh.seed, Some(11));
        assert_eq!(config.theme.preference, crate::theme::ThemePreference::Dark);
        assert_eq!(config.general.title, InsightsConfig::default().general.title);
    }

    #[test]
    fn mistyped_layer_is_skipped_whole() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(&global, "[general]\npage_size = 7\n").unwrap();
        fs::write(&project, "[general]\npage_size = \"many\"\n").unwrap();

        let config = load_files(Some(global), Some(project));
        assert_eq!(config.general.page_size, 7);
    }

    #[test]
    fn malformed_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[general\npage_size = ").unwrap();
        assert_eq!(load_files(Some(bad), None), InsightsConfig::default());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = InsightsConfig::default();
        apply_overrides(
            &mut config,
            vars(&[
                ("INSIGHTS_PAGE_SIZE", "10"),
                ("INSIGHTS_THEME", "dark"),
                ("INSIGHTS_SEED", "42"),
                ("INSIGHTS_ADDR", "0.0.0.0:8080"),
                ("INSIGHTS_LOGGING", "off"),
            ]),
        );
        assert_eq!(config.general.page_size, 10);
        assert_eq!(config.theme.preference, crate::theme::ThemePreference::Dark);
        assert_eq!(config.refresh.seed, Some(42));
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert!(!config.logging.enabled);
    }

    #[test]
    fn bad_env_values_are_ignored() {
        let mut config = InsightsConfig::default();
        apply_overrides(
            &mut config,
            vars(&[
                ("INSIGHTS_PAGE_SIZE", "0"),
                ("INSIGHTS_THEME", "sepia"),
                ("INSIGHTS_SEED", "abc"),
            ]),
        );
        assert_eq!(config, InsightsConfig::default());
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("On"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn set_toml_value_preserves_types() {
        let mut root: toml::Value = toml::from_str(
            r#"
[general]
title = "Campaign Performance"
page_size = 5

[server]
open_browser = true
"#,
        )
        .unwrap();
        set_toml_value(&mut root, "general.page_size", "10").unwrap();
        set_toml_value(&mut root, "server.open_browser", "no").unwrap();
        set_toml_value(&mut root, "general.title", "Q4 Review").unwrap();

        let general = root["general"].as_table().unwrap();
        assert_eq!(general["page_size"].as_integer(), Some(10));
        assert_eq!(general["title"].as_str(), Some("Q4 Review"));
        assert_eq!(root["server"]["open_browser"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_rejects_bad_input() {
        let mut root: toml::Value = toml::from_str("[general]\npage_size = 5\n").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "value").is_err());
        assert!(set_toml_value(&mut root, "general.page_size", "many").is_err());
        assert!(set_toml_value(&mut root, "general", "x").is_err());
        assert!(set_toml_value(&mut root, "general..x", "x").is_err());
    }

    #[test]
    fn set_config_value_at_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("config.toml");
        set_config_value_at(&path, "refresh.seed", "99").unwrap();
        set_config_value_at(&path, "theme.preference", "dark").unwrap();

        let config = load_files(Some(path.clone()), None);
        assert_eq!(config.refresh.seed, Some(99));
        assert_eq!(config.theme.preference, crate::theme::ThemePreference::Dark);

        assert!(set_config_value_at(&path, "theme.preference", "sepia").is_err());
        let config = load_files(Some(path), None);
        assert_eq!(config.theme.preference, crate::theme::ThemePreference::Dark);
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        init_config_at(&path, false).unwrap();
        assert!(init_config_at(&path, false).is_err());
        init_config_at(&path, true).unwrap();
        assert_eq!(load_files(Some(path), None), InsightsConfig::default());
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: InsightsConfig = toml::from_str(&toml_str).unwrap();
    }
}
