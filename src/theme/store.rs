//! Persistence port for user preferences.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::ThemePreference;

/// Everything the dashboard remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// `None` until the user picks a theme; the configured default applies.
    pub theme: Option<ThemePreference>,
}

/// Load/save seam between the theme controller and wherever preferences
/// live.
pub trait PreferenceStore {
    /// Stored preferences, or defaults when nothing was saved yet.
    fn load(&self) -> Result<Preferences>;

    fn save(&mut self, prefs: &Preferences) -> Result<()>;

    /// Short description for status output.
    fn describe(&self) -> String;
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// JSON file store, by default `~/.insights/preferences.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location. `None` when the home directory is
    /// unknown.
    pub fn default_location() -> Option<Self> {
        dirs::home_dir().map(|h| Self::new(h.join(".insights").join("preferences.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FileStore {
    fn load(&self) -> Result<Preferences> {
        if !self.path.exists() {
            return Ok(Preferences::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    fn save(&mut self, prefs: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(prefs).context("failed to serialize preferences")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// Memory store
// ---------------------------------------------------------------------------

/// Keeps preferences in memory only. Used by tests and when no home
/// directory is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    prefs: Preferences,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(prefs: Preferences) -> Self {
        Self { prefs, saves: 0 }
    }

    /// Number of successful `save` calls.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Result<Preferences> {
        Ok(self.prefs.clone())
    }

    fn save(&mut self, prefs: &Preferences) -> Result<()> {
        self.prefs = prefs.clone();
        self.saves += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
