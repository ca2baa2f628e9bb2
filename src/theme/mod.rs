//! Light/dark theme preference.
//!
//! The preference is explicit state. [`apply`] maps it to concrete colors
//! without touching anything global, and [`ThemeController`] persists
//! changes through an injected [`PreferenceStore`].

pub mod store;

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub use store::{FileStore, MemoryStore, PreferenceStore, Preferences};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => bail!("unknown theme '{other}' (expected light or dark)"),
        }
    }
}

/// Concrete colors for a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeStyle {
    pub preference: ThemePreference,
    /// Class set on the document root.
    pub root_class: &'static str,
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
}

/// Map a preference to its style.
pub fn apply(preference: ThemePreference) -> ThemeStyle {
    match preference {
        ThemePreference::Light => ThemeStyle {
            preference,
            root_class: "light",
            background: "#f9fafb",
            surface: "#ffffff",
            text: "#111827",
            muted: "#6b7280",
            accent: "#2563eb",
        },
        ThemePreference::Dark => ThemeStyle {
            preference,
            root_class: "dark",
            background: "#111827",
            surface: "#1f2937",
            text: "#f9fafb",
            muted: "#9ca3af",
            accent: "#60a5fa",
        },
    }
}

/// Current theme plus the store it persists to.
pub struct ThemeController {
    store: Box<dyn PreferenceStore>,
    preference: ThemePreference,
}

impl ThemeController {
    /// Start from the stored preference, falling back to `default` when
    /// nothing was stored or the store can't be read.
    pub fn new(store: Box<dyn PreferenceStore>, default: ThemePreference) -> Self {
        let preference = store
            .load()
            .ok()
            .and_then(|p| p.theme)
            .unwrap_or(default);
        Self { store, preference }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn style(&self) -> ThemeStyle {
        apply(self.preference)
    }

    pub fn store(&self) -> &dyn PreferenceStore {
        self.store.as_ref()
    }

    /// Switch theme and persist it. The in-memory preference changes even
    /// when saving fails.
    pub fn set(&mut self, preference: ThemePreference) -> Result<ThemeStyle> {
        self.preference = preference;
        let mut prefs = self.store.load().unwrap_or_default();
        prefs.theme = Some(preference);
        self.store
            .save(&prefs)
            .with_context(|| format!("failed to save theme to {}", self.store.describe()))?;
        Ok(self.style())
    }

    pub fn toggle(&mut self) -> Result<ThemeStyle> {
        self.set(self.preference.toggled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_is_pure() {
        assert_eq!(apply(ThemePreference::Dark), apply(ThemePreference::Dark));
        assert_eq!(apply(ThemePreference::Dark).root_class, "dark");
        assert_eq!(apply(ThemePreference::Light).root_class, "light");
    }

    #[test]
    fn parse_preference() {
        assert_eq!("Dark".parse::<ThemePreference>().unwrap(), ThemePreference::Dark);
        assert!("sepia".parse::<ThemePreference>().is_err());
    }

    #[test]
    fn stored_preference_beats_default() {
        let store = MemoryStore::with(Preferences {
            theme: Some(ThemePreference::Dark),
        });
        let theme = ThemeController::new(Box::new(store), ThemePreference::Light);
        assert_eq!(theme.preference(), ThemePreference::Dark);

        let theme = ThemeController::new(Box::new(MemoryStore::new()), ThemePreference::Dark);
        assert_eq!(theme.preference(), ThemePreference::Dark);
    }

    #[test]
    fn toggle_flips_and_persists() {
        let mut theme = ThemeController::new(Box::new(MemoryStore::new()), ThemePreference::Light);
        let style = theme.toggle().unwrap();
        assert_eq!(style.preference, ThemePreference::Dark);
        assert_eq!(theme.store().load().unwrap().theme, Some(ThemePreference::Dark));

        theme.toggle().unwrap();
        assert_eq!(theme.preference(), ThemePreference::Light);
        assert_eq!(theme.store().load().unwrap().theme, Some(ThemePreference::Light));
    }
}
