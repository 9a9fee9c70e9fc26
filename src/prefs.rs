//! Process-wide user preferences.
//!
//! The catalog and navigator read these live (never write them): a
//! `SharedPrefs` handle is passed explicitly to every component that needs
//! one, so the sort order or transition style can change between two calls
//! with no argument changing. There is no global lookup.

use std::path::Path;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// How view-to-view transitions animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransitionStyle {
    #[default]
    Fade,
    Slide,
}

/// User preferences consumed by this core.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppPrefs {
    /// Index into [`crate::store::file_sorts`]; the default sort for
    /// `children()` calls that pass no explicit sort.
    pub sort_type_index: usize,
    /// Folders group before files in listings.
    pub sort_folders_first: bool,
    pub transition_style: TransitionStyle,
    pub show_help_prompts: bool,
}

impl Default for AppPrefs {
    fn default() -> Self {
        Self {
            sort_type_index: 0,
            sort_folders_first: true,
            transition_style: TransitionStyle::Fade,
            show_help_prompts: true,
        }
    }
}

impl AppPrefs {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prefs: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse prefs: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write prefs: {}", path.display()))
    }
}

/// Live preference handle shared across components.
pub type SharedPrefs = Arc<RwLock<AppPrefs>>;

pub fn shared(prefs: AppPrefs) -> SharedPrefs {
    Arc::new(RwLock::new(prefs))
}
