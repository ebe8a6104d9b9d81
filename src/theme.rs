//! Color themes for rendered pages
//!
//! The chosen theme is stored as a bare string under the `theme` key. `auto`
//! is stored as chosen and resolved to light or dark when a page is rendered.

use std::fmt;
use std::str::FromStr;

use crate::error::{BudgetbookError, BudgetbookResult};
use crate::storage::kv::{KeyValueStore, THEME_KEY};

/// A concrete color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Blue,
    Green,
    Purple,
    Orange,
}

impl Theme {
    pub fn all() -> [Theme; 6] {
        [
            Self::Light,
            Self::Dark,
            Self::Blue,
            Self::Green,
            Self::Purple,
            Self::Orange,
        ]
    }

    /// Value of the `data-theme` attribute
    pub fn key(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::Blue => "Ocean blue",
            Self::Green => "Nature green",
            Self::Purple => "Elegant purple",
            Self::Orange => "Vibrant orange",
        }
    }

    /// Preview swatch color
    pub fn accent(&self) -> &'static str {
        match self {
            Self::Light => "#667eea",
            Self::Dark => "#7c3aed",
            Self::Blue => "#0ea5e9",
            Self::Green => "#22c55e",
            Self::Purple => "#a855f7",
            Self::Orange => "#f97316",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|theme| theme.key() == key)
            .ok_or_else(|| {
                format!(
                    "Unknown theme '{}'. Use light, dark, blue, green, purple, orange or auto",
                    key
                )
            })
    }
}

/// What the user picked: a fixed theme or "follow the system"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChoice {
    Auto,
    Fixed(Theme),
}

impl Default for ThemeChoice {
    fn default() -> Self {
        Self::Fixed(Theme::Light)
    }
}

impl ThemeChoice {
    /// The theme to apply; `auto` follows the dark-mode hint
    pub fn resolve(&self, prefers_dark: bool) -> Theme {
        match self {
            Self::Fixed(theme) => *theme,
            Self::Auto if prefers_dark => Theme::Dark,
            Self::Auto => Theme::Light,
        }
    }
}

impl fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(theme) => theme.fmt(f),
        }
    }
}

impl FromStr for ThemeChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else {
            s.parse().map(Self::Fixed)
        }
    }
}

/// The stored choice; missing or unrecognized values mean light
pub fn load_theme(store: &dyn KeyValueStore) -> BudgetbookResult<ThemeChoice> {
    let Some(raw) = store.get(THEME_KEY)? else {
        return Ok(ThemeChoice::default());
    };

    Ok(raw.parse().unwrap_or_else(|e| {
        log::warn!("Ignoring stored theme: {}", e);
        ThemeChoice::default()
    }))
}

pub fn save_theme(store: &dyn KeyValueStore, choice: ThemeChoice) -> BudgetbookResult<()> {
    store
        .set(THEME_KEY, choice.to_string())
        .map_err(|e| BudgetbookError::Storage(format!("Failed to save theme: {}", e)))
}
