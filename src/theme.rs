//! Light/dark theme preference persisted in the key-value store

use std::str::FromStr;

use ratatui::style::Color;
use thiserror::Error;
use tracing::warn;

use crate::store::KvStore;

/// Store key holding the theme name
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Icon of the theme a toggle would switch to (moon in light mode, sun in dark)
    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Theme::Light => "\u{263E}", // ☾
            Theme::Dark => "\u{2600}",  // ☀
        }
    }

    /// Reads the saved theme, defaulting to light when absent or unrecognized
    pub fn load(store: &dyn KvStore) -> Theme {
        store
            .get(THEME_KEY)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Persists the theme; failures are logged and otherwise ignored
    pub fn save(&self, store: &dyn KvStore) {
        if let Err(err) = store.set(THEME_KEY, self.as_str()) {
            warn!(theme = self.as_str(), error = %err, "failed to save theme");
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: Color::White,
                foreground: Color::Black,
                accent: Color::Blue,
                muted: Color::DarkGray,
                warning: Color::Red,
                link: Color::Blue,
            },
            Theme::Dark => Palette {
                background: Color::Black,
                foreground: Color::White,
                accent: Color::Cyan,
                muted: Color::Gray,
                warning: Color::Yellow,
                link: Color::LightCyan,
            },
        }
    }
}

/// Stored theme name that is neither `light` nor `dark`
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown theme '{0}'")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

/// Colors used by the terminal UI for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub muted: Color,
    pub warning: Color,
    pub link: Color,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_load_defaults_to_light() {
        let store = MemoryStore::new();
        assert_eq!(Theme::load(&store), Theme::Light);
    }

    #[test]
    fn test_load_ignores_unknown_value() {
        let store = MemoryStore::new();
        store.set(THEME_KEY, "solarized").unwrap();
        assert_eq!(Theme::load(&store), Theme::Light);
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let store = MemoryStore::new();
        Theme::Dark.save(&store);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(Theme::load(&store), Theme::Dark);
    }

    #[test]
    fn test_parse_theme_names() {
        assert_eq!(" dark\n".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        let err = "sepia".parse::<Theme>().unwrap_err();
        assert_eq!(err.to_string(), "unknown theme 'sepia'");
    }

    #[test]
    fn test_toggle_flips_between_themes() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn test_toggle_icon_shows_target_theme() {
        assert_eq!(Theme::Light.toggle_icon(), "\u{263E}");
        assert_eq!(Theme::Dark.toggle_icon(), "\u{2600}");
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Theme::Light.palette(), Theme::Dark.palette());
    }
}
