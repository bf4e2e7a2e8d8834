use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown theme `{0}` (expected `light` or `dark`)")]
pub struct ThemeParseError(pub String);

/// Colour scheme of the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ThemeParseError(other.to_owned())),
        }
    }
}

/// Where the active theme came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    Persisted,
    SystemDefault,
}

/// Resolved theme configuration handed to the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreference {
    theme: Theme,
    source: ThemeSource,
}

impl ThemePreference {
    /// A stored preference wins over the system default.
    #[must_use]
    pub fn resolve(persisted: Option<Theme>, system_default: Theme) -> Self {
        match persisted {
            Some(theme) => Self {
                theme,
                source: ThemeSource::Persisted,
            },
            None => Self {
                theme: system_default,
                source: ThemeSource::SystemDefault,
            },
        }
    }

    #[must_use]
    pub fn persisted(theme: Theme) -> Self {
        Self::resolve(Some(theme), theme)
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn source(&self) -> ThemeSource {
        self.source
    }
}
