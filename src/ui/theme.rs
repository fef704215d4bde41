//! Light/dark theme resolution and persistence

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Storage key holding the user's preference
pub const THEME_STORAGE_KEY: &str = "theme";

/// Attribute set on the document root
pub const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
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

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Theme implied by the system colour-scheme preference
    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid theme value {0:?}")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,

    #[error("storage quota exceeded")]
    QuotaExceeded,
}

/// Key-value store for the persisted preference
pub trait ThemeStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.values.insert(key.to_string(), value.to_string());
        storage
    }
}

impl ThemeStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage that always fails, as in private browsing modes
#[derive(Debug, Default)]
pub struct DisabledStorage;

impl ThemeStorage for DisabledStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

/// Holds the active theme and keeps storage and the document attribute in sync
pub struct ThemeController<S> {
    theme: Theme,
    storage: S,
    attribute: Option<Theme>,
}

impl<S: ThemeStorage> ThemeController<S> {
    /// Resolve the initial theme: a valid stored value, else the system preference
    pub fn new(storage: S, prefers_dark: bool) -> Self {
        let stored = match storage.get(THEME_STORAGE_KEY) {
            Ok(value) => value.and_then(|v| v.parse::<Theme>().ok()),
            Err(e) => {
                tracing::debug!("Theme storage read failed: {}", e);
                None
            }
        };
        let theme = stored.unwrap_or_else(|| Theme::from_system(prefers_dark));

        Self {
            theme,
            storage,
            attribute: Some(theme),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Current value of the `data-theme` attribute
    pub fn attribute(&self) -> Option<Theme> {
        self.attribute
    }

    /// Flip the theme, persist it and update the attribute
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = self.storage.set(THEME_STORAGE_KEY, self.theme.as_str()) {
            tracing::debug!("Theme storage write failed: {}", e);
        }
        self.attribute = Some(self.theme);
        self.theme
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

/// Inline script that applies the theme before first paint.
///
/// Runs the same resolution as [`ThemeController::new`] in the browser.
pub fn init_script() -> String {
    format!(
        r#"(function(){{try{{var t=localStorage.getItem('{key}');if(t!=='light'&&t!=='dark'){{t=window.matchMedia('(prefers-color-scheme: dark)').matches?'dark':'light';}}document.documentElement.setAttribute('{attr}',t);}}catch(e){{var d=window.matchMedia&&window.matchMedia('(prefers-color-scheme: dark)').matches;document.documentElement.setAttribute('{attr}',d?'dark':'light');}}}})();"#,
        key = THEME_STORAGE_KEY,
        attr = THEME_ATTRIBUTE,
    )
}
