//! Session-level preferences: the login gate and the colour theme.
//!
//! The login gate checks one built-in credential pair and is not a
//! security boundary.
use std::{fmt, str::FromStr};

use clap::ValueEnum;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::{KeyValueStore, KnError, Result, AUTH_KEY, THEME_KEY};

const USERNAME: &str = "admin";
const PASSWORD: &str = "password";

/// Persisted logged-in flag.
#[derive(Debug, Clone)]
pub struct AuthGate<S> {
    kv: S,
}

impl<S: KeyValueStore> AuthGate<S> {
    pub fn new(kv: S) -> Self {
        AuthGate { kv }
    }

    /// Unreadable or missing state counts as logged out.
    pub fn is_authenticated(&self) -> bool {
        match self.kv.get(AUTH_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable auth state: {}", e);
                false
            }),
            Ok(None) => false,
            Err(e) => {
                error!("Failed to load auth status: {}", e);
                false
            }
        }
    }

    /// Returns whether the credentials were accepted. A failure to persist
    /// the flag is logged and does not change the outcome.
    pub fn login(&self, username: &str, password: &str) -> bool {
        if username != USERNAME || password != PASSWORD {
            info!("Rejected login for {}", username);
            return false;
        }

        if let Err(e) = self.kv.set(AUTH_KEY, "true") {
            error!("Failed to save auth status: {}", e);
        }
        info!("Logged in as {}", username);
        true
    }

    pub fn logout(&self) {
        if let Err(e) = self.kv.remove(AUTH_KEY) {
            error!("Failed to remove auth status: {}", e);
        }
        info!("Logged out");
    }

    /// Errors with [`KnError::NotAuthenticated`] unless logged in.
    pub fn require(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(KnError::NotAuthenticated)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    /// The concrete theme to draw with, following the OS for `System`.
    pub fn resolve(&self, prefers_dark: bool) -> Theme {
        match self {
            Theme::System if prefers_dark => Theme::Dark,
            Theme::System => Theme::Light,
            other => *other,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = KnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(KnError::ApplicationError {
                message: format!("unknown theme `{}`", other),
            }),
        }
    }
}

/// Theme preference stored as a raw string.
#[derive(Debug, Clone)]
pub struct ThemePreference<S> {
    kv: S,
}

impl<S: KeyValueStore> ThemePreference<S> {
    pub fn new(kv: S) -> Self {
        ThemePreference { kv }
    }

    /// Missing or unknown values fall back to [`Theme::System`].
    pub fn load(&self) -> Theme {
        match self.kv.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!("Failed to load theme preference: {}", e);
                Theme::default()
            }
        }
    }

    pub fn save(&self, theme: Theme) {
        if let Err(e) = self.kv.set(THEME_KEY, theme.as_str()) {
            error!("Failed to save theme preference: {}", e);
        }
    }
}

/// Best guess at the terminal's background, from `COLORFGBG`.
pub fn terminal_prefers_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| v.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()))
        .map(|bg| bg < 7 || bg == 8)
        .unwrap_or(true)
}
