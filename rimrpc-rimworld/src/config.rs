//! Player-facing mod settings.
//!
//! Every line of the presence text can be toggled or replaced by custom
//! text. The host's settings screen writes through a [`SettingsHandle`];
//! the reporter reads one snapshot per update.

use std::sync::Arc;

use parking_lot::RwLock;
use rimrpc_core::RpcError;
use rimrpc_core::i18n::keys;
use serde::{Deserialize, Serialize};

/// Display toggles and overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RimRpcSettings {
    /// Let recent events replace the state line.
    pub show_events: bool,
    /// Replace the details line with `custom_top_text`.
    pub custom_top: bool,
    /// Custom details line.
    pub custom_top_text: String,
    /// Replace the state line with `custom_bottom_text`.
    pub custom_bottom: bool,
    /// Custom state line.
    pub custom_bottom_text: String,
    /// Show the free colonist count.
    pub colonist_count: bool,
    /// Show the current map's biome.
    pub biome: bool,
    /// Show the colony name.
    pub colony: bool,
    /// Show days passed.
    pub day: bool,
    /// Show the hour of day.
    pub hour: bool,
    /// Show the quadrum.
    pub quadrum: bool,
    /// Show the year with the long label. Wins over `year_short`.
    pub year: bool,
    /// Show the year with the short label.
    pub year_short: bool,
}

impl Default for RimRpcSettings {
    fn default() -> Self {
        Self {
            show_events: true,
            custom_top: false,
            custom_top_text: String::new(),
            custom_bottom: false,
            custom_bottom_text: String::new(),
            colonist_count: true,
            biome: true,
            colony: true,
            day: true,
            hour: false,
            quadrum: true,
            year: true,
            year_short: false,
        }
    }
}

impl RimRpcSettings {
    /// Everything off; handy as a base for targeted overrides.
    #[must_use]
    pub fn none() -> Self {
        Self {
            show_events: false,
            colonist_count: false,
            biome: false,
            colony: false,
            day: false,
            quadrum: false,
            year: false,
            ..Self::default()
        }
    }

    /// Whether any game-time field is enabled.
    #[must_use]
    pub fn shows_game_time(&self) -> bool {
        self.day || self.hour || self.quadrum || self.year || self.year_short
    }

    /// Label key for the year segment, if one is shown.
    #[must_use]
    pub fn year_label_key(&self) -> Option<&'static str> {
        if self.year {
            Some(keys::YEAR)
        } else if self.year_short {
            Some(keys::YEAR_SHORT)
        } else {
            None
        }
    }

    /// Parse settings from TOML. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `RpcError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> rimrpc_core::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| RpcError::Config(e.to_string()))
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> rimrpc_core::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize to TOML for the host to persist.
    ///
    /// # Errors
    /// Returns `RpcError::Config` if serialization fails.
    pub fn to_toml(&self) -> rimrpc_core::error::Result<String> {
        toml::to_string(self).map_err(|e| RpcError::Config(e.to_string()))
    }
}

/// Shared, lock-guarded settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsHandle {
    inner: Arc<RwLock<RimRpcSettings>>,
}

impl SettingsHandle {
    /// Wrap `settings`.
    #[must_use]
    pub fn new(settings: RimRpcSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Copy of the current settings.
    #[must_use]
    pub fn snapshot(&self) -> RimRpcSettings {
        self.inner.read().clone()
    }

    /// Mutate in place.
    pub fn update(&self, f: impl FnOnce(&mut RimRpcSettings)) {
        f(&mut self.inner.write());
    }

    /// Replace wholesale.
    pub fn replace(&self, settings: RimRpcSettings) {
        *self.inner.write() = settings;
    }
}
