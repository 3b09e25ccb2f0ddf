//! Configuration for RimRPC.
//!
//! Maps directly to `rimrpc.toml`. Every field has a default, so an empty
//! file (or no file) yields a working configuration.

use serde::{Deserialize, Serialize};

/// Discord application id the mod ships with.
pub const DEFAULT_CLIENT_ID: i64 = 1_288_106_578_825_969_816;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Presence service settings.
    #[serde(default)]
    pub discord: DiscordConfig,
    /// Recent-event display settings.
    #[serde(default)]
    pub events: EventConfig,
}

impl RpcConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `RpcError::Config` if the TOML is invalid or a value is out
    /// of range.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| crate::RpcError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns `RpcError::Config` naming the first invalid field.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.events.display_window_secs <= 0 {
            return Err(crate::RpcError::Config(
                "events.display_window_secs must be positive".to_string(),
            ));
        }
        if self.discord.publish_timeout_ms == 0 {
            return Err(crate::RpcError::Config(
                "discord.publish_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether presence publishing is enabled at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Presence service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Discord application id.
    #[serde(default = "default_client_id")]
    pub client_id: i64,
    /// Asset key of the large presence image.
    #[serde(default = "default_large_image")]
    pub large_image: String,
    /// Hover text of the large presence image.
    #[serde(default = "default_large_text")]
    pub large_text: String,
    /// Upper bound on a single presence publish, in milliseconds.
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_ms: u64,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID,
            large_image: "logo".to_string(),
            large_text: "RimWorld".to_string(),
            publish_timeout_ms: 5000,
        }
    }
}

/// Recent-event display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// How long a recorded event replaces the state line, in seconds.
    #[serde(default = "default_display_window")]
    pub display_window_secs: i64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            display_window_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_client_id() -> i64 { DEFAULT_CLIENT_ID }
fn default_large_image() -> String { "logo".to_string() }
fn default_large_text() -> String { "RimWorld".to_string() }
fn default_publish_timeout() -> u64 { 5000 }
fn default_display_window() -> i64 { 60 }
