//! Activity payload and result types.

use serde::Serialize;

/// What the presence service shows for this player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Activity {
    /// Top line.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub details: String,
    /// Bottom line.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
    /// Elapsed-time display.
    pub timestamps: ActivityTimestamps,
    /// Images and their hover text.
    pub assets: ActivityAssets,
}

/// Session timing shown as "elapsed".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivityTimestamps {
    /// Session start, Unix epoch seconds.
    pub start: i64,
}

/// Presence artwork.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityAssets {
    /// Asset key of the large image.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub large_image: String,
    /// Hover text for the large image.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub large_text: String,
}

/// Result code of an activity update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkResult {
    /// Accepted.
    Ok,
    /// The Discord client went away.
    NotRunning,
    /// The activity was rejected as invalid.
    InvalidPayload,
    /// Anything else the service reported.
    InternalError,
}

impl SdkResult {
    /// Whether the update was accepted.
    #[must_use]
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// SDK creation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateFlags {
    /// Require a running Discord client.
    Default,
    /// Do not try to launch Discord; fail fast when it is absent.
    #[default]
    NoRequireDiscord,
}
