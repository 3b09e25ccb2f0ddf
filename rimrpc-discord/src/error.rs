//! Presence SDK error types.

use thiserror::Error;

/// Errors raised while creating or driving a presence SDK client.
#[derive(Debug, Error)]
pub enum DiscordError {
    /// No Discord client could be reached.
    #[error("Discord is not running: {0}")]
    NotRunning(String),

    /// The handshake was refused or answered with something unexpected.
    #[error("Discord handshake failed: {0}")]
    Handshake(String),

    /// A frame could not be decoded.
    #[error("Malformed IPC frame: {0}")]
    Protocol(String),

    /// The connection was closed by the other side.
    #[error("Discord connection closed")]
    Disconnected,

    /// Socket I/O failure.
    #[error("Discord I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure.
    #[error("Discord payload error: {0}")]
    Json(#[from] serde_json::Error),
}
