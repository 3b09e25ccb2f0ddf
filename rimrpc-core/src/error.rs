//! Error types for the RimRPC core library.

use thiserror::Error;

/// Top-level error type for core operations.
#[derive(Error, Debug)]
pub enum RpcError {
    /// Configuration could not be parsed or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A translation table could not be parsed.
    #[error("Translation table error: {0}")]
    Translation(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, RpcError>;
