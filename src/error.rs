//! Error types for theta-speech

use thiserror::Error;

/// Result type alias for theta-speech operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading the bank or running a turn
#[derive(Debug, Error)]
pub enum Error {
    /// Question source document could not be read or parsed
    #[error("malformed question source: {0}")]
    MalformedSource(String),

    /// Question bank has no entries to match against
    #[error("question bank is empty")]
    EmptyBank,

    /// Speech-to-text, open answering, or output service failed
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// Resolved question missing from the bank (internal invariant violation)
    #[error("lookup failure: {0}")]
    LookupFailure(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::CollaboratorUnavailable(e.to_string())
    }
}
