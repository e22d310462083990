//! Error types for backend calls.

use thiserror::Error;

/// Backend call error.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connect failure, timeout or body read failure.
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    /// Body was not the JSON we expected.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request's cancellation token fired first.
    #[error("Request cancelled")]
    Cancelled,
}

/// Result type alias for backend calls.
pub type Result<T> = std::result::Result<T, ClientError>;
