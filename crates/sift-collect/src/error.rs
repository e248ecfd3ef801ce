//! Collect error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    /// A required configuration key is absent; the run never starts.
    #[error("configuration key {0} is not set")]
    MissingConfig(&'static str),

    #[error("configuration key {key} is invalid: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("backup write failed: {0}")]
    Backup(#[from] std::io::Error),

    #[error("backup serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CollectError>;
