//! Error types for page-harvester
//!
//! Errors are grouped by how the pipelines react to them:
//! - Transport failures are transient and retried by the fetch loop
//! - Storage failures (artifact reads/writes) are surfaced per item, never retried
//! - Configuration and rule errors are fatal before any work starts

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for page-harvester operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for page-harvester
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "num_threads")
        key: Option<String>,
    },

    /// Transport-level failure while fetching a page (connect, timeout, body read)
    #[error("transport error fetching {url}: {message}")]
    Transport {
        /// URL that was being fetched
        url: String,
        /// Description of the underlying failure
        message: String,
    },

    /// URL that cannot be turned into an artifact name
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// Failed to read or write an artifact on disk
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        /// Path of the artifact or directory involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// CSS selector in an extraction rule failed to parse
    #[error("invalid selector '{selector}': {reason}")]
    Selector {
        /// The selector text
        selector: String,
        /// Parser message
        reason: String,
    },

    /// Regular expression in an extraction rule failed to compile
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Fetching stopped because another worker saw an unexpected status
    #[error("fetching halted after an unexpected response status")]
    Halted,

    /// A worker task panicked or was cancelled
    #[error("worker task failed: {0}")]
    Worker(String),
}

impl Error {
    /// Build a [`Error::Storage`] for the given path
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Storage {
            path: path.into(),
            source,
        }
    }

    /// Build a [`Error::Config`] for the given key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}
