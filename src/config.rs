//! Configuration types for page-harvester
//!
//! A single [`Config`] is resolved once at startup (built-in defaults, then an
//! optional JSON file, then command-line flags) and handed to both pipelines.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default directory holding fetched page artifacts
pub const DEFAULT_SAVE_DIR: &str = "data/downloaded_files";

/// Default line-delimited URL list
pub const DEFAULT_URL_LIST_FILE: &str = "data/endg-urls";

/// Default number of fetch attempts per URL
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default worker pool size for both pipelines
pub const DEFAULT_NUM_THREADS: usize = 30;

/// Default number of words reported by the ranking step
pub const DEFAULT_TOP_WORD_COUNT: usize = 5;

/// Environment variable consulted for `top_word_count` when no flag is given
pub const TOP_WORD_COUNT_ENV: &str = "TOP_WORD_COUNT";

/// Retry behavior for page fetches
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total fetch attempts per URL, including the first one (default: 5)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Upper bound (inclusive) of the uniform random delay before each retry (default: 5 seconds)
    #[serde(default = "default_max_backoff", with = "duration_serde")]
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            max_backoff: default_max_backoff(),
        }
    }
}

/// Main configuration shared by the fetch and analysis pipelines
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory where artifacts are written and later analyzed (default: "data/downloaded_files")
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,

    /// Line-delimited URL list (default: "data/endg-urls")
    #[serde(default = "default_url_list_file")]
    pub url_list_file: PathBuf,

    /// Fetch retry settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// Worker pool size, same meaning for both pipelines (default: 30)
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,

    /// Optional word bank restricting which words are counted
    #[serde(default)]
    pub word_bank_file_path: Option<PathBuf>,

    /// Number of top words reported after analysis (default: 5)
    #[serde(default = "default_top_word_count")]
    pub top_word_count: usize,

    /// Verbose logging
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            url_list_file: default_url_list_file(),
            retry: RetryConfig::default(),
            num_threads: default_num_threads(),
            word_bank_file_path: None,
            top_word_count: default_top_word_count(),
            debug: false,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::storage(path, e))?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make a pipeline unable to make progress
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(Error::config("num_threads", "must be at least 1"));
        }
        if self.retry.max_retries == 0 {
            return Err(Error::config("max_retries", "must be at least 1"));
        }
        Ok(())
    }
}

fn default_save_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SAVE_DIR)
}

fn default_url_list_file() -> PathBuf {
    PathBuf::from(DEFAULT_URL_LIST_FILE)
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_max_backoff() -> Duration {
    Duration::from_secs(5)
}

fn default_num_threads() -> usize {
    DEFAULT_NUM_THREADS
}

fn default_top_word_count() -> usize {
    DEFAULT_TOP_WORD_COUNT
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.save_dir, PathBuf::from("data/downloaded_files"));
        assert_eq!(config.url_list_file, PathBuf::from("data/endg-urls"));
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.max_backoff, Duration::from_secs(5));
        assert_eq!(config.num_threads, 30);
        assert_eq!(config.top_word_count, 5);
        assert!(config.word_bank_file_path.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn empty_json_object_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_json_overrides_only_given_fields() {
        let config: Config = serde_json::from_str(
            r#"{"num_threads": 4, "retry": {"max_backoff": 0}, "word_bank_file_path": "bank.txt"}"#,
        )
        .unwrap();
        assert_eq!(config.num_threads, 4);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.max_backoff, Duration::ZERO);
        assert_eq!(config.word_bank_file_path, Some(PathBuf::from("bank.txt")));
    }

    #[test]
    fn validate_rejects_zero_threads() {
        let config = Config {
            num_threads: 0,
            ..Config::default()
        };
        match config.validate() {
            Err(Error::Config { key, .. }) => assert_eq!(key.as_deref(), Some("num_threads")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_zero_retries() {
        let config = Config {
            retry: RetryConfig {
                max_retries: 0,
                ..RetryConfig::default()
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_json_file_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"top_word_count": 12, "debug": true}"#).unwrap();

        let config = Config::from_json_file(&path).unwrap();
        assert_eq!(config.top_word_count, 12);
        assert!(config.debug);

        std::fs::write(&path, r#"{"num_threads": 0}"#).unwrap();
        assert!(Config::from_json_file(&path).is_err());
    }

    #[test]
    fn from_json_file_missing_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_json_file(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Storage { .. })));
    }
}
