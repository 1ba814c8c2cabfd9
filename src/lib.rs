//! # page-harvester
//!
//! Two-stage batch pipeline: download a list of article pages to disk, then count
//! the words in their main content.
//!
//! ## Design
//!
//! - **Resumable** - every URL ends as exactly one file; a rerun skips finished URLs
//! - **Bounded** - both stages run at most `num_threads` units of work at a time
//! - **Fail-contained** - a bad page is logged and counted, it never stops the run
//!
//! ## Quick Start
//!
//! ```no_run
//! use page_harvester::{Config, PageFetcher, WordFrequencyAnalyzer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!
//!     let fetcher = PageFetcher::with_http(&config).await?;
//!     let fetched = fetcher.run(&config.url_list_file).await?;
//!     println!("downloaded {}", fetched.downloaded);
//!
//!     let analyzer = WordFrequencyAnalyzer::new(&config)?;
//!     analyzer.process_all_files(&config.save_dir).await?;
//!     for (word, count) in analyzer.top_words(config.top_word_count) {
//!         println!("{word}: {count}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Word counting over fetched pages
pub mod analyzer;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Main-content extraction
pub mod extraction;
/// Page downloading
pub mod fetcher;
/// Retry logic with random backoff
pub mod retry;
/// Work items and run summaries
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use analyzer::{FrequencyTable, Tokenizer, WordBank, WordFrequencyAnalyzer};
pub use config::{Config, RetryConfig};
pub use error::{Error, Result};
pub use extraction::{ContentExtractor, Extracted, ExtractionRule, Strategy};
pub use fetcher::{
    DuplicateGroup, DuplicateRegistry, HttpPageSource, PageFetcher, PageResponse, PageSource,
    duplicate_report,
};
pub use types::{AnalysisSummary, FetchItem, FetchOutcome, FetchSummary, ItemReport};
