//! Analysis pipeline — word frequencies across every fetched page.
//!
//! - [`tokenizer`] - Word splitting and word bank filtering
//! - [`frequency`] - The shared word → count table and its ranking
//! - [`word_bank`] - Controlled vocabulary loading
//!
//! Each artifact is parsed on the blocking pool, at most `num_threads` at a time.
//! Workers merge their words into one [`FrequencyTable`] under a mutex, so the
//! final counts do not depend on processing order. Not-found markers and
//! interrupted writes are never analyzed.

mod frequency;
mod tokenizer;
mod word_bank;


pub use frequency::FrequencyTable;
pub use tokenizer::Tokenizer;
pub use word_bank::WordBank;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::extraction::{ContentExtractor, Extracted};
use crate::types::AnalysisSummary;
use crate::utils::{is_not_found_marker, is_partial_artifact};

/// Result of analyzing one page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentReport {
    /// Words merged into the table
    pub words: usize,
    /// Whether the full-text fallback was used
    pub fallback: bool,
}

/// Bounded-concurrency word counter over a directory of artifacts
///
/// Counts accumulate across calls to [`process_all_files`](Self::process_all_files).
pub struct WordFrequencyAnalyzer {
    num_threads: usize,
    extractor: Arc<ContentExtractor>,
    tokenizer: Arc<Tokenizer>,
    table: Arc<Mutex<FrequencyTable>>,
}

impl WordFrequencyAnalyzer {
    /// Create an analyzer with the standard extraction chain and the configured word bank
    pub fn new(config: &Config) -> Result<Self> {
        let word_bank = config
            .word_bank_file_path
            .as_deref()
            .map(WordBank::load)
            .transpose()?
            .map(Arc::new);
        Self::with_parts(
            config,
            ContentExtractor::standard()?,
            Tokenizer::new(word_bank)?,
        )
    }

    /// Create an analyzer from explicit parts
    pub fn with_parts(
        config: &Config,
        extractor: ContentExtractor,
        tokenizer: Tokenizer,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            num_threads: config.num_threads,
            extractor: Arc::new(extractor),
            tokenizer: Arc::new(tokenizer),
            table: Arc::new(Mutex::new(FrequencyTable::new())),
        })
    }

    /// Analyze every regular, non-marker file in `dir`
    ///
    /// Only failing to list `dir` is an error; unreadable files are logged and counted.
    pub async fn process_all_files(&self, dir: &Path) -> Result<AnalysisSummary> {
        let mut summary = AnalysisSummary::default();
        let files = list_artifacts(dir, &mut summary).await?;
        info!(
            files = files.len(),
            skipped = summary.skipped,
            workers = self.num_threads,
            word_bank = self.tokenizer.is_filtered(),
            dir = %dir.display(),
            "starting analysis run"
        );

        let results: Vec<(PathBuf, Result<DocumentReport>)> = stream::iter(files)
            .map(|path| {
                let extractor = Arc::clone(&self.extractor);
                let tokenizer = Arc::clone(&self.tokenizer);
                let table = Arc::clone(&self.table);
                async move {
                    let task_path = path.clone();
                    let result = tokio::task::spawn_blocking(move || {
                        analyze_file(&task_path, &extractor, &tokenizer, &table)
                    })
                    .await
                    .map_err(|e| Error::Worker(e.to_string()))
                    .and_then(|inner| inner);
                    (path, result)
                }
            })
            .buffer_unordered(self.num_threads)
            .collect()
            .await;

        for (path, result) in results {
            match result {
                Ok(report) => {
                    summary.processed += 1;
                    if report.fallback {
                        summary.fallback_used += 1;
                    }
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "failed to analyze file");
                    summary.failed += 1;
                }
            }
        }

        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed,
            fallback_used = summary.fallback_used,
            distinct_words = self.lock_table().len(),
            "analysis run finished"
        );
        Ok(summary)
    }

    /// Extract, tokenize and count one page held in memory
    pub fn process_document(&self, html: &str) -> DocumentReport {
        merge_document(html, &self.extractor, &self.tokenizer, &self.table).1
    }

    /// The `n` most frequent words so far, highest first
    pub fn top_words(&self, n: usize) -> Vec<(String, u64)> {
        self.lock_table().most_common(n)
    }

    /// Snapshot of the frequency table
    pub fn table(&self) -> FrequencyTable {
        self.lock_table().clone()
    }

    fn lock_table(&self) -> MutexGuard<'_, FrequencyTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Regular files of `dir` worth analyzing, sorted by name
async fn list_artifacts(dir: &Path, summary: &mut AnalysisSummary) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| Error::storage(dir, e))?;
    let mut files = Vec::new();

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| Error::storage(dir, e))?
    {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let is_file = match entry.file_type().await {
            Ok(file_type) => file_type.is_file(),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cannot stat entry, skipping");
                false
            }
        };

        if !is_file || is_not_found_marker(&name) || is_partial_artifact(&name) {
            debug!(path = %path.display(), "skipping");
            summary.skipped += 1;
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

fn analyze_file(
    path: &Path,
    extractor: &ContentExtractor,
    tokenizer: &Tokenizer,
    table: &Mutex<FrequencyTable>,
) -> Result<DocumentReport> {
    info!(path = %path.display(), "processing file");
    let bytes = std::fs::read(path).map_err(|e| Error::storage(path, e))?;
    let html = String::from_utf8_lossy(&bytes);

    let (extracted, report) = merge_document(&html, extractor, tokenizer, table);
    debug!(
        path = %path.display(),
        strategy = ?extracted.strategy,
        words = report.words,
        "file analyzed"
    );
    Ok(report)
}

fn merge_document(
    html: &str,
    extractor: &ContentExtractor,
    tokenizer: &Tokenizer,
    table: &Mutex<FrequencyTable>,
) -> (Extracted, DocumentReport) {
    let extracted = extractor.extract(html);
    let words = tokenizer.tokenize(&extracted.text);
    let report = DocumentReport {
        words: words.len(),
        fallback: extracted.is_fallback(),
    };

    // Tokenize outside the lock; only the merge is serialized
    table
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .merge(words);
    (extracted, report)
}
