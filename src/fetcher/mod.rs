//! Fetch pipeline — downloads every URL in a list into one artifact per URL.
//!
//! Split into focused submodules:
//! - [`http`] - The fetch capability trait and its reqwest-backed implementation
//! - [`registry`] - Duplicate short-name resolution shared by all workers
//!
//! Each URL ends as exactly one artifact: the page body for a 200, or an empty
//! `NOT_FOUND_` marker for a 404. An existing artifact makes the URL a no-op, so a
//! rerun only touches URLs that are still unresolved. Any other status halts the
//! run: items already in flight finish, nothing new starts.

mod http;
mod registry;


pub use http::{HttpPageSource, PageResponse, PageSource};
pub use registry::{DuplicateGroup, DuplicateRegistry, NameClaim, duplicate_report};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::config::{Config, RetryConfig};
use crate::error::{Error, Result};
use crate::retry::fetch_with_retry;
use crate::types::{FetchItem, FetchOutcome, FetchSummary, ItemReport};
use crate::utils::{PARTIAL_SUFFIX, normalize_url, not_found_name, read_lines};

/// Bounded-concurrency page downloader
pub struct PageFetcher {
    save_dir: PathBuf,
    retry: RetryConfig,
    num_threads: usize,
    source: Arc<dyn PageSource>,
    registry: Arc<DuplicateRegistry>,
    halted: Arc<AtomicBool>,
}

impl PageFetcher {
    /// Create a fetcher using the given page source, creating the save directory if needed
    pub async fn new(config: &Config, source: Arc<dyn PageSource>) -> Result<Self> {
        config.validate()?;
        tokio::fs::create_dir_all(&config.save_dir)
            .await
            .map_err(|e| Error::storage(&config.save_dir, e))?;

        Ok(Self {
            save_dir: config.save_dir.clone(),
            retry: config.retry.clone(),
            num_threads: config.num_threads,
            source,
            registry: Arc::new(DuplicateRegistry::new()),
            halted: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Create a fetcher that uses a default HTTP client
    pub async fn with_http(config: &Config) -> Result<Self> {
        let source = Arc::new(HttpPageSource::new()?);
        Self::new(config, source).await
    }

    /// Directory artifacts are written to
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Short-name registry for this run
    pub fn registry(&self) -> &DuplicateRegistry {
        &self.registry
    }

    /// Whether an unexpected status has stopped new work
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    /// Read a line-delimited URL list and fetch every entry
    pub async fn run(&self, url_list_file: &Path) -> Result<FetchSummary> {
        let urls = read_lines(url_list_file)?;
        debug!(total = urls.len(), path = %url_list_file.display(), "loaded URL list");
        Ok(self.fetch_all(FetchItem::from_urls(urls)).await)
    }

    /// Fetch all items with at most `num_threads` in flight
    ///
    /// Per-item failures are contained: they are logged and counted, never returned.
    pub async fn fetch_all(&self, items: Vec<FetchItem>) -> FetchSummary {
        let total = items.len();
        info!(
            total,
            workers = self.num_threads,
            save_dir = %self.save_dir.display(),
            "starting fetch run"
        );

        let reports: Vec<ItemReport> = stream::iter(items)
            .map(|item| async move { self.fetch_item(&item).await })
            .buffer_unordered(self.num_threads)
            .collect()
            .await;

        let mut summary = FetchSummary::default();
        for report in &reports {
            summary.record(report);
        }

        if self.is_halted() {
            warn!(
                abandoned = summary.abandoned,
                "fetch run halted after an unexpected response status; rerun to resume"
            );
        }
        info!(
            downloaded = summary.downloaded,
            not_found = summary.not_found,
            already_present = summary.already_present,
            unresolved = summary.unresolved(),
            "fetch run finished"
        );
        summary
    }

    /// Resolve one URL to an artifact on disk
    pub async fn fetch_item(&self, item: &FetchItem) -> ItemReport {
        let index = item.index;
        if self.is_halted() {
            debug!(index, url = %item.url, "run halted, not starting item");
            return ItemReport::Abandoned;
        }

        let url = normalize_url(&item.url);
        let claim = match self.registry.claim(url) {
            Ok(claim) => claim,
            Err(e) => {
                warn!(index, url, error = %e, "skipping URL");
                return ItemReport::InvalidUrl(e.to_string());
            }
        };

        let output_path = self.save_dir.join(&claim.file_name);
        let not_found_path = self.save_dir.join(not_found_name(&claim.file_name));
        debug!(index, path = %output_path.display(), "checking for existing artifact");

        match already_resolved(&output_path, &not_found_path).await {
            Ok(Some(existing)) => {
                debug!(index, url, path = %existing.display(), "already fetched");
                return ItemReport::AlreadyPresent(existing);
            }
            Ok(None) => {}
            Err(e) => {
                error!(index, url, error = %e, "failed to check for existing artifact");
                return ItemReport::Failed(e.to_string());
            }
        }

        let mut attempts = 0;
        let response = fetch_with_retry(&self.retry, |attempt| {
            attempts = attempt;
            let source = Arc::clone(&self.source);
            let halted = Arc::clone(&self.halted);
            async move {
                if halted.load(Ordering::Acquire) {
                    return Err(Error::Halted);
                }
                source.fetch(url).await.inspect_err(|e| {
                    debug!(index, url, attempt, error = %e, "fetch attempt failed");
                })
            }
        })
        .await;

        let outcome = match response {
            Ok(response) => FetchOutcome::from_status(response.status, response.body),
            Err(Error::Halted) => {
                debug!(index, url, "run halted between attempts, abandoning item");
                return ItemReport::Abandoned;
            }
            Err(e @ Error::Transport { .. }) => FetchOutcome::TransientFailure(e.to_string()),
            Err(e) => {
                error!(index, url, error = %e, "fetch failed");
                return ItemReport::Failed(e.to_string());
            }
        };

        self.persist(index, url, outcome, attempts, output_path, not_found_path)
            .await
    }

    async fn persist(
        &self,
        index: usize,
        url: &str,
        outcome: FetchOutcome,
        attempts: u32,
        output_path: PathBuf,
        not_found_path: PathBuf,
    ) -> ItemReport {
        match outcome {
            FetchOutcome::Success(body) => match write_artifact(&output_path, &body).await {
                Ok(()) => {
                    info!(index, url, bytes = body.len(), "downloaded");
                    ItemReport::Downloaded(output_path)
                }
                Err(e) => {
                    error!(index, url, error = %e, "failed to save page");
                    ItemReport::Failed(e.to_string())
                }
            },
            FetchOutcome::NotFound => match write_artifact(&not_found_path, &[]).await {
                Ok(()) => {
                    info!(index, url, "not found");
                    ItemReport::NotFound(not_found_path)
                }
                Err(e) => {
                    error!(index, url, error = %e, "failed to write not-found marker");
                    ItemReport::Failed(e.to_string())
                }
            },
            FetchOutcome::UnexpectedStatus(status) => {
                self.halted.store(true, Ordering::Release);
                warn!(index, url, status, "unexpected response status, halting new fetches");
                ItemReport::UnexpectedStatus(status)
            }
            FetchOutcome::TransientFailure(cause) => {
                warn!(index, url, attempts, error = %cause, "giving up after all attempts");
                ItemReport::Exhausted { attempts, cause }
            }
        }
    }
}

/// Path of whichever artifact already exists for this URL, if any
async fn already_resolved(output_path: &Path, not_found_path: &Path) -> Result<Option<PathBuf>> {
    for path in [output_path, not_found_path] {
        if tokio::fs::try_exists(path)
            .await
            .map_err(|e| Error::storage(path, e))?
        {
            return Ok(Some(path.to_path_buf()));
        }
    }
    Ok(None)
}

/// Write to a `.part` sibling and rename, so a crash never leaves a truncated artifact
/// that a rerun would mistake for a finished one
async fn write_artifact(path: &Path, contents: &[u8]) -> Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(PARTIAL_SUFFIX);
    let partial = PathBuf::from(partial);

    tokio::fs::write(&partial, contents)
        .await
        .map_err(|e| Error::storage(&partial, e))?;
    tokio::fs::rename(&partial, path)
        .await
        .map_err(|e| Error::storage(path, e))
}
