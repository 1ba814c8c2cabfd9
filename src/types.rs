//! Core types for page-harvester

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One URL from the input list plus its 1-based position (used for log correlation only)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchItem {
    /// 1-based position in the input list
    pub index: usize,
    /// URL as read from the list
    pub url: String,
}

impl FetchItem {
    /// Create a new FetchItem
    pub fn new(index: usize, url: impl Into<String>) -> Self {
        Self {
            index,
            url: url.into(),
        }
    }

    /// Number a list of URLs starting at 1
    pub fn from_urls<I, S>(urls: I) -> Vec<FetchItem>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        urls.into_iter()
            .enumerate()
            .map(|(i, url)| FetchItem::new(i + 1, url))
            .collect()
    }
}

/// Result of one fetch attempt sequence for a single URL
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Status 200 with the page body
    Success(Vec<u8>),
    /// Status 404; recorded with an empty marker artifact
    NotFound,
    /// Transport failure that survived every attempt
    TransientFailure(String),
    /// Any status other than 200 or 404
    UnexpectedStatus(u16),
}

impl FetchOutcome {
    /// Classify an HTTP status and body
    pub fn from_status(status: u16, body: Vec<u8>) -> Self {
        match status {
            200 => FetchOutcome::Success(body),
            404 => FetchOutcome::NotFound,
            other => FetchOutcome::UnexpectedStatus(other),
        }
    }
}

/// What the fetch pipeline did with one item
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemReport {
    /// Body written to the given artifact
    Downloaded(PathBuf),
    /// Not-found marker written to the given path
    NotFound(PathBuf),
    /// An artifact for this URL already existed; no request was made
    AlreadyPresent(PathBuf),
    /// Skipped because the run was halted
    Abandoned,
    /// The server answered with an unexpected status; the run is now halted
    UnexpectedStatus(u16),
    /// Every attempt failed with a transport error
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Last transport error
        cause: String,
    },
    /// Writing the artifact (or checking for it) failed
    Failed(String),
    /// The URL could not be mapped to a file name
    InvalidUrl(String),
}

/// Counters for a whole fetch run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSummary {
    /// Pages saved
    pub downloaded: usize,
    /// Not-found markers written
    pub not_found: usize,
    /// Items skipped because an artifact already existed
    pub already_present: usize,
    /// Items skipped after the halt flag was set
    pub abandoned: usize,
    /// Items that received an unexpected status
    pub unexpected_status: usize,
    /// Items whose attempts were all used up
    pub exhausted: usize,
    /// Items that failed for a non-transport reason (usually storage)
    pub failed: usize,
    /// Items with unusable URLs
    pub invalid: usize,
}

impl FetchSummary {
    /// Count one item report
    pub fn record(&mut self, report: &ItemReport) {
        match report {
            ItemReport::Downloaded(_) => self.downloaded += 1,
            ItemReport::NotFound(_) => self.not_found += 1,
            ItemReport::AlreadyPresent(_) => self.already_present += 1,
            ItemReport::Abandoned => self.abandoned += 1,
            ItemReport::UnexpectedStatus(_) => self.unexpected_status += 1,
            ItemReport::Exhausted { .. } => self.exhausted += 1,
            ItemReport::Failed(_) => self.failed += 1,
            ItemReport::InvalidUrl(_) => self.invalid += 1,
        }
    }

    /// Items that still need a future run
    pub fn unresolved(&self) -> usize {
        self.abandoned + self.unexpected_status + self.exhausted + self.failed
    }
}

/// Counters for a whole analysis run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Artifacts parsed and merged into the frequency table
    pub processed: usize,
    /// Not-found markers and non-regular entries that were skipped
    pub skipped: usize,
    /// Artifacts that could not be read
    pub failed: usize,
    /// Artifacts where no targeted strategy matched and the full text was used
    pub fallback_used: usize,
}
