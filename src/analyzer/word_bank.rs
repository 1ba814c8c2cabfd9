//! Controlled vocabulary loaded from a line-delimited file.

use crate::error::Result;
use crate::utils::read_lines;
use std::collections::HashSet;
use std::path::Path;

/// Set of words allowed to be counted
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordBank {
    words: HashSet<String>,
}

impl WordBank {
    /// Build a bank from words; entries are trimmed and lowercased, blanks dropped
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Load one word per line
    pub fn load(path: &Path) -> Result<Self> {
        let bank = Self::from_words(read_lines(path)?);
        tracing::debug!(path = %path.display(), words = bank.len(), "loaded word bank");
        Ok(bank)
    }

    /// Whether `word` (already lowercase) is in the bank
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the bank has no words
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
