//! Word frequency table.

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    count: u64,
    first_seen: usize,
}

/// Word → occurrence count
///
/// Merging is plain addition, so any merge order gives the same counts. The table
/// is not synchronized itself; shared use goes through a mutex around [`merge`].
///
/// [`merge`]: FrequencyTable::merge
#[derive(Clone, Debug, Default)]
pub struct FrequencyTable {
    entries: HashMap<String, Entry>,
    next_seen: usize,
}

impl FrequencyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence for every word in `words`
    pub fn merge<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next_seen = &mut self.next_seen;
        for word in words {
            let entry = self.entries.entry(word.into()).or_insert_with(|| {
                let first_seen = *next_seen;
                *next_seen += 1;
                Entry {
                    count: 0,
                    first_seen,
                }
            });
            entry.count += 1;
        }
    }

    /// Occurrences of `word`
    pub fn count(&self, word: &str) -> u64 {
        self.entries.get(word).map_or(0, |e| e.count)
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been counted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.values().map(|e| e.count).sum()
    }

    /// Plain word → count view
    pub fn counts(&self) -> HashMap<String, u64> {
        self.entries
            .iter()
            .map(|(word, e)| (word.clone(), e.count))
            .collect()
    }

    /// The `n` most frequent words, highest count first
    ///
    /// Equal counts keep the order in which the words were first merged, so the
    /// ranking is deterministic for a given merge sequence but not alphabetical.
    pub fn most_common(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(&String, &Entry)> = self.entries.iter().collect();
        ranked.sort_by(|(_, a), (_, b)| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });
        ranked
            .into_iter()
            .take(n)
            .map(|(word, e)| (word.clone(), e.count))
            .collect()
    }
}
