//! Word tokenizer.

use super::WordBank;
use crate::error::Result;
use regex::Regex;
use std::sync::Arc;

/// A word is a maximal run of at least three ASCII letters in the lowercased text
const WORD_PATTERN: &str = "[a-z]{3,}";

/// Splits text into countable words, optionally restricted to a [`WordBank`]
///
/// No stemming and no per-document deduplication: every occurrence counts.
#[derive(Clone, Debug)]
pub struct Tokenizer {
    pattern: Regex,
    word_bank: Option<Arc<WordBank>>,
}

impl Tokenizer {
    /// Create a tokenizer; an empty bank filters nothing, same as no bank
    pub fn new(word_bank: Option<Arc<WordBank>>) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(WORD_PATTERN)?,
            word_bank: word_bank.filter(|bank| !bank.is_empty()),
        })
    }

    /// Whether tokens are filtered by a word bank
    pub fn is_filtered(&self) -> bool {
        self.word_bank.is_some()
    }

    /// Words of `text`, in order of appearance
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|word| {
                self.word_bank
                    .as_ref()
                    .is_none_or(|bank| bank.contains(word))
            })
            .map(str::to_string)
            .collect()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "The Cat sat on a mat123 ox";

    #[test]
    fn keeps_lowercase_alphabetic_runs_of_three_or_more() {
        let tokenizer = Tokenizer::new(None).unwrap();
        assert_eq!(tokenizer.tokenize(SAMPLE), vec!["the", "cat", "sat", "mat"]);
    }

    #[test]
    fn word_bank_restricts_tokens() {
        let bank = Arc::new(WordBank::from_words(["cat", "mat"]));
        let tokenizer = Tokenizer::new(Some(bank)).unwrap();
        assert!(tokenizer.is_filtered());
        assert_eq!(tokenizer.tokenize(SAMPLE), vec!["cat", "mat"]);
    }

    #[test]
    fn empty_word_bank_filters_nothing() {
        let bank = Arc::new(WordBank::from_words(Vec::<String>::new()));
        let tokenizer = Tokenizer::new(Some(bank)).unwrap();
        assert!(!tokenizer.is_filtered());
        assert_eq!(tokenizer.tokenize(SAMPLE).len(), 4);
    }

    #[test]
    fn repeated_words_are_all_kept() {
        let tokenizer = Tokenizer::new(None).unwrap();
        assert_eq!(
            tokenizer.tokenize("news NEWS News"),
            vec!["news", "news", "news"]
        );
    }

    #[test]
    fn punctuation_and_digits_split_words() {
        let tokenizer = Tokenizer::new(None).unwrap();
        assert_eq!(
            tokenizer.tokenize("don't stop-believing 4ever abc1def"),
            vec!["don", "stop", "believing", "ever", "abc", "def"]
        );
    }

    #[test]
    fn non_ascii_letters_break_runs() {
        let tokenizer = Tokenizer::new(None).unwrap();
        assert_eq!(tokenizer.tokenize("café naïve"), vec!["caf"]);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        let tokenizer = Tokenizer::new(None).unwrap();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("a an on 12 !!").is_empty());
    }
}
