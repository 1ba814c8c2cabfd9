//! Main-content extraction from saved pages
//!
//! Pages come from several site templates. Each template is recognized by an
//! ordered list of [`ExtractionRule`]s; the first rule that yields a confident
//! match wins, and a page no rule recognizes falls back to its whole visible text.
//! Extraction therefore never fails: unknown layouts cost precision, not a crash.
//!
//! # Example
//!
//! ```
//! use page_harvester::extraction::{ContentExtractor, Strategy};
//!
//! let extractor = ContentExtractor::standard().unwrap();
//! let html = r#"<html><body><section class="articles">Body text</section></body></html>"#;
//! let extracted = extractor.extract(html);
//! assert_eq!(extracted.text, "Body text");
//! assert!(matches!(extracted.strategy, Strategy::UniqueElement(_)));
//! ```

mod visible_text;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use visible_text::visible_text;

use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use scraper::{Html, Selector};
use tracing::debug;

/// Content wrapper of the first article template
pub const CONTENT_WRAPPER_SELECTOR: &str = r#"div[class="caas-content-wrapper"]"#;

/// Article list section of the second template
pub const ARTICLES_SECTION_SELECTOR: &str = r#"section[class="articles"]"#;

/// Full-width main element of the third template
pub const FULL_WIDTH_MAIN_SELECTOR: &str = r#"main[class="W(100%)"]"#;

/// Which rule produced the extracted text
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// A selector matched exactly one element
    UniqueElement(String),
    /// Text found between a start and an end phrase
    BetweenPhrases(String),
    /// Nothing matched; the whole visible text was used
    FullText,
}

/// Text chosen for a page and how it was found
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extracted {
    /// The extracted text
    pub text: String,
    /// The rule that produced it
    pub strategy: Strategy,
}

impl Extracted {
    /// Whether the full-text fallback was used
    pub fn is_fallback(&self) -> bool {
        self.strategy == Strategy::FullText
    }
}

/// One step of the extraction chain
#[derive(Clone, Debug)]
pub enum ExtractionRule {
    /// Text of the single element matching a CSS selector
    ///
    /// Zero or several matches mean the page is not this template, so the rule passes.
    UniqueElement {
        /// Selector source, used as the rule label
        css: String,
        /// Parsed selector
        selector: Selector,
    },
    /// Text strictly between two phrases in the page's visible text
    BetweenPhrases {
        /// `start…end` label
        label: String,
        /// `start(.+)end`, greedy
        pattern: Regex,
    },
}

impl ExtractionRule {
    /// Rule matching exactly one element
    pub fn unique_element(css: &str) -> Result<Self> {
        let selector = Selector::parse(css).map_err(|e| Error::Selector {
            selector: css.to_string(),
            reason: e.to_string(),
        })?;
        Ok(ExtractionRule::UniqueElement {
            css: css.to_string(),
            selector,
        })
    }

    /// Rule capturing the text between `start` and `end`
    ///
    /// With `across_lines` false the captured text must sit on a single line.
    pub fn between_phrases(start: &str, end: &str, across_lines: bool) -> Result<Self> {
        let pattern = RegexBuilder::new(&format!(
            "{}(.+){}",
            regex::escape(start),
            regex::escape(end)
        ))
        .dot_matches_new_line(across_lines)
        .build()?;
        Ok(ExtractionRule::BetweenPhrases {
            label: format!("{start}…{end}"),
            pattern,
        })
    }

    fn strategy(&self) -> Strategy {
        match self {
            ExtractionRule::UniqueElement { css, .. } => Strategy::UniqueElement(css.clone()),
            ExtractionRule::BetweenPhrases { label, .. } => Strategy::BetweenPhrases(label.clone()),
        }
    }
}

/// Ordered, confidence-gated extraction chain
#[derive(Clone, Debug)]
pub struct ContentExtractor {
    rules: Vec<ExtractionRule>,
}

impl ContentExtractor {
    /// Chain over custom rules (the full-text fallback is always appended)
    pub fn new(rules: Vec<ExtractionRule>) -> Self {
        Self { rules }
    }

    /// The chain for the known article templates
    pub fn standard() -> Result<Self> {
        Ok(Self::new(vec![
            ExtractionRule::unique_element(CONTENT_WRAPPER_SELECTOR)?,
            ExtractionRule::unique_element(ARTICLES_SECTION_SELECTOR)?,
            ExtractionRule::unique_element(FULL_WIDTH_MAIN_SELECTOR)?,
            ExtractionRule::between_phrases("Read full article", "Latest Stories", false)?,
            ExtractionRule::between_phrases("See all articles", "View All Comments", true)?,
        ]))
    }

    /// Rules in the order they are tried
    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    /// Pick the main content of `html`
    pub fn extract(&self, html: &str) -> Extracted {
        let document = Html::parse_document(html);
        // Phrase rules and the fallback share one rendering of the visible text
        let mut full_text: Option<String> = None;

        for rule in &self.rules {
            let found = match rule {
                ExtractionRule::UniqueElement { selector, .. } => {
                    unique_element_text(&document, selector)
                }
                ExtractionRule::BetweenPhrases { pattern, .. } => {
                    let text = full_text.get_or_insert_with(|| visible_text(&document));
                    pattern
                        .captures(text)
                        .and_then(|caps| caps.get(1))
                        .map(|m| m.as_str().to_string())
                }
            };
            if let Some(text) = found {
                return Extracted {
                    text,
                    strategy: rule.strategy(),
                };
            }
        }

        debug!("no extraction rule matched, using full visible text");
        Extracted {
            text: full_text.unwrap_or_else(|| visible_text(&document)),
            strategy: Strategy::FullText,
        }
    }
}

/// All text under the only element matching `selector`, or `None` for zero or many matches
fn unique_element_text(document: &Html, selector: &Selector) -> Option<String> {
    let mut matches = document.select(selector);
    let element = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Some(element.text().collect())
}
