//! Whole-document text rendering.

use scraper::{Html, Node};

/// Elements whose text never shows on the rendered page
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Concatenate every text node of the document in order, skipping script-like content
pub fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.tree.root().descendants() {
        let Node::Text(chunk) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            text.push_str(chunk);
        }
    }
    text
}
