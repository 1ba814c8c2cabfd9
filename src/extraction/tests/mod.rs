use crate::extraction::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn page(body: &str) -> String {
    format!("<!DOCTYPE html><html><head><title>Site</title></head><body>{body}</body></html>")
}

fn standard() -> ContentExtractor {
    ContentExtractor::standard().unwrap()
}

// ---------------------------------------------------------------------------
// Structural rules
// ---------------------------------------------------------------------------

#[test]
fn first_template_wrapper_wins() {
    let html = page(
        r#"<nav>Menu</nav><div class="caas-content-wrapper"><p>The <em>story</em> text</p></div>
           <section class="articles">other</section>"#,
    );

    let extracted = standard().extract(&html);

    assert_eq!(extracted.text, "The story text");
    assert_eq!(
        extracted.strategy,
        Strategy::UniqueElement(CONTENT_WRAPPER_SELECTOR.to_string())
    );
}

#[test]
fn second_template_used_when_first_is_absent() {
    let html = page(r#"<header>Top</header><section class="articles">Second layout body</section>"#);

    let extracted = standard().extract(&html);

    assert_eq!(extracted.text, "Second layout body");
    assert_eq!(
        extracted.strategy,
        Strategy::UniqueElement(ARTICLES_SECTION_SELECTOR.to_string())
    );
    assert!(!extracted.is_fallback());
}

#[test]
fn third_template_selector_handles_parentheses() {
    let html = page(r#"<main class="W(100%)">Wide main body</main>"#);

    let extracted = standard().extract(&html);

    assert_eq!(extracted.text, "Wide main body");
    assert_eq!(
        extracted.strategy,
        Strategy::UniqueElement(FULL_WIDTH_MAIN_SELECTOR.to_string())
    );
}

#[test]
fn ambiguous_matches_fall_through() {
    // Two wrappers: the first rule must not guess, the single section wins instead
    let html = page(
        r#"<div class="caas-content-wrapper">a</div><div class="caas-content-wrapper">b</div>
           <section class="articles">unambiguous</section>"#,
    );

    let extracted = standard().extract(&html);

    assert_eq!(extracted.text, "unambiguous");
}

#[test]
fn class_must_match_exactly() {
    // Attribute equality, not class membership
    let html = page(r#"<section class="articles wide">Not the template</section>"#);

    let extracted = standard().extract(&html);

    assert!(extracted.is_fallback());
}

#[test]
fn structural_text_includes_nested_elements() {
    let html = page(
        r#"<div class="caas-content-wrapper"><h1>Title</h1><div><p>Para <a href="x">link</a>.</p></div></div>"#,
    );

    assert_eq!(standard().extract(&html).text, "TitlePara link.");
}

// ---------------------------------------------------------------------------
// Phrase rules
// ---------------------------------------------------------------------------

#[test]
fn read_full_article_phrase_pair() {
    let html = page("<p>Read full article Phones got faster. Latest Stories</p><p>more</p>");

    let extracted = standard().extract(&html);

    assert_eq!(extracted.text, " Phones got faster. ");
    assert!(matches!(extracted.strategy, Strategy::BetweenPhrases(ref l) if l.starts_with("Read full article")));
}

#[test]
fn first_phrase_pair_must_be_on_one_line() {
    let html = page("<p>Read full article\nsplit</p><p>Latest Stories</p>");

    let extracted = standard().extract(&html);

    assert!(extracted.is_fallback(), "got {:?}", extracted.strategy);
}

#[test]
fn second_phrase_pair_spans_lines() {
    let html = page(
        "<p>See all articles</p>\n<article>Line one\nLine two</article>\n<p>View All Comments</p>",
    );

    let extracted = standard().extract(&html);

    assert_eq!(extracted.text, "\nLine one\nLine two\n");
    assert!(matches!(extracted.strategy, Strategy::BetweenPhrases(ref l) if l.starts_with("See all articles")));
}

#[test]
fn phrase_match_ignores_script_text() {
    let html = page(
        "<script>var s = 'Read full article hidden Latest Stories';</script><p>plain page</p>",
    );

    let extracted = standard().extract(&html);

    assert!(extracted.is_fallback());
    assert!(!extracted.text.contains("hidden"));
}

#[test]
fn structural_rules_take_priority_over_phrases() {
    let html = page(
        r#"<p>Read full article ignored Latest Stories</p><section class="articles">chosen</section>"#,
    );

    assert_eq!(standard().extract(&html).text, "chosen");
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

#[test]
fn unrecognized_page_returns_full_visible_text() {
    let html = page("<h1>Heading</h1><p>Some words</p><style>.x{}</style>");

    let extracted = standard().extract(&html);

    assert_eq!(extracted.strategy, Strategy::FullText);
    assert_eq!(extracted.text, "SiteHeadingSome words");
}

#[test]
fn garbage_input_never_panics() {
    let extracted = standard().extract("<<<>>> not html at all </div></div>");
    assert!(extracted.is_fallback());
    assert!(extracted.text.contains("not html at all"));
}

#[test]
fn empty_chain_always_falls_back() {
    let extractor = ContentExtractor::new(Vec::new());
    let extracted = extractor.extract(&page("<p>x</p>"));
    assert_eq!(extracted.strategy, Strategy::FullText);
}

// ---------------------------------------------------------------------------
// Rule construction
// ---------------------------------------------------------------------------

#[test]
fn invalid_selector_is_rejected() {
    match ExtractionRule::unique_element("div[") {
        Err(crate::error::Error::Selector { selector, .. }) => assert_eq!(selector, "div["),
        other => panic!("expected selector error, got {other:?}"),
    }
}

#[test]
fn phrases_are_matched_literally() {
    let rule = ExtractionRule::between_phrases("a.b(", ")c", false).unwrap();
    let extractor = ContentExtractor::new(vec![rule]);

    let extracted = extractor.extract(&page("<p>a.b( inside )c</p>"));
    assert_eq!(extracted.text, " inside ");

    let missed = extractor.extract(&page("<p>axb( inside )c</p>"));
    assert!(missed.is_fallback());
}

#[test]
fn standard_chain_order() {
    let extractor = standard();
    let kinds: Vec<&str> = extractor
        .rules()
        .iter()
        .map(|r| match r {
            ExtractionRule::UniqueElement { .. } => "element",
            ExtractionRule::BetweenPhrases { .. } => "phrases",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["element", "element", "element", "phrases", "phrases"]
    );
}
