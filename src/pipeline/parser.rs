//! HTML parser for extracting visible text
//!
//! This module turns a fetched HTML document into the plain text handed to the
//! classifier.

use scraper::{ElementRef, Html, Selector};

/// Elements whose text is collected first
const TEXT_SELECTOR: &str = "p, span, h1, h2, h3, h4";

/// Extracts the visible text of an HTML document
///
/// # Extraction Rules
///
/// 1. Collect the text of every `p`, `span` and `h1`-`h4` element, in
///    document order, each with its whitespace collapsed
/// 2. If that yields nothing, fall back to the whole `<body>` text
/// 3. Text inside `script`, `style`, `noscript` and `template` is never
///    collected
///
/// Nested matches (a `span` inside a `p`) contribute their text twice, which
/// is harmless for classification.
///
/// # Returns
///
/// * `Some(String)` - Non-empty text
/// * `None` - The document has no visible text
///
/// # Example
///
/// ```
/// use topic_sieve::pipeline::extract_visible_text;
///
/// let html = "<html><body><h1>Title</h1><p>Some   text</p></body></html>";
/// assert_eq!(extract_visible_text(html).as_deref(), Some("Title Some text"));
/// ```
pub fn extract_visible_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let tagged = extract_tagged_text(&document);
    if !tagged.is_empty() {
        return Some(tagged);
    }

    extract_body_text(&document).filter(|text| !text.is_empty())
}

/// Joins the text of the common text-bearing elements
fn extract_tagged_text(document: &Html) -> String {
    let Ok(selector) = Selector::parse(TEXT_SELECTOR) else {
        return String::new();
    };

    document
        .select(&selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns all text under `<body>`
fn extract_body_text(document: &Html) -> Option<String> {
    let selector = Selector::parse("body").ok()?;
    document.select(&selector).next().map(element_text)
}

/// Collects the visible text under an element with whitespace collapsed
fn element_text(element: ElementRef<'_>) -> String {
    let mut words = Vec::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| is_hidden_element(ancestor.value().name()));
        if hidden {
            continue;
        }

        words.extend(text.split_whitespace());
    }

    words.join(" ")
}

/// Returns true for elements whose text is never displayed
fn is_hidden_element(name: &str) -> bool {
    matches!(name, "script" | "style" | "noscript" | "template")
}

/// Cuts text to at most `max_chars` characters
///
/// Counts `char`s, so a multi-byte character is never split.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
