//! HTML parser for extracting visible text and links
//!
//! Parsing is kept separate from scope decisions: this module hands back the
//! raw `href` strings exactly as written, and the link classifier decides
//! what to do with them.

use scraper::{Html, Node, Selector};

/// Elements whose text content is never part of the visible page text
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Visible text, text nodes concatenated in document order
    pub text: String,

    /// Raw `href` values of `<a>` tags, in document order
    pub links: Vec<String>,
}

/// Parses HTML content and extracts visible text and raw links
///
/// # Link Collection Rules
///
/// - Only `<a href="...">` is collected
/// - Hrefs containing `#` anywhere are dropped, so in-page anchors and
///   fragment variants of a page never reach the frontier
/// - Values are not resolved or validated here
///
/// # Example
///
/// ```
/// use site_harvest::crawler::parse_html;
///
/// let html = r#"<html><body><p>Hello</p><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.text, "HelloLink");
/// assert_eq!(parsed.links, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        text: extract_text(&document),
        links: collect_links(&document),
    }
}

/// Concatenates every text node outside script-like elements
fn extract_text(document: &Html) -> String {
    let mut text = String::new();

    for node in document.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });

        if !hidden {
            text.push_str(fragment);
        }
    }

    text
}

/// Collects raw hrefs from anchor tags
fn collect_links(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.contains('#'))
        .map(str::to_string)
        .collect()
}
