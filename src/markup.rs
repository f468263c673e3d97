// src/markup.rs
// =============================================================================
// A fetched page body, parsed once as HTML.
//
// Both the quality filter (how much visible text is there?) and the link
// extractor (which anchors are there?) read the same parsed document, so the
// page processor parses it here and hands the result around.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM with html5ever, the same parser browsers use
// - Never fails on bad HTML; it repairs it the way a browser would
//
// Because the parser never fails, "malformed markup" only means one thing
// here: the bytes are binary (they contain a NUL), so we refuse to pretend
// they are a web page.
// =============================================================================

use scraper::{Html, Node, Selector};
use std::sync::OnceLock;

use crate::error::{PipelineError, Result};

// Text inside these elements is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

pub struct Markup {
    document: Html,
    raw_len: usize,
}

impl Markup {
    // Parses raw page bytes
    //
    // Invalid UTF-8 sequences are replaced rather than rejected: plenty of
    // real pages lie about their encoding, and the words around the bad
    // bytes are still worth counting.
    pub fn parse(content: &[u8]) -> Result<Self> {
        if content.contains(&0) {
            return Err(PipelineError::MalformedMarkup(format!(
                "{} bytes of binary content",
                content.len()
            )));
        }

        let html = String::from_utf8_lossy(content);
        Ok(Self {
            document: Html::parse_document(&html),
            raw_len: content.len(),
        })
    }

    /// Length of the original body in bytes
    pub fn raw_len(&self) -> usize {
        self.raw_len
    }

    // Collects the text a reader would see, skipping script/style bodies
    pub fn plain_text(&self) -> String {
        let mut text = String::new();

        for node in self.document.tree.root().descendants() {
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

    // Every href on an <a> element, in document order, exactly as written
    pub fn anchor_hrefs(&self) -> Vec<&str> {
        self.document
            .select(anchor_selector())
            .filter_map(|element| element.value().attr("href"))
            .collect()
    }
}

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    // The selector is a constant, so failing to parse it is a programmer error
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("valid anchor selector"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_skips_scripts_and_styles() {
        let markup = Markup::parse(
            br#"<html><head><style>body { color: red; }</style></head>
            <body><p>Visible words</p><script>var hidden = 1;</script></body></html>"#,
        )
        .unwrap();

        let text = markup.plain_text();
        assert!(text.contains("Visible words"));
        assert!(!text.contains("hidden"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_binary_content_is_malformed() {
        let result = Markup::parse(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR");
        assert!(matches!(result, Err(PipelineError::MalformedMarkup(_))));
    }

    #[test]
    fn test_broken_html_still_parses() {
        let markup = Markup::parse(b"<p>unclosed <a href='/x'>link").unwrap();
        assert_eq!(markup.anchor_hrefs(), vec!["/x"]);
        assert!(markup.plain_text().contains("unclosed"));
    }

    #[test]
    fn test_anchor_hrefs_in_document_order() {
        let markup = Markup::parse(
            br#"<a href="/one">1</a><a name="no-href">x</a><a href="/two">2</a><a href="/one">1</a>"#,
        )
        .unwrap();
        assert_eq!(markup.anchor_hrefs(), vec!["/one", "/two", "/one"]);
    }

    #[test]
    fn test_raw_len_counts_bytes() {
        let markup = Markup::parse("<p>é</p>".as_bytes()).unwrap();
        assert_eq!(markup.raw_len(), 9);
    }
}
