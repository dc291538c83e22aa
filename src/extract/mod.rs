//! Markup to [Document]: title, noise removal, main-content selection, then structured or
//! flattened text extraction. Pure; never fails.

pub mod select;
pub mod text;

use crate::model::{sanitize_title, Document, ExtractionMode, Layout, UNTITLED};
use scraper::{ElementRef, Html};
use select::{main_content, selector, strip_noise, BLOCK_SELECTOR};
use text::{collapse_whitespace, element_text, split_sentences};

/// Blocks whose collapsed text is this many characters or fewer are treated as noise.
pub const MIN_BLOCK_CHARS: usize = 10;

/// Extract a [Document] from raw markup. Malformed or empty markup yields empty blocks.
pub fn extract(html: &str, source_url: &str, mode: ExtractionMode) -> Document {
    let mut doc = Html::parse_document(html);
    let title = sanitize_title(&page_title(&doc));
    let removed = strip_noise(&mut doc);
    tracing::debug!(removed, "stripped noise subtrees");

    let root = main_content(&doc);
    let (blocks, layout) = match mode {
        ExtractionMode::Structured => (structured_blocks(root), Layout::Paragraphs),
        ExtractionMode::Flattened => (flattened_blocks(root), Layout::Preformatted),
        ExtractionMode::Auto => {
            let blocks = structured_blocks(root);
            if blocks.is_empty() {
                tracing::debug!("no block elements with text; using flattened extraction");
                (flattened_blocks(root), Layout::Preformatted)
            } else {
                (blocks, Layout::Paragraphs)
            }
        }
    };
    if blocks.is_empty() {
        tracing::warn!(source_url, "no readable text found");
    }

    Document {
        title,
        source_url: source_url.to_string(),
        blocks,
        layout,
    }
}

/// Text of the first `<title>`, or [UNTITLED] when missing or blank.
fn page_title(doc: &Html) -> String {
    selector("title")
        .and_then(|sel| doc.select(&sel).next().map(element_text))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Headings, paragraphs, list items and blockquotes in document order, short ones dropped.
fn structured_blocks(root: Option<ElementRef<'_>>) -> Vec<String> {
    let (Some(root), Some(sel)) = (root, selector(BLOCK_SELECTOR)) else {
        return Vec::new();
    };
    root.select(&sel)
        .map(element_text)
        .filter(|t| t.chars().count() > MIN_BLOCK_CHARS)
        .collect()
}

/// All text of the root, whitespace collapsed, split into sentence-like units.
fn flattened_blocks(root: Option<ElementRef<'_>>) -> Vec<String> {
    let text = root.map(element_text).unwrap_or_default();
    split_sentences(&collapse_whitespace(&text))
}
