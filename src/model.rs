//! Data model shared by extraction and packaging.
//!
//! A [Document] is produced once per run by [extract](crate::extract::extract) and consumed once
//! by the EPUB writer.

use serde::Deserialize;

/// Title used when the page has no usable `<title>`.
pub const UNTITLED: &str = "Untitled";

/// Characters that are deleted from titles so they are safe as file names.
pub const ILLEGAL_TITLE_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum number of characters of the title used for the default output file name.
pub const FILE_STEM_MAX_CHARS: usize = 50;

/// How text blocks are pulled out of the main-content root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Structured extraction, falling back to flattened when it finds nothing.
    #[default]
    Auto,
    /// Headings, paragraphs, list items and blockquotes only. Never falls back.
    Structured,
    /// All visible text, split into sentence-like units.
    Flattened,
}

/// How the blocks of a [Document] are rendered in the chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One `<p>` per block (structured extraction).
    Paragraphs,
    /// One `<pre>` holding every block on its own line (flattened extraction).
    Preformatted,
}

/// Result of extraction: a sanitised title and the ordered text blocks of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Never contains any of [ILLEGAL_TITLE_CHARS].
    pub title: String,
    pub source_url: String,
    pub blocks: Vec<String>,
    pub layout: Layout,
}

impl Document {
    /// Total number of characters across all blocks.
    pub fn char_count(&self) -> usize {
        self.blocks.iter().map(|b| b.chars().count()).sum()
    }

    /// `{title}.epub` with the title cut to [FILE_STEM_MAX_CHARS] characters. A cut that lands
    /// after a space does not leave it before the extension.
    pub fn default_file_name(&self) -> String {
        let stem: String = sanitize_title(&self.title)
            .chars()
            .take(FILE_STEM_MAX_CHARS)
            .collect();
        format!("{}.epub", stem.trim_end())
    }
}

/// Delete every character in [ILLEGAL_TITLE_CHARS]. Nothing is substituted.
/// An empty result becomes [UNTITLED].
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !ILLEGAL_TITLE_CHARS.contains(c))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        UNTITLED.to_string()
    } else {
        cleaned.to_string()
    }
}
