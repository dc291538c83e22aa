//! Tree queries over the parsed page: noise removal and main-content root selection.

use scraper::{ElementRef, Html, Selector};

/// Subtrees whose text never reaches the output.
pub const NOISE_SELECTOR: &str = "script, style, nav, footer, header, aside, iframe, noscript";

/// Candidate main-content roots, most specific first. The first one that matches wins.
pub const CONTENT_ROOTS: [&str; 4] = ["main", "article", "div.content", "body"];

/// Block-level elements collected by structured extraction.
pub const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, li, blockquote";

/// Parse a CSS selector. The selectors used here are constants, so a failure is logged and
/// treated as "matches nothing" rather than surfaced to the caller.
pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::warn!(css, error = %e, "invalid selector");
            None
        }
    }
}

/// Detach every subtree matching [NOISE_SELECTOR]. Returns how many subtrees were removed.
pub fn strip_noise(doc: &mut Html) -> usize {
    let Some(sel) = selector(NOISE_SELECTOR) else {
        return 0;
    };
    let ids: Vec<_> = doc.select(&sel).map(|el| el.id()).collect();
    let mut removed = 0;
    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
            removed += 1;
        }
    }
    removed
}

/// First element matching one of [CONTENT_ROOTS], tried in order.
pub fn main_content(doc: &Html) -> Option<ElementRef<'_>> {
    CONTENT_ROOTS.iter().find_map(|css| {
        let sel = selector(css)?;
        let found = doc.select(&sel).next();
        if found.is_some() {
            tracing::debug!(root = css, "main content root");
        }
        found
    })
}
