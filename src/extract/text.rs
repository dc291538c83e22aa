//! Plain-text helpers: whitespace collapsing and sentence splitting.

use scraper::ElementRef;

/// Sentence terminators, CJK full-width and ASCII.
pub const SENTENCE_TERMINATORS: [char; 6] = ['。', '！', '？', '.', '!', '?'];

/// Collapse every run of whitespace to a single space and trim both ends. Control characters
/// that are not whitespace (e.g. U+0007) are dropped.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace()
        .map(|w| w.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// All descendant text of `el` with whitespace collapsed.
pub fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

fn is_terminator(c: char) -> bool {
    SENTENCE_TERMINATORS.contains(&c)
}

/// Split `text` after every run of terminators. Each unit keeps its own terminators; text after
/// the last terminator becomes the final unit. Blank units are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if is_terminator(c) && !chars.peek().copied().is_some_and(is_terminator) {
            push_unit(&mut units, &current);
            current.clear();
        }
    }
    push_unit(&mut units, &current);
    units
}

fn push_unit(units: &mut Vec<String>, unit: &str) {
    let unit = unit.trim();
    if !unit.is_empty() {
        units.push(unit.to_string());
    }
}
