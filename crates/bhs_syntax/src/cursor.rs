//! Token-under-cursor extraction for completion and hover.

use bhs_core::lang::punctuation::is_identifier_char;

/// What the cursor is resting on, for hover lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorContext {
    /// A word directly followed by `(`.
    Function(String),
    /// Any other word.
    Symbol(String),
}

impl CursorContext {
    pub fn word(&self) -> &str {
        match self {
            CursorContext::Function(word) | CursorContext::Symbol(word) => word,
        }
    }
}

/// The identifier characters directly before `offset`; empty when the cursor does not follow one.
pub fn completion_token(text: &str, offset: usize) -> &str {
    let end = floor_boundary(text, offset);
    let start = scan_back(text, end);
    &text[start..end]
}

/// Classify the token under the character at `offset`.
///
/// ## Returns
/// - `None` if the character at `offset` is not an identifier character.
/// - `Function(word)` if the character right after the token is `(`, `Symbol(word)` otherwise.
pub fn hover_context(text: &str, offset: usize) -> Option<CursorContext> {
    let at = floor_boundary(text, offset);
    let under = text[at..].chars().next()?;
    if !is_identifier_char(under) {
        return None;
    }

    let start = scan_back(text, at);
    let end = text[at..]
        .char_indices()
        .find(|(_, c)| !is_identifier_char(*c))
        .map_or(text.len(), |(i, _)| at + i);
    let word = text[start..end].to_string();

    if text[end..].starts_with('(') {
        Some(CursorContext::Function(word))
    } else {
        Some(CursorContext::Symbol(word))
    }
}

fn scan_back(text: &str, end: usize) -> usize {
    text[..end]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map_or(end, |(i, _)| i)
}

fn floor_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
