//! Punctuation vocabulary: bracket pairs and identifier characters.
//!
//! ## Notes
//! - This module is vocabulary only. It does not scan source text.
//!
//! ## Examples
//! ```rust
//! use bhs_core::lang::punctuation::{self, BracketId};
//!
//! assert_eq!(punctuation::from_open('{'), Some(BracketId::Brace));
//! assert_eq!(punctuation::close(BracketId::Paren), ')');
//! ```

/// Stable identifier for a bracket pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketId {
    Paren,
    Bracket,
    Brace,
}

/// Metadata for a bracket pair.
#[derive(Debug, Clone, Copy)]
pub struct BracketInfo {
    pub id: BracketId,
    pub open: char,
    pub close: char,
}

/// Registry of all bracket pairs checked by the validator.
pub const BRACKETS: &[BracketInfo] = &[
    BracketInfo {
        id: BracketId::Brace,
        open: '{',
        close: '}',
    },
    BracketInfo {
        id: BracketId::Bracket,
        open: '[',
        close: ']',
    },
    BracketInfo {
        id: BracketId::Paren,
        open: '(',
        close: ')',
    },
];

/// Marks a pointer declarator (`int *p`); pointers are not part of the language.
pub const POINTER_MARKER: char = '*';

/// Non-alphanumeric characters that may appear inside an identifier token (`#define`-style and `@` names).
pub const IDENTIFIER_MARKERS: &[char] = &['#', '@'];

/// Opening character of a bracket pair.
pub fn open(id: BracketId) -> char {
    info_for(id).open
}

/// Closing character of a bracket pair.
pub fn close(id: BracketId) -> char {
    info_for(id).close
}

/// Resolve an opening character to its bracket pair.
pub fn from_open(c: char) -> Option<BracketId> {
    BRACKETS.iter().find(|b| b.open == c).map(|b| b.id)
}

/// Resolve a closing character to its bracket pair.
pub fn from_close(c: char) -> Option<BracketId> {
    BRACKETS.iter().find(|b| b.close == c).map(|b| b.id)
}

/// `true` for characters that make up a cursor token: ASCII letters, digits, `_` and the identifier markers.
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || IDENTIFIER_MARKERS.contains(&c)
}

fn info_for(id: BracketId) -> &'static BracketInfo {
    BRACKETS.iter().find(|b| b.id == id).expect("bracket info missing")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_round_trip() {
        for b in BRACKETS {
            assert_eq!(from_open(b.open), Some(b.id));
            assert_eq!(from_close(b.close), Some(b.id));
        }
        assert_eq!(from_open('}'), None);
        assert_eq!(from_close('<'), None);
    }

    #[test]
    fn test_identifier_chars() {
        assert!(is_identifier_char('a'));
        assert!(is_identifier_char('#'));
        assert!(is_identifier_char('@'));
        assert!(is_identifier_char('_'));
        assert!(!is_identifier_char('('));
        assert!(!is_identifier_char('*'));
    }
}
