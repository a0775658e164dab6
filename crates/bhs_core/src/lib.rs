//! Provide the canonical language vocabulary for the BHS script tooling.
//!
//! This crate is intentionally small and dependency-free. Both the analysis engine (`bhs_syntax`) and the editor
//! tooling (completion keyword lists, hover) read spellings from here instead of scattering string literals.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global state, and no analysis types.
//! - Current scope: reserved keywords (types, modifiers, definition forms) and bracket/identifier punctuation.

pub mod lang;
