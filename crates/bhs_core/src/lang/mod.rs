//! BHS language vocabulary registries.
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `BracketId`) and look up spellings and metadata via registry
//! tables, so that the recognizers, the completion list and the diagnostics agree on one spelling table.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no IO, no side effects.
//!
//! ## Examples
//! ```rust
//! use bhs_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("int"), Some(KeywordId::Int));
//! assert_eq!(keywords::as_str(KeywordId::Scenario), "scenario");
//! ```

pub mod keywords;
pub mod punctuation;
