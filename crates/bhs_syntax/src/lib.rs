//! Analysis engine for BHS scripts: masking, bracket validation, scope trees, declaration extraction and
//! scoped symbol resolution.
//!
//! This crate is dependency-light and intended for reuse across the CLI, the language server and tests.
//!
//! ## Notes
//! - Declarations are recognized by pattern matching over masked text, not by a tokenizer. Comments and strings are
//!   blanked first ([`mask`]), nested scopes are blanked while their parent is scanned ([`declarations`]).
//! - Every analysis pass is a pure function of the document text: [`analysis::analyze`] returns a fresh
//!   [`analysis::Analysis`] and keeps no state between calls.
//! - Vocabulary (type keywords, function forms, brackets) comes from `bhs_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use bhs_syntax::analysis::analyze;
//!
//! let analysis = analyze("int total; scenario main(int n) { int i; }");
//! assert!(analysis.diagnostics.is_empty());
//!
//! let index = analysis.index.unwrap();
//! let visible: Vec<&str> = index.visible_at(36).iter().map(|s| s.name.as_str()).collect();
//! assert_eq!(visible, vec!["total", "n", "i"]);
//! ```

pub mod analysis;
pub mod brackets;
pub mod cursor;
pub mod declarations;
pub mod diagnostics;
pub mod functions;
pub mod mask;
pub mod rewrite;
pub mod scope;
pub mod span;
pub mod symbol;

pub use analysis::{Analysis, DocumentIndex, analyze};
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use scope::{ScopeId, ScopeNode, ScopeTree};
pub use span::Span;
pub use symbol::{FunctionDecl, Symbol, SymbolKind};
