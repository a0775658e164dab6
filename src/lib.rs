#![forbid(unsafe_code)]
//! BHS script language tooling
//!
//! Editor intelligence for the BHS scenario and AI script dialect. The analysis engine (masking, bracket
//! validation, scope tree, declaration extraction, symbol resolution) lives in `bhs_syntax`; this crate adds the
//! function database, the language server and the `bhs` command line.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a logic error, use `.expect("INVARIANT: reason")` with a clear
//!   explanation.
//!
//! - **Analysis never fails**: problems in a document are reported as diagnostics, never as Rust errors.

pub mod cli;
pub mod database;
pub mod lsp;

pub use bhs_syntax::{Analysis, Diagnostic, DocumentIndex, analyze};
pub use database::{Catalog, FunctionSignature};
pub use lsp::BhsLanguageServer;
