//! BHS Language Server Protocol (LSP) implementation
//!
//! Provides IDE features:
//! - Diagnostics on open, and on change or save depending on settings
//! - Completion with resolve (keywords, database functions, labels, visible variables, document functions)
//! - Hover documentation for functions and configured symbols

pub mod backend;
pub mod completion;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod hover;

pub use backend::BhsLanguageServer;
pub use config::Settings;
