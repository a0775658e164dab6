//! Per-document state kept by the language server.

use std::sync::Arc;

use tower_lsp::lsp_types::TextDocumentContentChangeEvent;

use bhs_syntax::DocumentIndex;

use crate::lsp::diagnostics::position_to_offset;

/// Document state stored by the LSP
#[derive(Debug, Clone)]
pub struct DocumentState {
    pub text: String,
    pub version: i32,
    /// Index of the last pass with a sound bracket structure, if any.
    ///
    /// Passes that stop at bracket diagnostics leave the previous index in place, so completion keeps working
    /// while the user is in the middle of typing a block.
    pub index: Option<Arc<DocumentIndex>>,
}

impl DocumentState {
    pub fn new(text: String, version: i32) -> Self {
        Self {
            text,
            version,
            index: None,
        }
    }

    /// Apply a batch of content changes in order.
    pub fn apply_changes(&mut self, changes: Vec<TextDocumentContentChangeEvent>, version: i32) {
        for change in changes {
            apply_change(&mut self.text, change);
        }
        self.version = version;
    }
}

/// Apply one change: a ranged edit, or a full replacement when the change has no range.
pub fn apply_change(text: &mut String, change: TextDocumentContentChangeEvent) {
    match change.range {
        Some(range) => {
            let start = position_to_offset(text, range.start);
            let end = position_to_offset(text, range.end).max(start);
            text.replace_range(start..end, &change.text);
        }
        None => *text = change.text,
    }
}
