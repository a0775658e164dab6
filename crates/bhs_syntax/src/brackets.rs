//! Bracket structure validation.
//!
//! The validator runs over masked text and gates the rest of the analysis: if it reports anything, no scope tree is
//! built for that pass.

use bhs_core::lang::punctuation::{self, BracketId};

use crate::diagnostics::{Diagnostic, errors};

#[derive(Debug, Clone, Copy)]
struct OpenBracket {
    id: BracketId,
    offset: usize,
}

/// Check that `{}`, `[]` and `()` pair up and nest correctly.
///
/// ## Returns
/// - Errors for closers with no opener and for closers that do not fit the innermost opener (anchored at the opener).
/// - One warning per opener still open at the end, bottom of the stack first.
#[tracing::instrument(skip_all, fields(text_len = masked.len()))]
pub fn validate(masked: &str) -> Vec<Diagnostic> {
    let mut stack: Vec<OpenBracket> = Vec::new();
    let mut diagnostics = Vec::new();

    for (offset, c) in masked.char_indices() {
        if let Some(id) = punctuation::from_open(c) {
            stack.push(OpenBracket { id, offset });
        } else if let Some(id) = punctuation::from_close(c) {
            match stack.pop() {
                None => diagnostics.push(errors::unmatched_bracket(c, offset)),
                Some(open) if open.id != id => {
                    diagnostics.push(errors::mismatched_bracket(punctuation::open(open.id), open.offset, c));
                }
                Some(_) => {}
            }
        }
    }

    for open in stack {
        diagnostics.push(errors::unclosed_bracket(punctuation::open(open.id), open.offset));
    }

    if !diagnostics.is_empty() {
        tracing::debug!(count = diagnostics.len(), "bracket structure is malformed");
    }
    diagnostics
}
