//! Convert analysis diagnostics to LSP diagnostics, and byte offsets to LSP positions
//!
//! LSP positions count columns in UTF-16 code units; the analysis works in byte offsets.

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

use bhs_syntax::diagnostics::{self as analysis, SOURCE, Severity};

/// Convert a byte offset to LSP Position (0-based line, UTF-16 character)
pub fn offset_to_position(source: &str, offset: usize) -> Position {
    let offset = offset.min(source.len());
    let mut line = 0u32;
    let mut col = 0u32;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += c.len_utf16() as u32;
        }
    }

    Position::new(line, col)
}

/// Convert an LSP Position to a byte offset.
///
/// Columns past the end of a line clamp to the line end; lines past the end of the document clamp to its length.
pub fn position_to_offset(source: &str, position: Position) -> usize {
    let mut line_start = 0usize;
    for _ in 0..position.line {
        match source[line_start..].find('\n') {
            Some(nl) => line_start += nl + 1,
            None => return source.len(),
        }
    }

    let mut units = 0u32;
    for (i, c) in source[line_start..].char_indices() {
        if c == '\n' || units >= position.character {
            return line_start + i;
        }
        units += c.len_utf16() as u32;
    }
    source.len()
}

/// Convert a span to LSP Range
pub fn span_to_range(source: &str, start: usize, end: usize) -> Range {
    let start_pos = offset_to_position(source, start);
    let end_pos = offset_to_position(source, end.max(start + 1));
    Range::new(start_pos, end_pos)
}

fn severity(severity: Severity) -> DiagnosticSeverity {
    match severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    }
}

/// Convert an analysis diagnostic to LSP Diagnostic
pub fn to_lsp_diagnostic(diagnostic: &analysis::Diagnostic, source: &str) -> Diagnostic {
    Diagnostic {
        range: span_to_range(source, diagnostic.span.start, diagnostic.span.end),
        severity: Some(severity(diagnostic.severity)),
        code: Some(NumberOrString::String(diagnostic.kind.code().to_string())),
        code_description: None,
        source: Some(SOURCE.to_string()),
        message: diagnostic.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}
