//! Diagnostics produced by an analysis pass.
//!
//! Diagnostics are plain values: a pass never fails, it only reports. The language server converts them into
//! protocol diagnostics, the CLI renders them with [`render`].

use std::fmt;

use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, SourceSpan};

use crate::span::Span;

/// Source tag attached to every published diagnostic.
pub const SOURCE: &str = "bhs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Broad grouping of diagnostic kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Bracket structure; short-circuits the rest of the pass.
    Structural,
    /// Variable declarations.
    Declaration,
    /// Function signatures.
    Function,
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A closing bracket with nothing open.
    UnmatchedBracket,
    /// A closing bracket that does not fit the innermost open bracket.
    MismatchedBracket,
    /// An opening bracket that is never closed.
    UnclosedBracket,
    DuplicateDeclaration,
    ReservedKeyword,
    PointerDeclaration,
    DuplicateFunction,
}

impl DiagnosticKind {
    pub fn category(self) -> DiagnosticCategory {
        match self {
            DiagnosticKind::UnmatchedBracket | DiagnosticKind::MismatchedBracket | DiagnosticKind::UnclosedBracket => {
                DiagnosticCategory::Structural
            }
            DiagnosticKind::DuplicateDeclaration
            | DiagnosticKind::ReservedKeyword
            | DiagnosticKind::PointerDeclaration => DiagnosticCategory::Declaration,
            DiagnosticKind::DuplicateFunction => DiagnosticCategory::Function,
        }
    }

    /// Stable code shown by the CLI and sent as the protocol diagnostic code.
    pub fn code(self) -> &'static str {
        match self {
            DiagnosticKind::UnmatchedBracket => "bhs::unmatched-bracket",
            DiagnosticKind::MismatchedBracket => "bhs::mismatched-bracket",
            DiagnosticKind::UnclosedBracket => "bhs::unclosed-bracket",
            DiagnosticKind::DuplicateDeclaration => "bhs::duplicate-declaration",
            DiagnosticKind::ReservedKeyword => "bhs::reserved-keyword",
            DiagnosticKind::PointerDeclaration => "bhs::pointer",
            DiagnosticKind::DuplicateFunction => "bhs::duplicate-function",
        }
    }
}

/// A finding with a location in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
    pub severity: Severity,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            severity: Severity::Error,
            kind,
        }
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            severity: Severity::Warning,
            kind,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// A diagnostic bound to its source text, in the shape `miette` renders.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct Report {
    message: String,
    kind: DiagnosticKind,
    severity: Severity,
    span: SourceSpan,
    source_code: NamedSource<String>,
}

impl miette::Diagnostic for Report {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source_code)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(self.severity.to_string()), self.span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Render a diagnostic with a source snippet, the way the CLI prints it.
pub fn render(file_name: &str, source: &str, diagnostic: &Diagnostic, color: bool) -> String {
    let start = diagnostic.span.start.min(source.len());
    let len = diagnostic.span.len().min(source.len() - start);
    let report = Report {
        message: diagnostic.message.clone(),
        kind: diagnostic.kind,
        severity: diagnostic.severity,
        span: SourceSpan::from((start, len)),
        source_code: NamedSource::new(file_name, source.to_string()),
    };

    let theme = if color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let mut out = String::new();
    if GraphicalReportHandler::new_themed(theme)
        .render_report(&mut out, &report)
        .is_err()
    {
        // Fall back to a plain one-liner; the handler only fails on fmt errors.
        out = format!("{}: {} [{}]\n", diagnostic.severity, diagnostic.message, diagnostic.kind.code());
    }
    out
}

// ============================================================================
// Diagnostic catalog
// ============================================================================

/// Constructors for every diagnostic the analysis emits, so messages stay consistent.
pub mod errors {
    use super::*;

    pub fn unmatched_bracket(close: char, offset: usize) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::UnmatchedBracket,
            format!("No matching bracket for character {}", close),
            Span::at(offset, close.len_utf8()),
        )
    }

    pub fn mismatched_bracket(open: char, open_offset: usize, found: char) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::MismatchedBracket,
            format!("No matching bracket for character {} (found {})", open, found),
            Span::at(open_offset, open.len_utf8()),
        )
    }

    pub fn unclosed_bracket(open: char, offset: usize) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticKind::UnclosedBracket,
            format!("No matching bracket for character {}", open),
            Span::at(offset, open.len_utf8()),
        )
    }

    pub fn duplicate_declaration(name: &str, span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::DuplicateDeclaration,
            format!("{} is already declared", name),
            span,
        )
    }

    pub fn reserved_keyword(name: &str, span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::ReservedKeyword,
            format!("Can't have name {}, reserved keyword", name),
            span,
        )
    }

    pub fn pointer_declaration(span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::PointerDeclaration,
            "Pointers are not allowed in BHS scripts",
            span,
        )
    }

    pub fn duplicate_function(name: &str, span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::DuplicateFunction,
            format!("{} is already declared", name),
            span,
        )
    }
}
