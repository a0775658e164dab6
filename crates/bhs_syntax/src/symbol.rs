//! Named declarations found by the extractors.

use std::fmt;

use bhs_core::lang::keywords::KeywordId;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Function,
    Label,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Variable => write!(f, "variable"),
            SymbolKind::Function => write!(f, "function"),
            SymbolKind::Label => write!(f, "label"),
        }
    }
}

/// A declared name and where it was declared.
///
/// `span` covers the declarator (for variables) or the name (for labels) in the original document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub span: Span,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            span,
        }
    }

    pub fn variable(name: impl Into<String>, span: Span) -> Self {
        Self::new(name, SymbolKind::Variable, span)
    }

    pub fn label(name: impl Into<String>, span: Span) -> Self {
        Self::new(name, SymbolKind::Label, span)
    }
}

/// A `scenario`, `conquest` or `ai` function declared in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    /// Which of the three definition forms introduced it.
    pub form: KeywordId,
    pub name: String,
    /// Parameter names, without types or modifiers.
    pub params: Vec<String>,
    /// The whole header, from the form keyword to the terminating `{` or `;`.
    pub span: Span,
    /// `true` for a `;`-terminated declaration without a body.
    pub forward: bool,
}

impl FunctionDecl {
    /// Display label, `name(p1, p2)`.
    pub fn label(&self) -> String {
        format!("{}({})", self.name, self.params.join(", "))
    }

    /// Snippet insert text, `name(${1:p1}, ${2:p2})`.
    pub fn snippet(&self) -> String {
        snippet(&self.name, self.params.iter().map(String::as_str))
    }

    /// The function as a document-root symbol.
    pub fn to_symbol(&self) -> Symbol {
        Symbol::new(self.label(), SymbolKind::Function, self.span)
    }
}

/// Build `name(${1:a}, ${2:b})` snippet text from argument names.
pub fn snippet<'a>(name: &str, args: impl IntoIterator<Item = &'a str>) -> String {
    let placeholders: Vec<String> = args
        .into_iter()
        .enumerate()
        .map(|(i, arg)| format!("${{{}:{}}}", i + 1, arg))
        .collect();
    format!("{}({})", name, placeholders.join(", "))
}
