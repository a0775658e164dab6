//! Hover lookups.

use bhs_syntax::cursor::{CursorContext, hover_context};
use bhs_syntax::{DocumentIndex, FunctionDecl};

use crate::database::{Catalog, CatalogEntry};
use crate::lsp::config::{Settings, SymbolDoc};

/// What a hover resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget<'a> {
    /// A function from the database.
    Signature(&'a CatalogEntry),
    /// A function declared in the document.
    Document(&'a FunctionDecl),
    /// A documented plain word.
    Symbol(&'a SymbolDoc),
}

impl HoverTarget<'_> {
    pub fn markdown(&self) -> String {
        match self {
            HoverTarget::Signature(entry) => {
                let mut value = format!("```bhs\n{}\n```", entry.detail);
                if !entry.documentation.is_empty() {
                    value.push_str("\n\n");
                    value.push_str(&entry.documentation);
                }
                value
            }
            HoverTarget::Document(decl) => format!("```bhs\n(function) {}\n```", decl.label()),
            HoverTarget::Symbol(doc) => doc.contents.clone(),
        }
    }
}

/// Resolve a cursor context.
///
/// Function words are looked up by label prefix in the database, then among the document's functions. Other words
/// are looked up by name prefix in the symbol documentation table.
pub fn resolve<'a>(
    context: &CursorContext,
    catalog: &'a Catalog,
    index: Option<&'a DocumentIndex>,
    settings: &'a Settings,
) -> Option<HoverTarget<'a>> {
    match context {
        CursorContext::Function(word) if !word.is_empty() => catalog
            .find_function(word)
            .map(HoverTarget::Signature)
            .or_else(|| index.and_then(|i| i.find_function(word)).map(HoverTarget::Document)),
        CursorContext::Symbol(word) => settings.symbol_doc(word).map(HoverTarget::Symbol),
        CursorContext::Function(_) => None,
    }
}

/// Hover markdown for the character at byte `offset` of `text`.
pub fn hover_markdown(
    text: &str,
    offset: usize,
    catalog: &Catalog,
    index: Option<&DocumentIndex>,
    settings: &Settings,
) -> Option<String> {
    let context = hover_context(text, offset)?;
    tracing::trace!(word = context.word(), "hover context");
    resolve(&context, catalog, index, settings).map(|target| target.markdown())
}
