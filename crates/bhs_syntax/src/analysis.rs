//! The analysis pass: document text in, diagnostics and a symbol index out.

use crate::brackets;
use crate::declarations;
use crate::diagnostics::Diagnostic;
use crate::functions;
use crate::mask::mask_comments_and_strings;
use crate::rewrite::rewrite_functions;
use crate::scope::{self, ScopeTree};
use crate::symbol::{FunctionDecl, Symbol};

/// Symbols of a document whose bracket structure is sound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentIndex {
    pub scopes: ScopeTree,
    pub functions: Vec<FunctionDecl>,
    pub labels: Vec<Symbol>,
}

impl DocumentIndex {
    /// Variables visible at `offset`, outermost scope first.
    pub fn visible_at(&self, offset: usize) -> Vec<&Symbol> {
        self.scopes.visible_at(offset)
    }

    /// Document functions whose label starts with `prefix`.
    pub fn find_function(&self, prefix: &str) -> Option<&FunctionDecl> {
        self.functions.iter().find(|f| f.label().starts_with(prefix))
    }
}

/// Result of one analysis pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Bracket diagnostics, or declaration diagnostics followed by function diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    /// `None` when the bracket structure is malformed.
    pub index: Option<DocumentIndex>,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Analyze a whole document.
///
/// ## Notes
/// - Pure: the same text always yields the same [`Analysis`].
/// - Bracket problems short-circuit the pass; no index is produced and only bracket diagnostics are reported.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn analyze(source: &str) -> Analysis {
    let masked = mask_comments_and_strings(source);

    let bracket_diagnostics = brackets::validate(&masked);
    if !bracket_diagnostics.is_empty() {
        return Analysis {
            diagnostics: bracket_diagnostics,
            index: None,
        };
    }

    let (functions, function_diagnostics) = functions::extract_functions(&masked);
    let labels = functions::extract_labels(&masked);

    let rewrite = rewrite_functions(&masked);
    let mut scopes = scope::build(&rewrite.text);
    let mut diagnostics = declarations::extract(&mut scopes, &rewrite.text, &rewrite.offsets);
    diagnostics.extend(function_diagnostics);

    tracing::debug!(
        scopes = scopes.len(),
        functions = functions.len(),
        labels = labels.len(),
        diagnostics = diagnostics.len(),
        "analysis complete"
    );

    Analysis {
        diagnostics,
        index: Some(DocumentIndex {
            scopes,
            functions,
            labels,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    fn visible(analysis: &Analysis, offset: usize) -> Vec<String> {
        analysis
            .index
            .as_ref()
            .map(|index| index.visible_at(offset).iter().map(|s| s.name.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_bracket_errors_short_circuit() {
        let analysis = analyze("int a; int a; {");
        assert!(analysis.index.is_none());
        assert_eq!(analysis.diagnostics.len(), 1);
        assert_eq!(analysis.diagnostics[0].kind, DiagnosticKind::UnclosedBracket);
    }

    #[test]
    fn test_brackets_in_comments_and_strings_are_ignored() {
        let analysis = analyze("// {\nstring s = \"}\"; /* ( */");
        assert!(analysis.diagnostics.is_empty());
        assert_eq!(visible(&analysis, 6), vec!["s"]);
    }

    #[test]
    fn test_parameters_visible_only_in_body() {
        let source = "int g; scenario f(int p) { int l; } int h;";
        let analysis = analyze(source);
        assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);

        let in_body = source.find("int l").unwrap_or(0);
        assert_eq!(visible(&analysis, in_body), vec!["g", "h", "p", "l"]);
        assert_eq!(visible(&analysis, 2), vec!["g", "h"]);
    }

    #[test]
    fn test_parameter_span_points_at_original_text() {
        let source = "ai f(int p, int p) { }";
        let analysis = analyze(source);
        assert_eq!(analysis.diagnostics.len(), 1);
        let span = analysis.diagnostics[0].span;
        assert_eq!(&source[span.start..span.end], "p");
        assert_eq!(span.start, 16);
    }

    #[test]
    fn test_forward_declaration_adds_no_globals() {
        let analysis = analyze("int ai helper(int x);\nint y;");
        assert!(analysis.diagnostics.is_empty());
        assert_eq!(visible(&analysis, 3), vec!["y"]);
        let index = analysis.index.as_ref().map(|i| i.functions.len());
        assert_eq!(index, Some(1));
    }

    #[test]
    fn test_declaration_diagnostics_precede_function_diagnostics() {
        let analysis = analyze("scenario f() {} scenario f() {} int a, a;");
        let kinds: Vec<DiagnosticKind> = analysis.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::DuplicateDeclaration, DiagnosticKind::DuplicateFunction]);
    }

    #[test]
    fn test_find_function_by_label_prefix() {
        let analysis = analyze("conquest attack(int army) { }");
        let index = analysis.index.as_ref();
        let found = index.and_then(|i| i.find_function("attack")).map(|f| f.label());
        assert_eq!(found, Some("attack(army)".to_string()));
    }
}
