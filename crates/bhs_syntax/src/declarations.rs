//! Variable declarations per scope.
//!
//! A declaration is a type keyword (optionally `[]`-suffixed) followed by a comma-separated declarator list:
//!
//! ```text
//! int a, b = f(1, 2), c[];
//! string[] names;
//! ```
//!
//! The type head is found with a regex; the declarator list is scanned by hand because deciding where it ends needs
//! look-ahead (a continuation that starts with a type keyword or modifier begins the next declaration, as in
//! parameter lists).
//!
//! ## Notes
//! - Each scope is scanned with its child scopes blanked out, so a scope only ever sees its own declarations.
//! - Names may not shadow anything visible from an enclosing scope; sibling scopes may reuse names.

use std::collections::HashSet;
use std::sync::LazyLock;

use bhs_core::lang::keywords::{self, KeywordCategory};
use bhs_core::lang::punctuation::POINTER_MARKER;
use regex::Regex;

use crate::diagnostics::{Diagnostic, errors};
use crate::mask::blank_ranges;
use crate::rewrite::OffsetMap;
use crate::scope::{ScopeId, ScopeTree};
use crate::span::Span;
use crate::symbol::Symbol;

static TYPE_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"\b(?:{})(?:\[\])?", keywords::spellings(KeywordCategory::Type).join("|"));
    Regex::new(&pattern).expect("INVARIANT: type head pattern is valid")
});

/// One entry of a declarator list, in the coordinates of the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarator<'a> {
    /// The declarator as written, pointer markers included (`*p`).
    pub raw: &'a str,
    /// The identifier alone.
    pub name: &'a str,
    /// Span of `raw`.
    pub span: Span,
}

impl Declarator<'_> {
    pub fn is_pointer(&self) -> bool {
        self.raw.contains(POINTER_MARKER)
    }
}

/// All declarators in `text`, in source order.
pub fn scan_declarators(text: &str) -> Vec<Declarator<'_>> {
    let mut out = Vec::new();
    let mut cursor = 0;

    while let Some(head) = TYPE_HEAD.find_at(text, cursor) {
        let after = head.end();
        let separated = text[after..]
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || c == POINTER_MARKER);
        cursor = if separated {
            scan_list(text, after, &mut out).max(after)
        } else {
            after
        };
    }

    out
}

/// Scan a declarator list starting right after a type head. Returns the offset where scanning should resume.
fn scan_list<'a>(text: &'a str, mut pos: usize, out: &mut Vec<Declarator<'a>>) -> usize {
    let bytes = text.as_bytes();
    let mut first = true;

    loop {
        pos = skip_whitespace(text, pos);
        let start = pos;

        if !first && starts_next_declaration(text, start) {
            return start;
        }

        while pos < bytes.len() && (bytes[pos] == b'*' || text[pos..].starts_with(char::is_whitespace)) {
            pos = next_char(text, pos);
        }
        let name_start = pos;
        let name_end = scan_word(text, pos);
        if name_end == name_start {
            return pos;
        }
        let name = &text[name_start..name_end];
        if first && keywords::starts_definition(name) {
            return name_start;
        }

        out.push(Declarator {
            raw: &text[start..name_end],
            name,
            span: Span::new(start, name_end),
        });
        first = false;
        pos = name_end;

        if text[pos..].starts_with("[]") {
            pos += 2;
        }
        pos = skip_whitespace(text, pos);
        if bytes.get(pos) == Some(&b'=') {
            pos = skip_initializer(bytes, pos + 1);
        }

        match bytes.get(pos) {
            Some(b',') => pos += 1,
            _ => return pos,
        }
    }
}

/// `true` if the word at `pos` is a type keyword or modifier followed by optional `[]` and whitespace.
fn starts_next_declaration(text: &str, pos: usize) -> bool {
    let end = scan_word(text, pos);
    let word = &text[pos..end];
    if !(keywords::is_type_keyword(word) || keywords::is_modifier(word)) {
        return false;
    }
    let rest = &text[end..];
    let rest = rest.strip_prefix("[]").unwrap_or(rest);
    rest.starts_with(char::is_whitespace)
}

/// Skip an initializer to the next top-level `,` or `;`, stopping early at an unbalanced closer or a brace.
fn skip_initializer(bytes: &[u8], mut pos: usize) -> usize {
    let mut depth = 0usize;
    while let Some(&b) = bytes.get(pos) {
        match b {
            b'(' | b'[' => depth += 1,
            b')' | b']' if depth == 0 => return pos,
            b')' | b']' => depth -= 1,
            b',' | b';' if depth == 0 => return pos,
            b'{' | b'}' => return pos,
            _ => {}
        }
        pos += 1;
    }
    pos
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(text.len(), |(i, _)| pos + i)
}

/// End of the `\w+` run starting at `pos`.
fn scan_word(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map_or(text.len(), |(i, _)| pos + i)
}

fn next_char(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(pos + 1, |c| pos + c.len_utf8())
}

// ============================================================================
// Scope walk
// ============================================================================

enum Visit {
    Enter(ScopeId),
    Exit(ScopeId),
}

/// Extract the local symbols of every scope in `tree` and store them on the nodes.
///
/// `text` is the rewritten, masked document the tree was built from; `offsets` maps its offsets back to the
/// document, which is where symbol and diagnostic spans point. Diagnostics come out in pre-order.
#[tracing::instrument(skip_all, fields(scopes = tree.len()))]
pub fn extract(tree: &mut ScopeTree, text: &str, offsets: &OffsetMap) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut visible: HashSet<String> = HashSet::new();
    let mut stack = vec![Visit::Enter(ScopeTree::ROOT)];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(id) => {
                let symbols = extract_scope(tree, id, text, offsets, &visible, &mut diagnostics);
                visible.extend(symbols.iter().map(|s| s.name.clone()));
                tree.set_symbols(id, symbols);

                stack.push(Visit::Exit(id));
                stack.extend(tree.node(id).children.iter().rev().map(|&c| Visit::Enter(c)));
            }
            Visit::Exit(id) => {
                for symbol in tree.node(id).local_symbols() {
                    visible.remove(&symbol.name);
                }
            }
        }
    }

    diagnostics
}

fn extract_scope(
    tree: &ScopeTree,
    id: ScopeId,
    text: &str,
    offsets: &OffsetMap,
    ancestors: &HashSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Symbol> {
    let node = tree.node(id);
    let range = node.text_range(text.len());
    let base = range.start;
    let children: Vec<std::ops::Range<usize>> = node
        .children
        .iter()
        .map(|&c| {
            let r = tree.node(c).text_range(text.len());
            r.start - base..r.end - base
        })
        .collect();
    let local = blank_ranges(&text[range], &children);

    let mut symbols: Vec<Symbol> = Vec::new();
    for declarator in scan_declarators(&local) {
        let span = offsets.span_to_original(declarator.span.offset_by(base));
        let name = declarator.name;

        if declarator.is_pointer() {
            diagnostics.push(errors::pointer_declaration(span));
        } else if keywords::is_type_keyword(name) {
            diagnostics.push(errors::reserved_keyword(name, span));
        } else if symbols.iter().any(|s| s.name == name) || ancestors.contains(name) {
            diagnostics.push(errors::duplicate_declaration(name, span));
        } else {
            symbols.push(Symbol::variable(name, span));
        }
    }
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::scope::build;

    fn names(text: &str) -> Vec<&str> {
        scan_declarators(text).into_iter().map(|d| d.name).collect()
    }

    #[test]
    fn test_simple_and_list_declarations() {
        assert_eq!(names("int a;"), vec!["a"]);
        assert_eq!(names("real x, y, z;"), vec!["x", "y", "z"]);
        assert_eq!(names("string[] names; bool done"), vec!["names", "done"]);
        assert_eq!(names("int grid[];"), vec!["grid"]);
    }

    #[test]
    fn test_initializers_skip_nested_commas() {
        assert_eq!(names("int a = f(1, 2), b = g[3, 4], c;"), vec!["a", "b", "c"]);
        assert_eq!(names("float r = 1.5; int n = r;"), vec!["r", "n"]);
    }

    #[test]
    fn test_function_return_type_is_not_a_declaration() {
        assert_eq!(names("int scenario foo(int a) {"), vec!["a"]);
        assert_eq!(names("void trigger t"), Vec::<&str>::new());
    }

    #[test]
    fn test_parameter_list_splits_on_type_keywords() {
        assert_eq!(names("(int a, string b, c, ref int d)"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_keyword_prefix_is_not_a_head() {
        assert_eq!(names("integer x; print(x);"), Vec::<&str>::new());
        assert_eq!(names("int aim;"), vec!["aim"]);
    }

    #[test]
    fn test_pointer_declarators() {
        let declarators = scan_declarators("int *p, q;");
        assert_eq!(declarators.len(), 2);
        assert!(declarators[0].is_pointer());
        assert_eq!(declarators[0].raw, "*p");
        assert_eq!(declarators[0].span, Span::new(4, 6));
        assert!(!declarators[1].is_pointer());

        assert!(scan_declarators("int* p;")[0].is_pointer());
    }

    fn run(text: &str) -> (ScopeTree, Vec<Diagnostic>) {
        let mut tree = build(text);
        let diagnostics = extract(&mut tree, text, &OffsetMap::default());
        (tree, diagnostics)
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let (tree, diagnostics) = run("{ int a; int a; }");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "a is already declared");
        assert_eq!(diagnostics[0].span, Span::new(13, 14));
        let scope = tree.node(tree.root().children[0]);
        assert_eq!(scope.local_symbols().len(), 1);
    }

    #[test]
    fn test_shadowing_ancestor_is_error_but_siblings_may_reuse() {
        let (_, diagnostics) = run("int x; { int x; }");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::DuplicateDeclaration);

        let (tree, diagnostics) = run("{ int i; } { int i; }");
        assert!(diagnostics.is_empty());
        assert_eq!(tree.visible_at(6).len(), 1);
        assert_eq!(tree.visible_at(17).len(), 1);
    }

    #[test]
    fn test_reserved_and_pointer_register_nothing() {
        let (tree, diagnostics) = run("int string; int *p;");
        let kinds: Vec<DiagnosticKind> = diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::ReservedKeyword, DiagnosticKind::PointerDeclaration]);
        assert!(tree.root().local_symbols().is_empty());
    }

    #[test]
    fn test_diagnostics_in_preorder() {
        let (_, diagnostics) = run("{ int a, a; { int b, b; } } int c, c;");
        let starts: Vec<usize> = diagnostics.iter().map(|d| d.span.start).collect();
        assert_eq!(starts, vec![35, 9, 21]);
    }
}
