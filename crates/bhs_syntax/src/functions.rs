//! Document-wide functions and labels.
//!
//! Both run once over the whole masked document (before the header rewrite) and are owned by the document rather
//! than by a scope.

use std::sync::LazyLock;

use bhs_core::lang::keywords::{self, KeywordCategory};
use regex::Regex;

use crate::diagnostics::{Diagnostic, errors};
use crate::span::Span;
use crate::symbol::{FunctionDecl, Symbol};

static FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"\b(?P<form>{})\s+(?P<name>\w+)\s*\((?P<params>[^;]*?)\)\s*(?P<end>[{{;])",
        keywords::spellings(KeywordCategory::FunctionForm).join("|"),
    );
    Regex::new(&pattern).expect("INVARIANT: function pattern is valid")
});

static LABELS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\blabels\s*\{(?P<body>[^}]*)\}").expect("INVARIANT: labels pattern is valid"));

/// Collect every `scenario`, `conquest` and `ai` declaration.
///
/// ## Returns
/// - The functions in source order, without duplicates.
/// - One error per header whose label (`name(p1, p2)`) was already seen, spanning the whole header.
#[tracing::instrument(skip_all, fields(text_len = masked.len()))]
pub fn extract_functions(masked: &str) -> (Vec<FunctionDecl>, Vec<Diagnostic>) {
    let mut functions: Vec<FunctionDecl> = Vec::new();
    let mut diagnostics = Vec::new();

    for caps in FUNCTION.captures_iter(masked) {
        let (Some(whole), Some(form), Some(name), Some(params), Some(end)) = (
            caps.get(0),
            caps.name("form"),
            caps.name("name"),
            caps.name("params"),
            caps.name("end"),
        ) else {
            continue;
        };
        let Some(form) = keywords::from_str(form.as_str()) else {
            continue;
        };

        let decl = FunctionDecl {
            form,
            name: name.as_str().to_string(),
            params: parameter_names(params.as_str()),
            span: Span::from(whole.range()),
            forward: end.as_str() == ";",
        };

        let label = decl.label();
        if functions.iter().any(|f| f.label() == label) {
            diagnostics.push(errors::duplicate_function(&decl.name, decl.span));
        } else {
            functions.push(decl);
        }
    }

    (functions, diagnostics)
}

/// Parameter names of a raw parameter list: the last identifier of each entry, ignoring initializers.
fn parameter_names(params: &str) -> Vec<String> {
    params
        .split(',')
        .filter_map(|param| {
            let declarator = param.split('=').next().unwrap_or(param);
            declarator
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .rfind(|word| !word.is_empty())
                .map(str::to_string)
        })
        .collect()
}

/// Collect the names declared in `labels { … }` blocks.
///
/// Entries are comma-separated and may carry an `= value` initializer. Duplicates are not checked.
#[tracing::instrument(skip_all, fields(text_len = masked.len()))]
pub fn extract_labels(masked: &str) -> Vec<Symbol> {
    let mut labels = Vec::new();

    for caps in LABELS.captures_iter(masked) {
        let Some(body) = caps.name("body") else {
            continue;
        };
        let mut offset = body.start();
        for entry in body.as_str().split(',') {
            let name_part = entry.split('=').next().unwrap_or(entry);
            let trimmed = name_part.trim();
            if !trimmed.is_empty() {
                let lead = name_part.len() - name_part.trim_start().len();
                labels.push(Symbol::label(trimmed, Span::at(offset + lead, trimmed.len())));
            }
            offset += entry.len() + 1;
        }
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use bhs_core::lang::keywords::KeywordId;

    #[test]
    fn test_functions_and_labels_use_parameter_names() {
        let (functions, diagnostics) = extract_functions("scenario main(int a, ref string[] b) { }");
        assert!(diagnostics.is_empty());
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].form, KeywordId::Scenario);
        assert_eq!(functions[0].label(), "main(a, b)");
        assert!(!functions[0].forward);
    }

    #[test]
    fn test_duplicate_function_reports_once() {
        let source = "scenario foo(int a){}\nscenario foo(int a){}";
        let (functions, diagnostics) = extract_functions(source);
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].label(), "foo(a)");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "foo is already declared");
        assert_eq!(diagnostics[0].span, Span::new(22, 42));
    }

    #[test]
    fn test_overloads_by_parameter_names_are_distinct() {
        let (functions, diagnostics) = extract_functions("ai f(int a) {} ai f(int a, int b) {} conquest g();");
        assert!(diagnostics.is_empty());
        let labels: Vec<String> = functions.iter().map(|f| f.label()).collect();
        assert_eq!(labels, vec!["f(a)", "f(a, b)", "g()"]);
        assert!(functions[2].forward);
    }

    #[test]
    fn test_labels_strip_initializers_and_empties() {
        let source = "labels {\n  start = 1,\n  middle,\n  , end }";
        let labels = extract_labels(source);
        let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["start", "middle", "end"]);
        for label in &labels {
            assert_eq!(&source[label.span.start..label.span.end], label.name);
        }
    }

    #[test]
    fn test_labels_keyword_needs_word_boundary() {
        assert!(extract_labels("mylabels { a }").is_empty());
    }
}
