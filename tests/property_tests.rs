//! Property-based tests for the analysis engine
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use bhs::analyze;
use bhs_syntax::brackets;
use bhs_syntax::mask::mask_comments_and_strings;
use bhs_syntax::rewrite::rewrite_functions;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Balanced, correctly nested bracket text with filler between the brackets.
fn balanced_strategy() -> impl Strategy<Value = String> {
    let leaf = "[a-z ;=,0-9]{0,6}".prop_map(String::from);
    leaf.prop_recursive(4, 48, 4, |inner| {
        (
            prop::sample::select(vec![('{', '}'), ('[', ']'), ('(', ')')]),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|((open, close), parts)| format!("{}{}{}", open, parts.concat(), close))
    })
}

/// Identifiers that are not reserved words.
fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}".prop_filter("Not a keyword", |s| {
        bhs_core::lang::keywords::from_str(s).is_none() && s != "labels"
    })
}

/// Small scripts built from declarations, blocks and function definitions.
fn script_strategy() -> impl Strategy<Value = String> {
    let decl = ident_strategy().prop_map(|name| format!("int {};", name));
    let function = (ident_strategy(), ident_strategy(), ident_strategy())
        .prop_map(|(name, param, local)| format!("scenario {}(int {}) {{ int {}; }}", name, param, local));
    let block = ident_strategy().prop_map(|name| format!("{{ real {}; }}", name));
    prop::collection::vec(prop_oneof![decl, function, block], 0..8).prop_map(|parts| parts.join("\n"))
}

proptest! {
    /// Property: balanced, nested brackets never produce bracket diagnostics
    #[test]
    fn balanced_brackets_are_clean(text in prop::collection::vec(balanced_strategy(), 0..4)) {
        let text = text.concat();
        prop_assert!(brackets::validate(&text).is_empty());
    }

    /// Property: masking preserves length and line structure
    #[test]
    fn masking_preserves_layout(source in "[a-z /*\"\\\\\n{}]{0,64}") {
        let masked = mask_comments_and_strings(&source);
        prop_assert_eq!(masked.len(), source.len());
        let original_newlines: Vec<usize> = source.match_indices('\n').map(|(i, _)| i).collect();
        let masked_newlines: Vec<usize> = masked.match_indices('\n').map(|(i, _)| i).collect();
        prop_assert_eq!(original_newlines, masked_newlines);
    }

    /// Property: the function-header rewrite preserves length
    #[test]
    fn rewrite_preserves_length(script in script_strategy()) {
        let rewrite = rewrite_functions(&script);
        prop_assert_eq!(rewrite.text.len(), script.len());
    }

    /// Property: analysis is a pure function of the text
    #[test]
    fn analysis_is_idempotent(script in script_strategy()) {
        prop_assert_eq!(analyze(&script), analyze(&script));
    }

    /// Property: arbitrary input never panics, and bracket problems never come with an index
    #[test]
    fn arbitrary_input_is_handled(source in "\\PC{0,80}") {
        let analysis = analyze(&source);
        if analysis.index.is_none() {
            prop_assert!(!analysis.diagnostics.is_empty());
        }
    }
}
