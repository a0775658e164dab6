//! Length-preserving rewrite of function headers.
//!
//! Parameters of `scenario`, `conquest` and `ai` functions belong to the function body, but textually they sit before
//! its `{`. This pass moves a `{` in front of the parameter list and blanks the original one:
//!
//! ```text
//! scenario main(int n) {      before
//! scenario main{(int n)       after
//! ```
//!
//! so the scope builder sees the parameters inside the body scope. Forward declarations (`int ai f(int a);`) are
//! blanked entirely so their parameters never become globals. Every rewrite keeps the byte length, so offsets outside
//! a header are unchanged; [`OffsetMap`] maps the shifted parameter text back to the original document.

use std::ops::Range;
use std::sync::LazyLock;

use bhs_core::lang::keywords::{self, KeywordCategory};
use regex::Regex;

use crate::mask::blank_ranges;
use crate::span::Span;

fn alternation(category: KeywordCategory) -> String {
    keywords::spellings(category).join("|")
}

static FORWARD_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?:\b(?:{types})(?:\[\])?\s+)?\b(?:{forms})\s+\w+\s*\([^;()]*\)\s*;",
        types = alternation(KeywordCategory::Type),
        forms = alternation(KeywordCategory::FunctionForm),
    );
    Regex::new(&pattern).expect("INVARIANT: forward declaration pattern is valid")
});

static FUNCTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"\b(?:{forms})\s+\w+\s*\([^;()]*\)\s*\{{",
        forms = alternation(KeywordCategory::FunctionForm),
    );
    Regex::new(&pattern).expect("INVARIANT: function header pattern is valid")
});

/// Maps offsets in rewritten text back to the original document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetMap {
    /// Ranges of rewritten text holding parameter lists shifted one byte to the right, sorted by start.
    shifted: Vec<Range<usize>>,
}

impl OffsetMap {
    pub fn to_original(&self, offset: usize) -> usize {
        let idx = self.shifted.partition_point(|r| r.end <= offset);
        match self.shifted.get(idx) {
            Some(r) if r.start <= offset => offset - 1,
            _ => offset,
        }
    }

    /// Map a span by its start; the length is unchanged.
    pub fn span_to_original(&self, span: Span) -> Span {
        Span::at(self.to_original(span.start), span.len())
    }

    pub fn is_identity(&self) -> bool {
        self.shifted.is_empty()
    }
}

/// Rewritten text plus the mapping back to original offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub offsets: OffsetMap,
}

/// Blank every forward function declaration in `masked`.
pub fn blank_forward_declarations(masked: &str) -> String {
    let ranges: Vec<Range<usize>> = FORWARD_DECLARATION.find_iter(masked).map(|m| m.range()).collect();
    blank_ranges(masked, &ranges)
}

/// Blank forward declarations, then move each function's parameter list inside its body.
#[tracing::instrument(skip_all, fields(text_len = masked.len()))]
pub fn rewrite_functions(masked: &str) -> Rewrite {
    let blanked = blank_forward_declarations(masked);
    let mut text = blanked.clone();
    let mut shifted = Vec::new();

    for m in FUNCTION_HEADER.find_iter(&blanked) {
        let header = m.as_str();
        let (Some(open), Some(close)) = (header.find('('), header.find(')')) else {
            continue;
        };
        let args = &header[open..=close];

        let mut replacement = String::with_capacity(header.len());
        replacement.push_str(&header[..open]);
        replacement.push('{');
        replacement.push_str(args);
        let fill = header.len() - replacement.len();
        replacement.extend(std::iter::repeat_n(' ', fill));

        text.replace_range(m.range(), &replacement);
        let args_start = m.start() + open + 1;
        shifted.push(args_start..args_start + args.len());
    }

    if !shifted.is_empty() {
        tracing::trace!(headers = shifted.len(), "rewrote function headers");
    }

    Rewrite {
        text,
        offsets: OffsetMap { shifted },
    }
}
