//! Lexical scope trees derived from brace nesting.
//!
//! A [`ScopeTree`] is an arena of [`ScopeNode`]s. Index 0 is a synthetic root spanning the whole document; every
//! other node spans a matched `{ … }` pair. Children are non-overlapping, strictly nested and ordered by start offset.
//!
//! ## Examples
//! ```rust
//! use bhs_syntax::scope::{ScopeTree, build};
//!
//! let tree = build("a { b { } } { }");
//! let root = tree.node(ScopeTree::ROOT);
//! assert_eq!(root.children.len(), 2);
//! assert_eq!(tree.node(root.children[0]).children.len(), 1);
//! ```

mod builder;
mod resolve;

use std::fmt::Write as _;

pub use builder::build;

use crate::span::Span;
use crate::symbol::Symbol;

/// Index of a node in a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub usize);

/// One scope.
///
/// `span.start` is the offset of the opening `{` and `span.end` the offset of the closing `}` (for the root: `0` and
/// the document length).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeNode {
    pub span: Span,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Local symbols, `None` until the declaration extractor has visited the node.
    pub symbols: Option<Vec<Symbol>>,
}

impl ScopeNode {
    fn new(span: Span) -> Self {
        Self {
            span,
            parent: None,
            children: Vec::new(),
            symbols: None,
        }
    }

    /// `true` if `offset` lies strictly between the node's delimiters.
    pub fn strictly_contains(&self, offset: usize) -> bool {
        self.span.start < offset && offset < self.span.end
    }

    /// The text range covered by the node, delimiters included.
    pub fn text_range(&self, text_len: usize) -> std::ops::Range<usize> {
        self.span.start.min(text_len)..(self.span.end + 1).min(text_len)
    }

    pub fn local_symbols(&self) -> &[Symbol] {
        self.symbols.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTree {
    nodes: Vec<ScopeNode>,
}

impl ScopeTree {
    pub const ROOT: ScopeId = ScopeId(0);

    /// A tree holding only the root, spanning `[0, len]`.
    pub fn new(len: usize) -> Self {
        Self {
            nodes: vec![ScopeNode::new(Span::new(0, len))],
        }
    }

    pub fn node(&self, id: ScopeId) -> &ScopeNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: ScopeId) -> &mut ScopeNode {
        &mut self.nodes[id.0]
    }

    pub fn root(&self) -> &ScopeNode {
        self.node(Self::ROOT)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &ScopeNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (ScopeId(i), n))
    }

    /// Node ids in pre-order: parent before children, children in source order.
    pub fn preorder(&self) -> Vec<ScopeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        order
    }

    pub fn set_symbols(&mut self, id: ScopeId, symbols: Vec<Symbol>) {
        self.node_mut(id).symbols = Some(symbols);
    }

    pub(crate) fn push(&mut self, span: Span) -> ScopeId {
        let id = ScopeId(self.nodes.len());
        self.nodes.push(ScopeNode::new(span));
        id
    }

    /// Indented outline of the tree, one node per line with its local symbols.
    ///
    /// Used by `bhs scopes` and by snapshot tests.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(Self::ROOT, 0, &mut out);
        out
    }

    fn render_node(&self, id: ScopeId, depth: usize, out: &mut String) {
        let node = self.node(id);
        let indent = "  ".repeat(depth);
        let label = if id == Self::ROOT { "root" } else { "scope" };
        let _ = write!(out, "{}{} {}..{}", indent, label, node.span.start, node.span.end);
        match &node.symbols {
            Some(symbols) if !symbols.is_empty() => {
                let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
                let _ = write!(out, ": {}", names.join(", "));
            }
            Some(_) => {}
            None => out.push_str(" (unvisited)"),
        }
        out.push('\n');
        for &child in &node.children {
            self.render_node(child, depth + 1, out);
        }
    }
}
