//! Cursor-position queries over a scope tree.

use super::{ScopeId, ScopeTree};
use crate::symbol::Symbol;

impl ScopeTree {
    /// Scopes that strictly contain `offset`, from the root down to the innermost one.
    ///
    /// Empty when `offset` is `0` or the document length, since even the root is matched exclusively.
    pub fn scope_chain(&self, offset: usize) -> Vec<ScopeId> {
        let mut chain = Vec::new();
        if !self.root().strictly_contains(offset) {
            return chain;
        }

        let mut current = Self::ROOT;
        chain.push(current);
        while let Some(child) = self.child_containing(current, offset) {
            chain.push(child);
            current = child;
        }
        chain
    }

    /// Innermost scope strictly containing `offset`.
    pub fn innermost_at(&self, offset: usize) -> Option<ScopeId> {
        self.scope_chain(offset).last().copied()
    }

    /// Symbols visible at `offset`: the local symbols of every scope on the chain, outermost first.
    pub fn visible_at(&self, offset: usize) -> Vec<&Symbol> {
        self.scope_chain(offset)
            .into_iter()
            .flat_map(|id| self.node(id).local_symbols())
            .collect()
    }

    fn child_containing(&self, parent: ScopeId, offset: usize) -> Option<ScopeId> {
        let children = &self.node(parent).children;
        // Children are ordered by start; the candidate is the last one starting before `offset`.
        let idx = children.partition_point(|&c| self.node(c).span.start < offset);
        let candidate = *children.get(idx.checked_sub(1)?)?;
        self.node(candidate).strictly_contains(offset).then_some(candidate)
    }
}
