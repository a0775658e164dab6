//! Build a [`ScopeTree`] from `{`/`}` nesting.

use super::{ScopeId, ScopeTree};
use crate::span::Span;

/// A scope whose `{` has been seen but not yet its `}`.
struct Frame {
    start: usize,
    children: Vec<ScopeId>,
}

/// Build the scope forest of `text`, which should already be masked.
///
/// ## Notes
/// - Only braces matter; `(` and `[` are ignored.
/// - A `}` with nothing open is ignored. Frames still open at the end do not become scopes: their closed children are
///   lifted to the nearest enclosing frame, or to the root.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn build(text: &str) -> ScopeTree {
    let mut tree = ScopeTree::new(text.len());
    let mut stack: Vec<Frame> = Vec::new();

    for (offset, byte) in text.bytes().enumerate() {
        match byte {
            b'{' => stack.push(Frame {
                start: offset,
                children: Vec::new(),
            }),
            b'}' => {
                let Some(frame) = stack.pop() else {
                    continue;
                };
                let id = tree.push(Span::new(frame.start, offset));
                adopt(&mut tree, id, frame.children);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(id),
                    None => adopt(&mut tree, ScopeTree::ROOT, vec![id]),
                }
            }
            _ => {}
        }
    }

    // Unclosed frames: hand their children down to whatever encloses them.
    while let Some(frame) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.extend(frame.children),
            None => adopt(&mut tree, ScopeTree::ROOT, frame.children),
        }
    }

    tree
}

fn adopt(tree: &mut ScopeTree, parent: ScopeId, children: Vec<ScopeId>) {
    for &child in &children {
        tree.node_mut(child).parent = Some(parent);
    }
    tree.node_mut(parent).children.extend(children);
}
