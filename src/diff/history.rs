//! An arena of operation histories with structural sharing.
//!
//! The Marchetti and Wagner-Fischer searches keep one candidate edit history per diagonal or
//! cell, and most of those share a long common prefix. Rather than cloning lists, every history
//! is a node pointing at its parent, and only the winner is walked back into a list.

use crate::operation::MinimalOp;

/// A handle to a history in a [`History`] arena. `None` is the empty history.
pub(crate) type HistoryId = Option<usize>;

#[derive(Debug, Clone, Copy)]
struct Node {
    op: MinimalOp,
    parent: HistoryId,
}

#[derive(Debug, Default)]
pub(crate) struct History {
    nodes: Vec<Node>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the history at `parent` by one operation, returning the new history.
    ///
    /// `parent` is left untouched and can still be extended independently.
    pub fn push(&mut self, parent: HistoryId, op: MinimalOp) -> HistoryId {
        self.nodes.push(Node { op, parent });
        Some(self.nodes.len() - 1)
    }

    /// Materialize a history, oldest operation first.
    pub fn collect(&self, head: HistoryId) -> Vec<MinimalOp> {
        let mut ops = Vec::new();
        let mut cursor = head;
        while let Some(idx) = cursor {
            let node = self.nodes[idx];
            ops.push(node.op);
            cursor = node.parent;
        }
        ops.reverse();
        ops
    }

    /// The number of operation records allocated in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn add(new_index: usize) -> MinimalOp {
        MinimalOp::Add {
            old_index: 0,
            new_index,
        }
    }

    #[test]
    fn test_empty_history() {
        let arena = History::new();
        assert!(arena.collect(None).is_empty());
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn test_branches_share_prefix() {
        let mut arena = History::new();
        let root = arena.push(None, add(0));
        let left = arena.push(root, add(1));
        let right = arena.push(root, add(2));
        let right = arena.push(right, add(3));

        assert_eq!(arena.collect(root), vec![add(0)]);
        assert_eq!(arena.collect(left), vec![add(0), add(1)]);
        assert_eq!(arena.collect(right), vec![add(0), add(2), add(3)]);
        assert_eq!(arena.len(), 4);
    }
}
