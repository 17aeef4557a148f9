//! The operations a diff is made of.
//!
//! There are two layers here. Algorithms produce [`MinimalOp`]s, which only carry indices and
//! may contain an internal `Replace` run. The harness expands those into caller facing
//! operations through an [`OperationFactory`], which by default builds [`Operation`]s.

use crate::patch::{PatchOperation, PatchStep};

/// A caller facing diff operation carrying both cursor positions.
///
/// Replaying a diff from the start, `old_index` and `new_index` are always the current read
/// positions in the left and right sequences:
///
/// - an `Add` advances only the new cursor, its `old_index` is where the read head of the left
///   sequence sat when the value was inserted;
/// - a `Remove` advances only the old cursor, its `new_index` is where the write head of the
///   right sequence sat when the value was removed;
/// - a `Copy` advances both cursors by `count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation<V> {
    /// A value that only exists in the right sequence
    Add {
        value: V,
        old_index: usize,
        new_index: usize,
    },
    /// A value that only exists in the left sequence
    Remove {
        value: V,
        old_index: usize,
        new_index: usize,
    },
    /// A run of values that are unchanged between the two sequences
    Copy {
        count: usize,
        old_index: usize,
        new_index: usize,
    },
}

impl<V> Operation<V> {
    pub fn add(value: V, old_index: usize, new_index: usize) -> Self {
        Operation::Add {
            value,
            old_index,
            new_index,
        }
    }

    pub fn remove(value: V, old_index: usize, new_index: usize) -> Self {
        Operation::Remove {
            value,
            old_index,
            new_index,
        }
    }

    pub fn copy(count: usize, old_index: usize, new_index: usize) -> Self {
        Operation::Copy {
            count,
            old_index,
            new_index,
        }
    }

    /// The number of elements this operation covers.
    ///
    /// This is always 1 for additions and removals.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Operation::Add { .. } | Operation::Remove { .. } => 1,
            Operation::Copy { count, .. } => *count,
        }
    }

    #[must_use]
    pub fn old_index(&self) -> usize {
        match self {
            Operation::Add { old_index, .. }
            | Operation::Remove { old_index, .. }
            | Operation::Copy { old_index, .. } => *old_index,
        }
    }

    #[must_use]
    pub fn new_index(&self) -> usize {
        match self {
            Operation::Add { new_index, .. }
            | Operation::Remove { new_index, .. }
            | Operation::Copy { new_index, .. } => *new_index,
        }
    }
}

impl<V> PatchOperation<V> for Operation<V> {
    fn as_step(&self) -> Option<PatchStep<'_, V>> {
        Some(match self {
            Operation::Add { value, .. } => PatchStep::Add(value),
            Operation::Remove { value, .. } => PatchStep::Remove(value),
            Operation::Copy {
                count,
                old_index,
                new_index,
            } => PatchStep::Copy {
                count: *count,
                old_index: *old_index,
                new_index: *new_index,
            },
        })
    }
}

/// Builds caller facing operations from the harness output.
///
/// Returning `None` from any of these drops the operation from the result. That makes the diff
/// lossy, which is allowed: a caller that only wants additions can suppress everything else.
///
/// The index arguments always come as `(old_index, new_index)`, even for additions where only
/// the new index refers to a real element.
pub trait OperationFactory<V> {
    type Output;

    fn add(&mut self, value: &V, old_index: usize, new_index: usize) -> Option<Self::Output>;

    fn remove(&mut self, value: &V, old_index: usize, new_index: usize) -> Option<Self::Output>;

    fn copy(&mut self, count: usize, old_index: usize, new_index: usize) -> Option<Self::Output>;
}

/// The default factory, producing [`Operation`]s that own a clone of their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexedOps;

impl<V: Clone> OperationFactory<V> for IndexedOps {
    type Output = Operation<V>;

    fn add(&mut self, value: &V, old_index: usize, new_index: usize) -> Option<Operation<V>> {
        Some(Operation::add(value.clone(), old_index, new_index))
    }

    fn remove(&mut self, value: &V, old_index: usize, new_index: usize) -> Option<Operation<V>> {
        Some(Operation::remove(value.clone(), old_index, new_index))
    }

    fn copy(&mut self, count: usize, old_index: usize, new_index: usize) -> Option<Operation<V>> {
        Some(Operation::copy(count, old_index, new_index))
    }
}

/// The index-only operations algorithms work with.
///
/// These never carry values. `Replace` is only produced by the Wagner-Fischer variants and never
/// reaches callers: the harness expands it into a run of removals followed by a run of additions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinimalOp {
    Add {
        old_index: usize,
        new_index: usize,
    },
    Remove {
        old_index: usize,
        new_index: usize,
    },
    Copy {
        count: usize,
        old_index: usize,
        new_index: usize,
    },
    Replace {
        count: usize,
        old_index: usize,
        new_index: usize,
    },
}

impl MinimalOp {
    /// Try to absorb `next` into this operation.
    ///
    /// Only `Copy` runs merge with `Copy` runs and `Replace` runs with `Replace` runs. Returns
    /// whether `next` was absorbed.
    pub(crate) fn merge(&mut self, next: &MinimalOp) -> bool {
        match (self, next) {
            (MinimalOp::Copy { count, .. }, MinimalOp::Copy { count: more, .. })
            | (MinimalOp::Replace { count, .. }, MinimalOp::Replace { count: more, .. }) => {
                *count += more;
                true
            }
            _ => false,
        }
    }

    /// Shift both indices by `offset`.
    pub(crate) fn shifted(self, offset: usize) -> Self {
        match self {
            MinimalOp::Add {
                old_index,
                new_index,
            } => MinimalOp::Add {
                old_index: old_index + offset,
                new_index: new_index + offset,
            },
            MinimalOp::Remove {
                old_index,
                new_index,
            } => MinimalOp::Remove {
                old_index: old_index + offset,
                new_index: new_index + offset,
            },
            MinimalOp::Copy {
                count,
                old_index,
                new_index,
            } => MinimalOp::Copy {
                count,
                old_index: old_index + offset,
                new_index: new_index + offset,
            },
            MinimalOp::Replace {
                count,
                old_index,
                new_index,
            } => MinimalOp::Replace {
                count,
                old_index: old_index + offset,
                new_index: new_index + offset,
            },
        }
    }
}
