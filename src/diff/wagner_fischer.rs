//! Wagner-Fischer edit distance, recording the edits along the way.
//!
//! Unlike the snake based searches this fills a full `(n + 1) x (m + 1)` cost table, so it needs
//! `O(n * m)` comparisons in every case. It is also the only algorithm that emits replacements,
//! which the harness expands into removals followed by additions.
//!
//! Ties are broken in a fixed order: replace (or match), then insert, then delete.

use super::history::{History, HistoryId};
use super::{AlignContext, Aligner, DiffError, DiffOptions, align};
use crate::operation::{MinimalOp, OperationFactory};
use log::debug;

/// Get the minimum of an arbitrary number of elements
macro_rules! min {
    ($x: expr) => ($x);
    ($x: expr, $($z: expr),+) => (::std::cmp::min($x, min!($($z),*)));
}

/// The edit chosen for one cell and the cell it extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Diagonal: a match or a replacement
    Diagonal(MinimalOp),
    /// From the cell above: an insertion
    Insert(MinimalOp),
    /// From the cell to the left: a deletion
    Delete(MinimalOp),
}

/// Pick the cheapest edit for cell `(left_cursor, right_cursor)`.
///
/// Returns the cell's distance and the chosen step.
fn choose_step(
    same: bool,
    left_cursor: usize,
    right_cursor: usize,
    delete_cost: usize,
    insert_cost: usize,
    diagonal_cost: usize,
) -> (usize, Step) {
    let min_cost = min!(delete_cost, insert_cost, diagonal_cost);
    let step = if min_cost == diagonal_cost {
        let (count, old_index, new_index) = (1, left_cursor - 1, right_cursor - 1);
        Step::Diagonal(if same {
            MinimalOp::Copy {
                count,
                old_index,
                new_index,
            }
        } else {
            MinimalOp::Replace {
                count,
                old_index,
                new_index,
            }
        })
    } else if min_cost == insert_cost {
        Step::Insert(MinimalOp::Add {
            old_index: left_cursor,
            new_index: right_cursor - 1,
        })
    } else {
        Step::Delete(MinimalOp::Remove {
            old_index: left_cursor - 1,
            new_index: right_cursor,
        })
    };
    (min_cost, step)
}

/// Wagner-Fischer keeping two rows of the table and sharing history prefixes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WagnerFischer;

impl Aligner for WagnerFischer {
    fn align(&self, context: &mut AlignContext<'_>) -> Result<Vec<MinimalOp>, DiffError> {
        let (left_count, right_count) = (context.left_count, context.right_count);
        let mut arena = History::new();

        let mut previous_distance: Vec<usize> = (0..=left_count).collect();
        let mut previous_ops: Vec<HistoryId> = Vec::with_capacity(left_count + 1);
        previous_ops.push(None);
        for left_cursor in 1..=left_count {
            let history = arena.push(
                previous_ops[left_cursor - 1],
                MinimalOp::Remove {
                    old_index: left_cursor - 1,
                    new_index: 0,
                },
            );
            previous_ops.push(history);
        }

        for right_cursor in 1..=right_count {
            let mut current_distance = Vec::with_capacity(left_count + 1);
            let mut current_ops = Vec::with_capacity(left_count + 1);
            current_distance.push(right_cursor);
            current_ops.push(arena.push(
                previous_ops[0],
                MinimalOp::Add {
                    old_index: 0,
                    new_index: right_cursor - 1,
                },
            ));

            for left_cursor in 1..=left_count {
                let same = context.equals_at(left_cursor - 1, right_cursor - 1);
                let (cost, step) = choose_step(
                    same,
                    left_cursor,
                    right_cursor,
                    current_distance[left_cursor - 1] + 1,
                    previous_distance[left_cursor] + 1,
                    previous_distance[left_cursor - 1] + usize::from(!same),
                );
                let history = match step {
                    Step::Diagonal(op) => arena.push(previous_ops[left_cursor - 1], op),
                    Step::Insert(op) => arena.push(previous_ops[left_cursor], op),
                    Step::Delete(op) => arena.push(current_ops[left_cursor - 1], op),
                };
                current_distance.push(cost);
                current_ops.push(history);
            }
            previous_distance = current_distance;
            previous_ops = current_ops;
        }
        debug!(
            "Edit distance {} with {} history records",
            previous_distance[left_count],
            arena.len()
        );
        Ok(arena.collect(previous_ops[left_count]))
    }
}

/// The textbook Wagner-Fischer: a full table of distances and a full table of histories.
///
/// This produces the same operations as [`WagnerFischer`], it is kept as a reference to check
/// the optimized variant against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WagnerFischerOriginal;

impl Aligner for WagnerFischerOriginal {
    fn align(&self, context: &mut AlignContext<'_>) -> Result<Vec<MinimalOp>, DiffError> {
        let (left_count, right_count) = (context.left_count, context.right_count);
        let mut distances = vec![vec![0usize; right_count + 1]; left_count + 1];
        let mut operations: Vec<Vec<Vec<MinimalOp>>> =
            vec![vec![Vec::new(); right_count + 1]; left_count + 1];

        for left_cursor in 1..=left_count {
            distances[left_cursor][0] = left_cursor;
            let mut history = operations[left_cursor - 1][0].clone();
            history.push(MinimalOp::Remove {
                old_index: left_cursor - 1,
                new_index: 0,
            });
            operations[left_cursor][0] = history;
        }
        for right_cursor in 1..=right_count {
            distances[0][right_cursor] = right_cursor;
            let mut history = operations[0][right_cursor - 1].clone();
            history.push(MinimalOp::Add {
                old_index: 0,
                new_index: right_cursor - 1,
            });
            operations[0][right_cursor] = history;
        }

        for right_cursor in 1..=right_count {
            for left_cursor in 1..=left_count {
                let same = context.equals_at(left_cursor - 1, right_cursor - 1);
                let (cost, step) = choose_step(
                    same,
                    left_cursor,
                    right_cursor,
                    distances[left_cursor - 1][right_cursor] + 1,
                    distances[left_cursor][right_cursor - 1] + 1,
                    distances[left_cursor - 1][right_cursor - 1] + usize::from(!same),
                );
                let (mut history, op) = match step {
                    Step::Diagonal(op) => (operations[left_cursor - 1][right_cursor - 1].clone(), op),
                    Step::Insert(op) => (operations[left_cursor][right_cursor - 1].clone(), op),
                    Step::Delete(op) => (operations[left_cursor - 1][right_cursor].clone(), op),
                };
                history.push(op);
                distances[left_cursor][right_cursor] = cost;
                operations[left_cursor][right_cursor] = history;
            }
        }
        debug!("Edit distance {}", distances[left_count][right_count]);
        Ok(std::mem::take(&mut operations[left_count][right_count]))
    }
}

/// Diff two sequences with the two-row Wagner-Fischer variant.
pub fn wagner_fischer_diff<V, F>(
    left: &[V],
    right: &[V],
    options: DiffOptions<'_, V, F>,
) -> Result<Vec<F::Output>, DiffError>
where
    F: OperationFactory<V>,
{
    align(left, right, options, &WagnerFischer)
}

/// Diff two sequences with the full-table Wagner-Fischer variant.
pub fn wagner_fischer_original_diff<V, F>(
    left: &[V],
    right: &[V],
    options: DiffOptions<'_, V, F>,
) -> Result<Vec<F::Output>, DiffError>
where
    F: OperationFactory<V>,
{
    align(left, right, options, &WagnerFischerOriginal)
}
