//! Marchetti's greedy frontier search.
//!
//! This is the forward half of Myers' search without the divide and conquer step: every diagonal
//! keeps the furthest left index reached so far along with the history that got there, and the
//! first diagonal to reach the bottom right corner wins.

use super::history::{History, HistoryId};
use super::{AlignContext, Aligner, DiffError, DiffOptions, align};
use crate::neg_idx_vec::NegIdxVec;
use crate::operation::{MinimalOp, OperationFactory};
use log::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Marchetti;

impl Aligner for Marchetti {
    fn align(&self, context: &mut AlignContext<'_>) -> Result<Vec<MinimalOp>, DiffError> {
        let n = context.left_count as isize;
        let m = context.right_count as isize;
        let (left_last, right_last) = (n - 1, m - 1);
        let max_steps = n + m + 1;
        let width = (2 * max_steps + 3) as usize;

        let mut frontier_lefts: NegIdxVec<isize> = NegIdxVec::new(width, || -1);
        let mut frontier_histories: NegIdxVec<HistoryId> = NegIdxVec::new(width, || None);
        let mut arena = History::new();

        for steps in 0..max_steps {
            let look_min = -steps - 1;
            let look_max = steps - 1;
            let mut look = look_min;
            while look < steps {
                let go_down = look == look_min
                    || (look < look_max && frontier_lefts[look - 1] < frontier_lefts[look + 1]);
                let (direction, index_offset) = if go_down {
                    (look + 1, 0)
                } else {
                    (look - 1, 1)
                };
                let mut left = frontier_lefts[direction] + index_offset;
                let mut right = left - (look + 1);
                let mut history = frontier_histories[direction];

                if go_down && (0..m).contains(&right) {
                    history = arena.push(
                        history,
                        MinimalOp::Add {
                            old_index: (left + 1) as usize,
                            new_index: right as usize,
                        },
                    );
                } else if (0..n).contains(&left) {
                    history = arena.push(
                        history,
                        MinimalOp::Remove {
                            old_index: left as usize,
                            new_index: (right + 1) as usize,
                        },
                    );
                }

                let mut copy_count = 0;
                while left < left_last
                    && right < right_last
                    && context.equals_at((left + 1) as usize, (right + 1) as usize)
                {
                    left += 1;
                    right += 1;
                    copy_count += 1;
                }
                if copy_count > 0 {
                    history = arena.push(
                        history,
                        MinimalOp::Copy {
                            count: copy_count,
                            old_index: (left - copy_count as isize + 1) as usize,
                            new_index: (right - copy_count as isize + 1) as usize,
                        },
                    );
                }

                if left >= left_last && right >= right_last {
                    debug!(
                        "Reached the end after {steps} steps with {} history records",
                        arena.len()
                    );
                    return Ok(arena.collect(history));
                }
                frontier_lefts[look] = left;
                frontier_histories[look] = history;
                look += 2;
            }
        }
        Err(DiffError::NotFound {
            steps: max_steps as usize,
            left_count: context.left_count,
            right_count: context.right_count,
        })
    }
}

/// Diff two sequences with Marchetti's algorithm.
pub fn marchetti_diff<V, F>(
    left: &[V],
    right: &[V],
    options: DiffOptions<'_, V, F>,
) -> Result<Vec<F::Output>, DiffError>
where
    F: OperationFactory<V>,
{
    align(left, right, options, &Marchetti)
}
