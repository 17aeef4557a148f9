//! Myers' diff in linear space, following Robert Elder's formulation.
//!
//! Each call searches for the "middle snake" of the current ranges by extending a forward and a
//! backward frontier in lockstep, then recurses into the parts before and after it. Only two
//! frontiers of `2 * min(n, m) + 2` entries are alive at a time.

use super::{AlignContext, Aligner, DiffError, DiffOptions, align};
use crate::neg_idx_vec::NegIdxVec;
use crate::operation::{MinimalOp, OperationFactory};
use log::trace;

/// Myers' algorithm. This is the default and usually the fastest option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Myers;

impl Aligner for Myers {
    fn align(&self, context: &mut AlignContext<'_>) -> Result<Vec<MinimalOp>, DiffError> {
        let mut ops = Vec::new();
        let (left_count, right_count) = (context.left_count, context.right_count);
        diff_slices(context, &mut ops, (0, left_count), (0, right_count))?;
        Ok(ops)
    }
}

/// Diff two sequences with Myers' algorithm.
///
/// ```rust
/// use libseqdiff::diff::{DiffOptions, myers_diff};
/// use libseqdiff::operation::Operation;
///
/// let ops = myers_diff(&[1, 2, 3], &[0, 1, 2, 3], DiffOptions::new()).unwrap();
/// assert_eq!(ops, vec![Operation::add(0, 0, 0), Operation::copy(3, 0, 1)]);
/// ```
pub fn myers_diff<V, F>(
    left: &[V],
    right: &[V],
    options: DiffOptions<'_, V, F>,
) -> Result<Vec<F::Output>, DiffError>
where
    F: OperationFactory<V>,
{
    align(left, right, options, &Myers)
}

/// Where the middle snake of a pair of ranges lies, as offsets from the range starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Split {
    /// Recurse into `..head` and `tail..`, the snake itself is a copied run
    Snake {
        left_head: usize,
        right_head: usize,
        left_tail: usize,
        right_tail: usize,
    },
    /// At most one edit apart: the shorter range is a prefix of the longer one
    Prefix,
}

/// Diff `left.0..left.1` against `right.0..right.1`, appending to `ops`.
fn diff_slices(
    context: &mut AlignContext<'_>,
    ops: &mut Vec<MinimalOp>,
    left: (usize, usize),
    right: (usize, usize),
) -> Result<(), DiffError> {
    let (left_start, left_max) = left;
    let (right_start, right_max) = right;
    trace!("diff_slices({left_start}:{left_max}, {right_start}:{right_max})");

    let left_count = left_max - left_start;
    let right_count = right_max - right_start;
    if left_count == 0 {
        ops.extend((right_start..right_max).map(|new_index| MinimalOp::Add {
            old_index: left_start,
            new_index,
        }));
        return Ok(());
    }
    if right_count == 0 {
        ops.extend((left_start..left_max).map(|old_index| MinimalOp::Remove {
            old_index,
            new_index: right_start,
        }));
        return Ok(());
    }

    match middle_snake(context, left_start, right_start, left_count, right_count)? {
        Split::Snake {
            left_head,
            right_head,
            left_tail,
            right_tail,
        } => {
            diff_slices(
                context,
                ops,
                (left_start, left_start + left_head),
                (right_start, right_start + right_head),
            )?;
            let middle_count = left_tail - left_head;
            if middle_count > 0 {
                ops.push(MinimalOp::Copy {
                    count: middle_count,
                    old_index: left_start + left_head,
                    new_index: right_start + right_head,
                });
            }
            diff_slices(
                context,
                ops,
                (left_start + left_tail, left_max),
                (right_start + right_tail, right_max),
            )
        }
        Split::Prefix => {
            let common = left_count.min(right_count);
            if common > 0 {
                ops.push(MinimalOp::Copy {
                    count: common,
                    old_index: left_start,
                    new_index: right_start,
                });
            }
            if right_count > left_count {
                diff_slices(
                    context,
                    ops,
                    (left_max, left_max),
                    (right_start + left_count, right_max),
                )
            } else if right_count < left_count {
                diff_slices(
                    context,
                    ops,
                    (left_start + right_count, left_max),
                    (right_max, right_max),
                )
            } else {
                Ok(())
            }
        }
    }
}

/// Find the middle snake of two non-empty ranges.
///
/// `look` is the diagonal, the difference between the left and right offsets. Direction 0 walks
/// forward from the range starts, direction 1 walks backward from the range ends, and the search
/// stops as soon as the two frontiers overlap.
fn middle_snake(
    context: &mut AlignContext<'_>,
    left_start: usize,
    right_start: usize,
    left_count: usize,
    right_count: usize,
) -> Result<Split, DiffError> {
    let n = left_count as isize;
    let m = right_count as isize;
    let total = n + m;
    let worst = (2 * left_count.min(right_count)) + 2;
    let count_change = n - m;
    let total_odd = total % 2;
    let window_max = total / 2 + total_odd + 1;

    let mut forward: NegIdxVec<isize> = NegIdxVec::new(worst, || 0);
    let mut backward: NegIdxVec<isize> = NegIdxVec::new(worst, || 0);

    for steps in 0..window_max {
        for direction in 0..2isize {
            let (primary, secondary, sign) = if direction == 0 {
                (&mut forward, &backward, 1)
            } else {
                (&mut backward, &forward, -1)
            };
            let odd = 1 - direction;
            let neg_one_if_even = odd - 1;
            let look_min = -(steps - 2 * (steps - m).max(0));
            let look_max = steps - 2 * (steps - n).max(0) + 1;
            let left_base = left_start as isize + direction * n + neg_one_if_even;
            let right_base = right_start as isize + direction * m + neg_one_if_even;

            let mut look = look_min;
            while look < look_max {
                let mut left_offset =
                    if look == -steps || (look != steps && primary[look - 1] < primary[look + 1]) {
                        primary[look + 1]
                    } else {
                        primary[look - 1] + 1
                    };
                let mut right_offset = left_offset - look;
                let (left_started, right_started) = (left_offset, right_offset);

                while (0..n).contains(&left_offset)
                    && (0..m).contains(&right_offset)
                    && context.equals_at(
                        (left_base + sign * left_offset) as usize,
                        (right_base + sign * right_offset) as usize,
                    )
                {
                    left_offset += 1;
                    right_offset += 1;
                }
                primary[look] = left_offset;

                let overshoot = count_change - look;
                if total_odd == odd
                    && overshoot >= -(steps - odd)
                    && overshoot <= steps - odd
                    && primary[look] + secondary[overshoot] >= n
                {
                    let double_steps = 2 * steps - odd;
                    let (left_head, right_head, left_tail, right_tail) = if odd == 1 {
                        (left_started, right_started, left_offset, right_offset)
                    } else {
                        (
                            n - left_offset,
                            m - right_offset,
                            n - left_started,
                            m - right_started,
                        )
                    };
                    trace!(
                        "Middle snake after {steps} steps: ({left_head}, {right_head}) to ({left_tail}, {right_tail})"
                    );
                    if double_steps > 1 || (left_head != left_tail && right_head != right_tail) {
                        return Ok(Split::Snake {
                            left_head: left_head as usize,
                            right_head: right_head as usize,
                            left_tail: left_tail as usize,
                            right_tail: right_tail as usize,
                        });
                    }
                    return Ok(Split::Prefix);
                }
                look += 2;
            }
        }
    }
    Err(DiffError::NotFound {
        steps: window_max as usize,
        left_count,
        right_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn myers(left: &[i32], right: &[i32]) -> Vec<Operation<i32>> {
        myers_diff(left, right, DiffOptions::new()).unwrap()
    }

    #[test]
    fn test_both_empty() {
        assert_eq!(myers(&[], &[]), vec![]);
    }

    #[test_case(&[0, 1, 2, 3], &[4, 1, 3], vec![
        Operation::remove(0, 0, 0),
        Operation::add(4, 1, 0),
        Operation::copy(1, 1, 1),
        Operation::remove(2, 2, 2),
        Operation::copy(1, 3, 2),
    ] ; "basic combos forward")]
    #[test_case(&[4, 1, 3], &[0, 1, 2, 3], vec![
        Operation::remove(4, 0, 0),
        Operation::add(0, 1, 0),
        Operation::copy(1, 1, 1),
        Operation::add(2, 2, 2),
        Operation::copy(1, 2, 3),
    ] ; "basic combos backward")]
    #[test_case(&[1, 2, 3], &[0, 1, 2, 3], vec![
        Operation::add(0, 0, 0),
        Operation::copy(3, 0, 1),
    ] ; "head insertions")]
    #[test_case(&[1, 2, 3], &[1, 2, 3, 0], vec![
        Operation::copy(3, 0, 0),
        Operation::add(0, 3, 3),
    ] ; "tail insertions")]
    #[test_case(&[0, 1, 2, 3], &[2, 3], vec![
        Operation::remove(0, 0, 0),
        Operation::remove(1, 1, 0),
        Operation::copy(2, 2, 0),
    ] ; "head removal")]
    #[test_case(&[1, 2, 3, 4], &[1, 2], vec![
        Operation::copy(2, 0, 0),
        Operation::remove(3, 2, 2),
        Operation::remove(4, 3, 2),
    ] ; "tail removal")]
    #[test_case(&[0, 1, 2, 3], &[4, 1, 2, 3], vec![
        Operation::remove(0, 0, 0),
        Operation::add(4, 1, 0),
        Operation::copy(3, 1, 1),
    ] ; "head changes")]
    #[test_case(&[1, 2, 3, 4], &[1, 2, 3, 5], vec![
        Operation::copy(3, 0, 0),
        Operation::remove(4, 3, 3),
        Operation::add(5, 4, 3),
    ] ; "tail changes")]
    #[test_case(&[0, 1, 2], &[3, 4, 5], vec![
        Operation::remove(0, 0, 0),
        Operation::remove(1, 1, 0),
        Operation::remove(2, 2, 0),
        Operation::add(3, 3, 0),
        Operation::add(4, 3, 1),
        Operation::add(5, 3, 2),
    ] ; "total replacement")]
    #[test_case(&[2, 4, 6, 8, 10, 12, 14, 16, 18], &[2, 4, 5, 6, 7, 8, 10, 16, 18], vec![
        Operation::copy(2, 0, 0),
        Operation::add(5, 2, 2),
        Operation::copy(1, 2, 3),
        Operation::add(7, 3, 4),
        Operation::copy(2, 3, 5),
        Operation::remove(12, 5, 7),
        Operation::remove(14, 6, 7),
        Operation::copy(2, 7, 7),
    ] ; "longer mixed sequences")]
    fn test_literal_diffs(left: &[i32], right: &[i32], expected: Vec<Operation<i32>>) {
        assert_eq!(myers(left, right), expected);
    }

    #[test]
    fn test_ignore_whitespace() {
        let ops = myers_diff(
            &["\tapple", "\tbanana", "durian"],
            &["  apple", "  cherry", "\tdurian"],
            DiffOptions::new().process_value(|s: &&str| s.trim()),
        )
        .unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::copy(1, 0, 0),
                Operation::remove("\tbanana", 1, 1),
                Operation::add("  cherry", 2, 1),
                Operation::copy(1, 2, 2),
            ]
        );
    }

    #[test]
    fn test_close_enough_numbers() {
        let before = [1.1, 2.2, 3.3];
        let after = [1.1, 2.3, 4.4];
        let expected = vec![
            Operation::copy(2, 0, 0),
            Operation::remove(3.3, 2, 2),
            Operation::add(4.4, 3, 2),
        ];
        let processed = myers_diff(
            &before,
            &after,
            DiffOptions::new().process_value(|n: &f64| n.round()),
        )
        .unwrap();
        assert_eq!(processed, expected);
        let compared = myers_diff(
            &before,
            &after,
            DiffOptions::new().equals(|a: &f64, b: &f64| a.round() == b.round()),
        )
        .unwrap();
        assert_eq!(compared, expected);
    }

    #[test]
    fn test_prefix_split_keeps_copied_run() {
        // Neither side can be trimmed, and the recursion bottoms out on ranges one edit apart.
        let ops = myers(&[7, 7, 7, 1], &[1, 7, 7, 7]);
        assert_eq!(
            ops,
            vec![
                Operation::add(1, 0, 0),
                Operation::copy(3, 0, 1),
                Operation::remove(1, 3, 4),
            ]
        );
    }

    #[test]
    fn test_middle_snake_of_single_insert() {
        let mut equals = |l: usize, r: usize| [5][l] == [5, 6][r];
        let mut context = AlignContext::new(&mut equals, 1, 2);
        assert_eq!(
            middle_snake(&mut context, 0, 0, 1, 2).unwrap(),
            Split::Prefix
        );
        let mut ops = Vec::new();
        diff_slices(&mut context, &mut ops, (0, 1), (0, 2)).unwrap();
        assert_eq!(
            ops,
            vec![
                MinimalOp::Copy {
                    count: 1,
                    old_index: 0,
                    new_index: 0,
                },
                MinimalOp::Add {
                    old_index: 1,
                    new_index: 1,
                },
            ]
        );
    }

    #[test]
    fn test_nothing_in_common() {
        let mut equals = |_: usize, _: usize| false;
        let mut context = AlignContext::new(&mut equals, 2, 2);
        assert_eq!(
            Myers.align(&mut context).unwrap(),
            vec![
                MinimalOp::Remove {
                    old_index: 0,
                    new_index: 0,
                },
                MinimalOp::Remove {
                    old_index: 1,
                    new_index: 0,
                },
                MinimalOp::Add {
                    old_index: 2,
                    new_index: 0,
                },
                MinimalOp::Add {
                    old_index: 2,
                    new_index: 1,
                },
            ]
        );
    }
}
