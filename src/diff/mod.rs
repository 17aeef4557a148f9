//! Computing minimal edit scripts between two sequences.
//!
//! Every algorithm here shares the same harness: the cheap cases (empty inputs, the same slice
//! twice, a fully matching prefix) are handled up front, the common head and tail are trimmed,
//! and only the residual middle is handed to the algorithm. The algorithm reasons in indices
//! relative to that residual and returns [`MinimalOp`]s, which the harness shifts back, merges
//! and turns into caller facing operations with an [`OperationFactory`].

mod history;
pub mod marchetti;
pub mod myers;
pub mod wagner_fischer;

use crate::equality::{BiPredicate, EqualsAt, ValueProcessor, equals_identity};
use crate::operation::{IndexedOps, MinimalOp, OperationFactory};
use enum_dispatch::enum_dispatch;
use log::debug;
use logging_timer::time;
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

pub use marchetti::{Marchetti, marchetti_diff};
pub use myers::{Myers, myers_diff};
pub use wagner_fischer::{
    WagnerFischer, WagnerFischerOriginal, wagner_fischer_diff, wagner_fischer_original_diff,
};

/// Errors that can come out of a diff.
///
/// None of these are expected for well behaved inputs: a search that runs out of steps means the
/// equality predicate is inconsistent (not reflexive, not symmetric...) or there is a bug in an
/// algorithm.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error(
        "Could not find a diff within {steps} steps ({left_count} left and {right_count} right elements)"
    )]
    NotFound {
        steps: usize,
        left_count: usize,
        right_count: usize,
    },
}

/// How to compare elements and how to build the resulting operations.
///
/// ```rust
/// use libseqdiff::diff::{DiffOptions, myers_diff};
/// use libseqdiff::operation::Operation;
///
/// let before = [1.1, 2.2, 3.3];
/// let after = [1.1, 2.3, 4.4];
/// let options = DiffOptions::new().process_value(|n: &f64| n.round());
/// let ops = myers_diff(&before, &after, options).unwrap();
/// assert_eq!(ops[0], Operation::copy(2, 0, 0));
/// ```
pub struct DiffOptions<'a, V, F = IndexedOps> {
    equals: BiPredicate<'a, V>,
    custom_equals: bool,
    process_value: Option<ValueProcessor<'a, V>>,
    cache_equals: Option<bool>,
    factory: F,
}

impl<'a, V: PartialEq + 'a> DiffOptions<'a, V> {
    /// Options comparing elements with `==` and producing [`Operation`](crate::operation::Operation)s.
    pub fn new() -> Self {
        Self {
            equals: Box::new(equals_identity::<V>),
            custom_equals: false,
            process_value: None,
            cache_equals: None,
            factory: IndexedOps,
        }
    }
}

impl<'a, V: PartialEq + 'a> Default for DiffOptions<'a, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, V> DiffOptions<'a, V> {
    /// Options for element types without a `PartialEq` implementation.
    pub fn with_equals<E>(equals: E) -> Self
    where
        E: Fn(&V, &V) -> bool + 'a,
    {
        Self {
            equals: Box::new(equals),
            custom_equals: true,
            process_value: None,
            cache_equals: None,
            factory: IndexedOps,
        }
    }
}

impl<'a, V, F> DiffOptions<'a, V, F> {
    /// Replace the equality predicate.
    ///
    /// A custom predicate is assumed to be expensive, so this also turns comparison caching on
    /// unless [`cache_equals`](Self::cache_equals) says otherwise.
    #[must_use]
    pub fn equals<E>(mut self, equals: E) -> Self
    where
        E: Fn(&V, &V) -> bool + 'a,
    {
        self.equals = Box::new(equals);
        self.custom_equals = true;
        self
    }

    /// Transform every element before it is compared.
    ///
    /// The sequences themselves are untouched and operations carry the original values.
    #[must_use]
    pub fn process_value<P>(mut self, process: P) -> Self
    where
        P: Fn(&V) -> V + 'a,
    {
        self.process_value = Some(Box::new(process));
        self
    }

    /// Force comparison caching on or off.
    #[must_use]
    pub fn cache_equals(mut self, cache: bool) -> Self {
        self.cache_equals = Some(cache);
        self
    }

    /// Build operations with a different factory.
    #[must_use]
    pub fn factory<G>(self, factory: G) -> DiffOptions<'a, V, G> {
        DiffOptions {
            equals: self.equals,
            custom_equals: self.custom_equals,
            process_value: self.process_value,
            cache_equals: self.cache_equals,
            factory,
        }
    }

    /// Whether comparison results will be cached.
    #[must_use]
    pub fn caches_equals(&self) -> bool {
        self.cache_equals.unwrap_or(self.custom_equals)
    }
}

/// What an algorithm gets to work with.
///
/// Indices are relative to the residual ranges, after the common head and tail were trimmed, so
/// the left range is `0..left_count` and the right range is `0..right_count`.
pub struct AlignContext<'c> {
    equals_at: &'c mut dyn FnMut(usize, usize) -> bool,
    pub left_count: usize,
    pub right_count: usize,
}

impl<'c> AlignContext<'c> {
    pub fn new(
        equals_at: &'c mut dyn FnMut(usize, usize) -> bool,
        left_count: usize,
        right_count: usize,
    ) -> Self {
        Self {
            equals_at,
            left_count,
            right_count,
        }
    }

    /// Whether the residual elements at the given indices compare equal.
    pub fn equals_at(&mut self, left_index: usize, right_index: usize) -> bool {
        (self.equals_at)(left_index, right_index)
    }
}

/// The comparison logic of a diff algorithm.
///
/// Implementations only see the residual ranges. They must return operations that, replayed in
/// order, walk both residual ranges from start to end.
#[enum_dispatch]
pub trait Aligner {
    fn align(&self, context: &mut AlignContext<'_>) -> Result<Vec<MinimalOp>, DiffError>;
}

/// The available diff algorithms.
#[enum_dispatch(Aligner)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Algorithms {
    Myers,
    Marchetti,
    WagnerFischer,
    WagnerFischerOriginal,
}

impl Default for Algorithms {
    fn default() -> Self {
        Algorithms::Myers(Myers)
    }
}

/// Diff two sequences with the given algorithm.
pub fn diff<V, F>(
    algorithm: &Algorithms,
    left: &[V],
    right: &[V],
    options: DiffOptions<'_, V, F>,
) -> Result<Vec<F::Output>, DiffError>
where
    F: OperationFactory<V>,
{
    align(left, right, options, algorithm)
}

/// The shared harness.
#[time("debug", "diff::{}")]
pub(crate) fn align<V, F, A>(
    left: &[V],
    right: &[V],
    options: DiffOptions<'_, V, F>,
    body: &A,
) -> Result<Vec<F::Output>, DiffError>
where
    F: OperationFactory<V>,
    A: Aligner + ?Sized,
{
    if left.is_empty() && right.is_empty() {
        return Ok(Vec::new());
    }
    let cache = options.caches_equals();
    let DiffOptions {
        equals,
        process_value,
        mut factory,
        ..
    } = options;

    // Same slice on both sides: nothing can differ, and there's no need to look at the values.
    if std::ptr::eq(left, right) {
        debug!("Both sides are the same sequence, skipping comparison");
        return Ok(factory.copy(left.len(), 0, 0).into_iter().collect());
    }

    let compare = |left_index: usize, right_index: usize| match &process_value {
        Some(process) => equals(&process(&left[left_index]), &process(&right[right_index])),
        None => equals(&left[left_index], &right[right_index]),
    };
    let mut equals_at = EqualsAt::new(compare, cache);
    debug!("Comparison caching: {cache}");

    let mut start = 0;
    while start < left.len() && start < right.len() && equals_at.call(start, start) {
        start += 1;
    }
    let mut left_max = left.len();
    let mut right_max = right.len();
    if start == left_max && start == right_max {
        debug!("Sequences are equal");
        return Ok(factory.copy(left_max, 0, 0).into_iter().collect());
    }
    while left_max > start && right_max > start && equals_at.call(left_max - 1, right_max - 1) {
        left_max -= 1;
        right_max -= 1;
    }
    let tail_count = left.len() - left_max;
    debug!("Trimmed a common head of {start} and a common tail of {tail_count}");

    let mut residual_equals = |left_index: usize, right_index: usize| {
        equals_at.call(left_index + start, right_index + start)
    };
    let mut context = AlignContext::new(
        &mut residual_equals,
        left_max - start,
        right_max - start,
    );
    let middle = body.align(&mut context)?;

    let mut ops = Vec::with_capacity(middle.len() + 2);
    if start > 0 {
        ops.push(MinimalOp::Copy {
            count: start,
            old_index: 0,
            new_index: 0,
        });
    }
    ops.extend(middle.into_iter().map(|op| op.shifted(start)));
    if tail_count > 0 {
        ops.push(MinimalOp::Copy {
            count: tail_count,
            old_index: left_max,
            new_index: right_max,
        });
    }
    Ok(expand(left, right, merge_runs(ops), &mut factory))
}

/// Merge adjacent `Copy` runs, and adjacent `Replace` runs.
fn merge_runs(ops: Vec<MinimalOp>) -> Vec<MinimalOp> {
    let mut merged: Vec<MinimalOp> = Vec::with_capacity(ops.len());
    for op in ops {
        if let Some(last) = merged.last_mut() {
            if last.merge(&op) {
                continue;
            }
        }
        merged.push(op);
    }
    merged
}

/// Turn minimal operations into caller facing ones.
///
/// A `Replace` run of `count` becomes `count` removals, all at the same write head, followed by
/// `count` additions, all at the read head the removals left behind. Anything the factory
/// declines to build is dropped.
fn expand<V, F>(left: &[V], right: &[V], ops: Vec<MinimalOp>, factory: &mut F) -> Vec<F::Output>
where
    F: OperationFactory<V>,
{
    let mut result = Vec::with_capacity(ops.len());
    for op in ops {
        match op {
            MinimalOp::Add {
                old_index,
                new_index,
            } => result.extend(factory.add(&right[new_index], old_index, new_index)),
            MinimalOp::Remove {
                old_index,
                new_index,
            } => result.extend(factory.remove(&left[old_index], old_index, new_index)),
            MinimalOp::Copy {
                count,
                old_index,
                new_index,
            } => result.extend(factory.copy(count, old_index, new_index)),
            MinimalOp::Replace {
                count,
                old_index,
                new_index,
            } => {
                for idx in old_index..old_index + count {
                    result.extend(factory.remove(&left[idx], idx, new_index));
                }
                for idx in new_index..new_index + count {
                    result.extend(factory.add(&right[idx], old_index + count, idx));
                }
            }
        }
    }
    result
}
