//! Replaying a diff against one of its sequences to rebuild the other.

use crate::operation::Operation;
use anyhow::{Context, bail, ensure};
use log::{trace, warn};
use logging_timer::time;
use thiserror::Error;

/// What a single operation asks the patch engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchStep<'a, V> {
    /// Emit `value` when patching forward, skip it in reverse
    Add(&'a V),
    /// Emit `value` when patching in reverse, skip it going forward
    Remove(&'a V),
    /// Emit `count` values from the source, starting at `old_index` going forward or at
    /// `new_index` in reverse
    Copy {
        count: usize,
        old_index: usize,
        new_index: usize,
    },
}

/// Anything the patch engine can replay.
///
/// This is what lets callers that built their own operation type through an
/// [`OperationFactory`](crate::operation::OperationFactory) patch with it. Returning `None`
/// marks the operation as one the engine doesn't understand.
pub trait PatchOperation<V> {
    fn as_step(&self) -> Option<PatchStep<'_, V>>;
}

/// A callback run with every operation and its position before it is applied.
///
/// Returning an error aborts the patch.
pub type OperationHook<'a, O> = Box<dyn FnMut(&O, usize) -> anyhow::Result<()> + 'a>;

/// Options for [`apply_patch`].
pub struct PatchOptions<'a, O> {
    /// Rebuild the left sequence from the right one instead of the other way around
    pub reverse: bool,

    /// Observe each operation before it is applied
    pub on_operation: Option<OperationHook<'a, O>>,
}

impl<O> Default for PatchOptions<'_, O> {
    fn default() -> Self {
        Self {
            reverse: false,
            on_operation: None,
        }
    }
}

impl<'a, O> PatchOptions<'a, O> {
    pub fn forward() -> Self {
        Self::default()
    }

    pub fn reverse() -> Self {
        Self {
            reverse: true,
            on_operation: None,
        }
    }

    /// Install a hook that sees every operation before it is applied.
    #[must_use]
    pub fn on_operation<H>(mut self, hook: H) -> Self
    where
        H: FnMut(&O, usize) -> anyhow::Result<()> + 'a,
    {
        self.on_operation = Some(Box::new(hook));
        self
    }
}

/// The ways a patch can fail.
///
/// No partial result is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("Operation {index} is not an add, remove or copy operation")]
    UnknownOperation { index: usize },

    #[error("Patch aborted at operation {index}")]
    Aborted {
        index: usize,
        #[source]
        source: anyhow::Error,
    },
}

/// Apply a diff to `original`.
///
/// Going forward, `original` is the left sequence and the right one is rebuilt: additions and
/// copied runs are emitted while removals are skipped. In reverse, `original` is the right
/// sequence and the left one is rebuilt from removals and copied runs.
#[time("debug", "patch::{}")]
pub fn apply_patch<V, O>(
    original: &[V],
    changes: &[O],
    options: PatchOptions<'_, O>,
) -> Result<Vec<V>, PatchError>
where
    V: Clone,
    O: PatchOperation<V>,
{
    let PatchOptions {
        reverse,
        mut on_operation,
    } = options;
    let mut result = Vec::with_capacity(original.len());

    for (index, change) in changes.iter().enumerate() {
        if let Some(hook) = on_operation.as_mut() {
            hook(change, index).map_err(|source| PatchError::Aborted { index, source })?;
        }
        match change.as_step() {
            Some(PatchStep::Add(value)) => {
                if !reverse {
                    result.push(value.clone());
                }
            }
            Some(PatchStep::Remove(value)) => {
                if reverse {
                    result.push(value.clone());
                }
            }
            Some(PatchStep::Copy {
                count,
                old_index,
                new_index,
            }) => {
                let start = if reverse { new_index } else { old_index };
                result.extend_from_slice(copy_run(original, start, count));
            }
            None => return Err(PatchError::UnknownOperation { index }),
        }
    }
    trace!(
        "Patched {} operations into {} values (reverse: {})",
        changes.len(),
        result.len(),
        reverse
    );
    Ok(result)
}

/// A patch hook that checks the read/write head convention of [`Operation`]s.
///
/// Every operation has to declare exactly the cursor positions that replaying the diff up to that
/// point produces. The first mismatch aborts the patch.
pub fn cursor_hook<V>() -> impl FnMut(&Operation<V>, usize) -> anyhow::Result<()> {
    let mut next_old = 0;
    let mut next_new = 0;
    move |op, index| {
        ensure!(
            op.old_index() == next_old,
            "old_index[{index}] is {}, expected {next_old}",
            op.old_index()
        );
        ensure!(
            op.new_index() == next_new,
            "new_index[{index}] is {}, expected {next_new}",
            op.new_index()
        );
        match op {
            Operation::Add { .. } => next_new += 1,
            Operation::Remove { .. } => next_old += 1,
            Operation::Copy { count, .. } => {
                next_old += count;
                next_new += count;
            }
        }
        Ok(())
    }
}

/// Replay `ops` in both directions and check that each side rebuilds the other.
///
/// `same` decides whether a rebuilt value stands for the original one, which lets diffs computed
/// with a lossy comparison be checked with that same comparison.
#[time("debug", "patch::{}")]
pub fn verify_round_trip<V, S>(
    left: &[V],
    right: &[V],
    ops: &[Operation<V>],
    same: S,
) -> anyhow::Result<()>
where
    V: Clone,
    S: Fn(&V, &V) -> bool,
{
    let right_from_left = apply_patch(left, ops, PatchOptions::forward().on_operation(cursor_hook()))
        .context("Failed to patch the left sequence")?;
    let left_from_right = apply_patch(right, ops, PatchOptions::reverse().on_operation(cursor_hook()))
        .context("Failed to patch the right sequence")?;
    check_rebuilt("right", right, &right_from_left, &same)?;
    check_rebuilt("left", left, &left_from_right, &same)?;
    Ok(())
}

fn check_rebuilt<V, S>(side: &str, expected: &[V], rebuilt: &[V], same: &S) -> anyhow::Result<()>
where
    S: Fn(&V, &V) -> bool,
{
    ensure!(
        expected.len() == rebuilt.len(),
        "Rebuilt {side} sequence has {} values, expected {}",
        rebuilt.len(),
        expected.len()
    );
    if let Some(index) = expected
        .iter()
        .zip(rebuilt)
        .position(|(expected, rebuilt)| !same(expected, rebuilt))
    {
        bail!("Rebuilt {side} sequence differs at index {index}");
    }
    Ok(())
}

/// The values a copy run refers to.
///
/// A run that reaches past the end of the source is truncated rather than rejected, so that a
/// diff computed with a lossy comparison can still be replayed.
pub(crate) fn copy_run<V>(original: &[V], start: usize, count: usize) -> &[V] {
    let end = start.saturating_add(count);
    if end > original.len() {
        warn!(
            "Copy of {} values at {} runs past the end of a {} value sequence",
            count,
            start,
            original.len()
        );
    }
    let start = start.min(original.len());
    let end = end.min(original.len());
    &original[start..end]
}
