use crate::diff::{Algorithms, DiffOptions, diff};
use crate::operation::Operation;
use crate::patch::verify_round_trip;
use std::{io::Write, ops::Deref};

/// Implements the [std::io:Write] trait for strings.
///
/// This is used to test various utilities that write to a generic writer so we can test the
/// expected terminal output in unit tests.
///
/// This also derefs to a string so can be used basically as a drop in string.
pub(crate) struct StringWriter {
    internal_buffer: String,
}

impl StringWriter {
    pub fn new() -> Self {
        Self {
            internal_buffer: String::new(),
        }
    }

    /// Consume the writer and return the internal string.
    pub fn consume(self) -> String {
        self.internal_buffer
    }
}

impl Write for StringWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let s = String::from_utf8(buf.to_vec()).unwrap();
        self.internal_buffer += &s;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Deref for StringWriter {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.internal_buffer
    }
}

/// Check that replaying `ops` ends with both cursors at the end of their sequences.
pub(crate) fn assert_cursors_end<V: std::fmt::Debug>(
    ops: &[Operation<V>],
    left_len: usize,
    right_len: usize,
) {
    let (old, new) = ops.iter().fold((0, 0), |(old, new), op| match op {
        Operation::Add { .. } => (old, new + 1),
        Operation::Remove { .. } => (old + 1, new),
        Operation::Copy { count, .. } => (old + count, new + count),
    });
    assert_eq!((old, new), (left_len, right_len), "cursors at the end of {ops:?}");
}

/// Diff two sequences, then patch each side with the result and check the other side comes back.
///
/// `same` decides whether a rebuilt value counts as the original one. It should agree with the
/// comparison the diff was configured with, since lossy comparisons can't rebuild values exactly.
pub(crate) fn round_trip_with<V, S>(
    algorithm: &Algorithms,
    left: &[V],
    right: &[V],
    options: DiffOptions<'_, V>,
    same: S,
) -> Vec<Operation<V>>
where
    V: Clone + std::fmt::Debug,
    S: Fn(&V, &V) -> bool,
{
    let ops = diff(algorithm, left, right, options).unwrap();
    assert_cursors_end(&ops, left.len(), right.len());
    if let Err(e) = verify_round_trip(left, right, &ops, same) {
        panic!("{e:#} in {ops:?}");
    }
    ops
}

/// [`round_trip_with`] using the default comparison.
pub(crate) fn round_trip<V>(algorithm: &Algorithms, left: &[V], right: &[V]) -> Vec<Operation<V>>
where
    V: Clone + PartialEq + std::fmt::Debug,
{
    round_trip_with(algorithm, left, right, DiffOptions::new(), |a, b| a == b)
}
