//! Negative index vector
//!
//! A fixed-size vector that accepts any signed index and resolves it with a floored modulo, so
//! `-1` is the last slot and `len` wraps back around to the first one.

use std::ops::{Index, IndexMut};

/// A vector that can be indexed with a negative or out of range index.
///
/// ```rust
/// use libseqdiff::neg_idx_vec::NegIdxVec;
/// let v = NegIdxVec::from(vec![1, 2, 3]);
/// assert_eq!(v[-1], 3);
/// assert_eq!(v[3], 1);
/// ```
///
/// The diff frontiers index this by diagonal, which is centered on zero and may be negative. The
/// searches only ever keep a bounded window of diagonals alive at the same time, so the wrapping
/// lets them use an arena sized to that window rather than to the full diagonal range.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NegIdxVec<T> {
    /// The underlying vector for the negative index vector
    pub data: Vec<T>,
}

impl<T> NegIdxVec<T> {
    /// Create a negative index vector with a given size.
    ///
    /// Every offset is wrapped relative to this size, so it must be non-zero before the vector is
    /// indexed.
    ///
    /// ```rust
    /// use libseqdiff::neg_idx_vec::NegIdxVec;
    /// let v: NegIdxVec<isize> = NegIdxVec::new(4, Default::default);
    /// assert_eq!(v[-7], 0);
    /// ```
    pub fn new<F>(len: usize, f: F) -> Self
    where
        F: FnMut() -> T,
    {
        let mut data = Vec::new();
        data.resize_with(len, f);
        Self { data }
    }

    /// Resolve a potentially negative index to the "real" index into the internal vector.
    ///
    /// This is the floored (Knuth) modulo of `idx` by the length of the vector, which is always
    /// in `[0, len)` regardless of the sign of `idx`.
    fn idx_helper(&self, idx: isize) -> usize {
        debug_assert!(!self.data.is_empty(), "indexed an empty NegIdxVec");
        let len = self.data.len() as isize;
        idx.rem_euclid(len) as usize
    }

    /// Get the length of the vector
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns whether the vector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> From<Vec<T>> for NegIdxVec<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T> FromIterator<T> for NegIdxVec<T> {
    fn from_iter<Iter: IntoIterator<Item = T>>(iter: Iter) -> Self {
        Self {
            data: Vec::from_iter(iter),
        }
    }
}

impl<T> Default for NegIdxVec<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T> Index<isize> for NegIdxVec<T> {
    type Output = T;

    fn index(&self, idx: isize) -> &<Self as std::ops::Index<isize>>::Output {
        &self.data[self.idx_helper(idx)]
    }
}

impl<T> IndexMut<isize> for NegIdxVec<T> {
    fn index_mut(&mut self, idx: isize) -> &mut <Self as std::ops::Index<isize>>::Output {
        let offset_idx = self.idx_helper(idx);
        &mut self.data[offset_idx]
    }
}
