//! Element equality predicates and the memoizing wrapper used to avoid repeating expensive
//! comparisons.

use std::collections::HashMap;
use std::hash::Hash;

/// A boxed binary predicate over two elements.
pub type BiPredicate<'a, V> = Box<dyn Fn(&V, &V) -> bool + 'a>;

/// A boxed transform applied to every element before it is compared.
pub type ValueProcessor<'a, V> = Box<dyn Fn(&V) -> V + 'a>;

/// Plain `==` comparison.
///
/// This is the default equality predicate for a diff. It is cheap for most types, which is why a
/// diff that uses it doesn't cache comparison results unless asked to.
pub fn equals_identity<V: PartialEq + ?Sized>(a: &V, b: &V) -> bool {
    a == b
}

/// A caching wrapper around a function of two arguments of the same type.
///
/// Each distinct `(left, right)` pair is evaluated at most once, subsequent calls with the same
/// pair return the stored result. The cache lives as long as the wrapper and is not shared, so a
/// wrapper must not be used from more than one diff at a time.
#[derive(Debug)]
pub struct Memoized<K, R, F> {
    func: F,
    cache: HashMap<(K, K), R>,
}

impl<K, R, F> Memoized<K, R, F>
where
    K: Hash + Eq + Clone,
    R: Clone,
    F: FnMut(K, K) -> R,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            cache: HashMap::new(),
        }
    }

    /// Evaluate the wrapped function, or return the cached result for this pair.
    pub fn call(&mut self, left: K, right: K) -> R {
        if let Some(result) = self.cache.get(&(left.clone(), right.clone())) {
            return result.clone();
        }
        let result = (self.func)(left.clone(), right.clone());
        self.cache.insert((left, right), result.clone());
        result
    }

    /// The number of distinct pairs that have been evaluated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Index based equality used by the diff harness.
///
/// Algorithms compare positions rather than values, so the harness builds one of these over the
/// raw element comparison and, depending on the cache policy, memoizes it by index pair.
pub(crate) enum EqualsAt<F> {
    Direct(F),
    Cached(Memoized<usize, bool, F>),
}

impl<F> EqualsAt<F>
where
    F: FnMut(usize, usize) -> bool,
{
    pub fn new(func: F, cache: bool) -> Self {
        if cache {
            EqualsAt::Cached(Memoized::new(func))
        } else {
            EqualsAt::Direct(func)
        }
    }

    pub fn call(&mut self, left_index: usize, right_index: usize) -> bool {
        match self {
            EqualsAt::Direct(func) => func(left_index, right_index),
            EqualsAt::Cached(memo) => memo.call(left_index, right_index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[test]
    fn test_equals_identity() {
        assert!(equals_identity(&1, &1));
        assert!(!equals_identity(&1, &2));
        assert!(equals_identity("apple", "apple"));
        assert!(!equals_identity(&f64::NAN, &f64::NAN));
    }

    #[test]
    fn test_memoized_calls_once_per_pair() {
        let calls = RefCell::new(Vec::new());
        let mut caching_equals = Memoized::new(|a: i32, b: i32| {
            calls.borrow_mut().push((a, b));
            a == b
        });
        assert!(!caching_equals.call(1, 2));
        assert!(caching_equals.call(3, 3));
        assert!(!caching_equals.call(1, 2));
        assert!(caching_equals.call(3, 3));
        assert_eq!(*calls.borrow(), vec![(1, 2), (3, 3)]);
        assert_eq!(caching_equals.len(), 2);
    }

    #[test]
    fn test_memoized_pair_order_matters() {
        let calls = RefCell::new(0);
        let mut sub = Memoized::new(|a: i64, b: i64| {
            *calls.borrow_mut() += 1;
            a - b
        });
        assert_eq!(sub.call(1, 2), -1);
        assert_eq!(sub.call(2, 1), 1);
        assert_eq!(sub.call(1, 2), -1);
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn test_memoized_optional_results() {
        let calls = RefCell::new(Vec::new());
        let mut checked = Memoized::new(|a: Option<i32>, b: Option<i32>| {
            calls.borrow_mut().push((a, b));
            match (a, b) {
                (None, _) | (_, None) => None,
                (Some(a), Some(b)) => a.checked_sub(b),
            }
        });
        assert_eq!(checked.call(Some(1), Some(2)), Some(-1));
        assert_eq!(checked.call(None, Some(2)), None);
        assert_eq!(checked.call(Some(1), None), None);
        assert_eq!(checked.call(None, Some(2)), None);
        assert_eq!(checked.call(Some(1), Some(2)), Some(-1));
        assert_eq!(
            *calls.borrow(),
            vec![(Some(1), Some(2)), (None, Some(2)), (Some(1), None)]
        );
    }

    #[test]
    fn test_equals_at_direct_does_not_cache() {
        let calls = RefCell::new(0);
        let mut eq = EqualsAt::new(
            |l: usize, r: usize| {
                *calls.borrow_mut() += 1;
                l == r
            },
            false,
        );
        assert!(eq.call(2, 2));
        assert!(eq.call(2, 2));
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn test_equals_at_cached() {
        let calls = RefCell::new(0);
        let mut eq = EqualsAt::new(
            |l: usize, r: usize| {
                *calls.borrow_mut() += 1;
                l == r
            },
            true,
        );
        assert!(eq.call(2, 2));
        assert!(eq.call(2, 2));
        assert!(!eq.call(2, 3));
        assert_eq!(*calls.borrow(), 2);
    }
}
