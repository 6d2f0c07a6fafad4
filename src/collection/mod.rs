//! The lazy key-value pipeline.
//!
//! A [`Collection<K, V>`] is an immutable pipeline stage: a transform closure
//! plus the upstream stage it reads from. Calling an operation never runs
//! anything; it captures the current collection inside a new closure and
//! returns a new collection. Work happens only when the final collection is
//! iterated or handed to a terminal operation.
//!
//! # Operations
//!
//! | Kind | Operations |
//! |------|------------|
//! | Filtering | `filter`, `filter_keys`, `filter_with_key`, `reject`, `forget` and their `*_truthy` forms |
//! | Mapping | `map`, `map_keys`, `map_with_key`, `keys`, `values`, `flip`, `associate` |
//! | Shaping | `slice`, `take`, `drop`, `limit`, `chunk`, `cycle`, `append`, `partition` |
//! | Sets | `diff`, `diff_key`, `intersect`, `intersect_key` |
//! | Effects | `tap`, `tap_all`, `reductions` |
//! | Terminal | `all`, `all_with_keys`, `pairs`, `count`, `any`, `every`, `first`, `get`, `has`, `reduce` |
//!
//! # Re-iteration
//!
//! Iterating a collection twice re-runs the whole chain from its source. For
//! restartable sources (fixed pairs, producer functions) both passes agree.
//! A single-pass cursor is never replayed, so a second pass over it only
//! sees what the first one left behind.
//!
//! # Examples
//!
//! ```rust
//! use lazy_collection::Collection;
//!
//! let squares_of_evens = Collection::list(1..=10)
//!     .filter(|value| value % 2 == 0)
//!     .map(|value| value * value)
//!     .take(3);
//!
//! assert_eq!(squares_of_evens.all().unwrap(), vec![4, 16, 36]);
//! ```

mod set;
mod shaping;
mod terminal;
mod transform;

pub use transform::TapCallback;

use std::fmt;
use std::iter;
use std::rc::Rc;

use crate::error::CollectionError;
use crate::iterator::{Cursor, Producer, Step};
use crate::source::Source;

/// An immutable, lazily evaluated sequence of key-value pairs.
///
/// Cloning a collection is cheap and shares the underlying pipeline.
pub struct Collection<K, V> {
    produce: Producer<K, V>,
}

static_assertions::assert_not_impl_any!(Collection<i32, i32>: Send, Sync);

impl<K: 'static, V: 'static> Collection<K, V> {
    /// Creates a collection from a transform closure that opens a cursor.
    ///
    /// The closure is not called until the collection is iterated, and it is
    /// called again on every iteration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::Collection;
    ///
    /// let collection = Collection::new(|| Box::new((0..2).map(|index| Ok((index, index * 10)))));
    /// assert_eq!(collection.all().unwrap(), vec![0, 10]);
    /// ```
    pub fn new<F>(produce: F) -> Self
    where
        F: Fn() -> Cursor<K, V> + 'static,
    {
        Self {
            produce: Rc::new(produce),
        }
    }

    /// Wraps a [`Source`]: fixed pairs, a single-pass cursor or a producer
    /// function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::{Collection, Source};
    ///
    /// let fixed = Collection::wrap([("a", 1), ("b", 2)]);
    /// let produced = Collection::wrap(Source::producer(|| vec![("a", 1), ("b", 2)]));
    ///
    /// assert_eq!(fixed.pairs().unwrap(), produced.pairs().unwrap());
    /// ```
    pub fn wrap(source: impl Into<Source<K, V>>) -> Self {
        Self {
            produce: source.into().into_producer(),
        }
    }

    /// Shorthand for wrapping a producer function.
    pub fn from_fn<F, I>(producer: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: 'static,
    {
        Self::wrap(Source::producer(producer))
    }

    /// Starts a fresh pass over the pipeline.
    pub fn iter(&self) -> Pairs<K, V> {
        Pairs {
            cursor: self.cursor(),
        }
    }

    pub(crate) fn cursor(&self) -> Cursor<K, V> {
        (self.produce)()
    }

    pub(crate) fn producer(&self) -> Producer<K, V> {
        Rc::clone(&self.produce)
    }

    /// Builds the next stage: `step` receives the upstream cursor each time
    /// the new collection is iterated.
    pub(crate) fn derive<K2, V2, F>(&self, step: F) -> Collection<K2, V2>
    where
        K2: 'static,
        V2: 'static,
        F: Fn(Cursor<K, V>) -> Cursor<K2, V2> + 'static,
    {
        let upstream = self.clone();
        Collection::new(move || step(upstream.cursor()))
    }

    /// A collection whose only item is `error`.
    pub(crate) fn failing(error: CollectionError) -> Self {
        Self::new(move || Box::new(iter::once(Err(error.clone()))))
    }
}

impl<V: Clone + 'static> Collection<usize, V> {
    /// Wraps a list of values, keyed `0, 1, 2, ...`.
    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        Self::wrap(Source::list(values))
    }
}

impl<K, V> Clone for Collection<K, V> {
    fn clone(&self) -> Self {
        Self {
            produce: Rc::clone(&self.produce),
        }
    }
}

impl<K, V> fmt::Debug for Collection<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Collection").finish_non_exhaustive()
    }
}

impl<K: Clone + 'static, V: Clone + 'static> FromIterator<(K, V)> for Collection<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::wrap(Source::pairs(iter))
    }
}

impl<K: 'static, V: 'static> IntoIterator for Collection<K, V> {
    type Item = Step<K, V>;
    type IntoIter = Pairs<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: 'static, V: 'static> IntoIterator for &Collection<K, V> {
    type Item = Step<K, V>;
    type IntoIter = Pairs<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over a [`Collection`], yielding pairs or the error that aborted
/// the pass.
pub struct Pairs<K, V> {
    cursor: Cursor<K, V>,
}

impl<K, V> Iterator for Pairs<K, V> {
    type Item = Step<K, V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cursor.size_hint()
    }
}

impl<K, V> fmt::Debug for Pairs<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Pairs").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    #[rstest]
    fn test_construction_does_not_run_the_producer() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let collection = Collection::from_fn(move || {
            counter.set(counter.get() + 1);
            vec![(0, 'a')]
        });

        assert_eq!(calls.get(), 0);
        let _ = collection.iter();
        assert_eq!(calls.get(), 1);
    }

    #[rstest]
    fn test_clones_share_the_pipeline() {
        let collection = Collection::list([1, 2, 3]);
        let copy = collection.clone();

        assert_eq!(collection.all().unwrap(), copy.all().unwrap());
    }

    #[rstest]
    fn test_failing_yields_its_error_once() {
        let collection = Collection::<usize, i32>::failing(CollectionError::AssociateTooFewValues);
        let steps: Vec<_> = collection.iter().collect();

        assert_eq!(steps, vec![Err(CollectionError::AssociateTooFewValues)]);
    }

    #[rstest]
    fn test_iterates_by_reference_and_by_value() {
        let collection: Collection<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();

        let mut seen = Vec::new();
        for step in &collection {
            seen.push(step.unwrap());
        }
        let owned: Vec<_> = collection.into_iter().map(Result::unwrap).collect();

        assert_eq!(seen, vec![("a", 1), ("b", 2)]);
        assert_eq!(owned, seen);
    }
}
