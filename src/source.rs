//! Normalizes the inputs a collection can be built from.
//!
//! A [`Source`] is one of three shapes, all reduced to the same
//! [`Producer`]: a function that opens a fresh cursor of pairs.
//!
//! | Shape | Constructor | Restartable |
//! |-------|-------------|-------------|
//! | Fixed ordered pairs | [`Source::pairs`], [`Source::list`], `From` impls | yes |
//! | Single-pass cursor | [`Source::cursor`] | no |
//! | Producer function | [`Source::producer`] | yes |
//!
//! # Examples
//!
//! ```rust
//! use lazy_collection::{Collection, Source};
//!
//! let fixed = Collection::wrap(vec![("a", 1), ("b", 2)]);
//! assert_eq!(fixed.all().unwrap(), vec![1, 2]);
//! assert_eq!(fixed.all().unwrap(), vec![1, 2]);
//!
//! let once = Collection::wrap(Source::cursor(vec![("a", 1), ("b", 2)].into_iter()));
//! assert_eq!(once.all().unwrap(), vec![1, 2]);
//! assert!(once.all().unwrap().is_empty());
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Fuse;
use std::rc::Rc;

use crate::iterator::{Cursor, Producer, Step};

/// An input a [`Collection`](crate::Collection) can wrap.
pub struct Source<K, V> {
    produce: Producer<K, V>,
    restartable: bool,
}

impl<K: 'static, V: 'static> Source<K, V> {
    /// A fixed sequence of pairs, replayed from the start on every iteration.
    pub fn pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Clone,
        V: Clone,
    {
        let pairs: Rc<[(K, V)]> = pairs.into_iter().collect();
        Self {
            produce: Rc::new(move || {
                Box::new(FixedPairs {
                    pairs: Rc::clone(&pairs),
                    position: 0,
                }) as Cursor<K, V>
            }),
            restartable: true,
        }
    }

    /// A single-pass cursor.
    ///
    /// The cursor is never replayed: a second iteration continues from where
    /// the previous one stopped, which for a fully consumed cursor means an
    /// empty sequence. While one reader holds the cursor, any other reader
    /// sees an empty sequence instead of stealing pairs from it.
    pub fn cursor<I>(cursor: I) -> Self
    where
        I: Iterator<Item = (K, V)> + 'static,
    {
        let slot = Rc::new(RefCell::new(Some(cursor.fuse())));
        Self {
            produce: Rc::new(move || {
                Box::new(ClaimedCursor::claim(Rc::clone(&slot))) as Cursor<K, V>
            }),
            restartable: false,
        }
    }

    /// A producer function, called again for every iteration.
    pub fn producer<F, I>(producer: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: 'static,
    {
        Self {
            produce: Rc::new(move || Box::new(producer().into_iter().map(Ok)) as Cursor<K, V>),
            restartable: true,
        }
    }

    /// Returns `true` when iterating twice yields the same pairs twice.
    pub const fn is_restartable(&self) -> bool {
        self.restartable
    }

    pub(crate) fn into_producer(self) -> Producer<K, V> {
        self.produce
    }
}

impl<V: Clone + 'static> Source<usize, V> {
    /// A fixed list of values keyed `0, 1, 2, ...`.
    pub fn list<I>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
    {
        Self::pairs(values.into_iter().enumerate())
    }
}

impl<K: Clone + 'static, V: Clone + 'static> From<Vec<(K, V)>> for Source<K, V> {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::pairs(pairs)
    }
}

impl<K: Clone + 'static, V: Clone + 'static, const N: usize> From<[(K, V); N]> for Source<K, V> {
    fn from(pairs: [(K, V); N]) -> Self {
        Self::pairs(pairs)
    }
}

impl<K: Clone + 'static, V: Clone + 'static> From<BTreeMap<K, V>> for Source<K, V> {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::pairs(map)
    }
}

impl<K, V> fmt::Debug for Source<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Source")
            .field("restartable", &self.restartable)
            .finish_non_exhaustive()
    }
}

struct FixedPairs<K, V> {
    pairs: Rc<[(K, V)]>,
    position: usize,
}

impl<K: Clone, V: Clone> Iterator for FixedPairs<K, V> {
    type Item = Step<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.pairs.get(self.position)?.clone();
        self.position += 1;
        Some(Ok(pair))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.pairs.len() - self.position;
        (remaining, Some(remaining))
    }
}

type Slot<I> = Rc<RefCell<Option<Fuse<I>>>>;

/// Exclusive hold on a single-pass cursor; hands it back when dropped.
struct ClaimedCursor<I> {
    cursor: Option<Fuse<I>>,
    slot: Slot<I>,
}

impl<I: Iterator> ClaimedCursor<I> {
    fn claim(slot: Slot<I>) -> Self {
        let cursor = slot.borrow_mut().take();
        if cursor.is_some() {
            tracing::trace!("claimed single-pass cursor");
        } else {
            tracing::warn!("single-pass cursor is already being read; yielding nothing");
        }
        Self { cursor, slot }
    }
}

impl<K, V, I> Iterator for ClaimedCursor<I>
where
    I: Iterator<Item = (K, V)>,
{
    type Item = Step<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.as_mut()?.next().map(Ok)
    }
}

impl<I> Drop for ClaimedCursor<I> {
    fn drop(&mut self) {
        if let Some(cursor) = self.cursor.take() {
            tracing::trace!("handing single-pass cursor back");
            *self.slot.borrow_mut() = Some(cursor);
        }
    }
}
