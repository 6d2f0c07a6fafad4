//! Stages that change how many pairs flow and how they are grouped.

use super::Collection;
use crate::error::CollectionError;
use crate::iterator::{Bounded, Cursor, Rewindable, Step};

impl<K: 'static, V: 'static> Collection<K, V> {
    /// Skips `start` pairs, then yields up to `length` pairs, or the whole
    /// remainder when `length` is `None`.
    ///
    /// A `length` of `Some(0)` is not an empty window: it yields every pair,
    /// including the first `start`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::{Collection, keyed};
    ///
    /// let collection = Collection::wrap([("a", 1), ("b", 2), ("c", 3)]);
    ///
    /// assert_eq!(collection.slice(1, Some(1)).all_with_keys().unwrap(), keyed! { "b" => 2 });
    /// assert_eq!(collection.slice(1, Some(0)).all().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn slice(&self, start: usize, length: Option<usize>) -> Self {
        if length == Some(0) {
            return self.clone();
        }
        self.derive(move |cursor| Box::new(Bounded::new(cursor, start, length)))
    }

    /// The first `count` pairs.
    ///
    /// `take(0)` goes through [`slice`](Self::slice) and therefore yields
    /// everything.
    pub fn take(&self, count: usize) -> Self {
        self.slice(0, Some(count))
    }

    /// Everything after the first `count` pairs.
    pub fn drop(&self, count: usize) -> Self {
        self.slice(count, None)
    }

    /// Skips `offset` pairs, then yields at most `count` pairs.
    ///
    /// A `count` of `-1` means unbounded and `0` yields nothing. Any other
    /// negative count makes iteration fail with
    /// [`CollectionError::InvalidLimit`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::{Collection, CollectionError};
    ///
    /// let collection = Collection::list(["a", "b", "c", "d"]);
    ///
    /// assert_eq!(collection.limit(2, 1).all().unwrap(), vec!["b", "c"]);
    /// assert_eq!(collection.limit(-1, 3).all().unwrap(), vec!["d"]);
    /// assert_eq!(collection.limit(0, 0).count().unwrap(), 0);
    /// assert_eq!(collection.limit(-2, 0).all(), Err(CollectionError::InvalidLimit { count: -2 }));
    /// ```
    pub fn limit(&self, count: isize, offset: usize) -> Self {
        let count = match count {
            -1 => None,
            count => match usize::try_from(count) {
                Ok(count) => Some(count),
                Err(_) => return Self::failing(CollectionError::InvalidLimit { count }),
            },
        };
        self.derive(move |cursor| Box::new(Bounded::new(cursor, offset, count)))
    }

    /// Groups consecutive pairs into chunks of `size`, each chunk keeping
    /// the original keys. The last chunk may be shorter.
    ///
    /// A chunk is a list of pairs rather than a keyed map, so two pairs with
    /// the same key inside one chunk are both kept. Collect a chunk into a
    /// [`KeyedArray`](crate::KeyedArray) to collapse them last-wins.
    ///
    /// A `size` of zero makes iteration fail with
    /// [`CollectionError::InvalidChunkSize`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::Collection;
    ///
    /// let chunks = Collection::wrap([("a", 1), ("b", 2), ("c", 3)]).chunk(2);
    ///
    /// assert_eq!(
    ///     chunks.all().unwrap(),
    ///     vec![vec![("a", 1), ("b", 2)], vec![("c", 3)]]
    /// );
    /// ```
    pub fn chunk(&self, size: usize) -> Collection<usize, Vec<(K, V)>> {
        if size == 0 {
            return Collection::failing(CollectionError::InvalidChunkSize { size });
        }
        self.derive(move |cursor| {
            Box::new(Chunks {
                cursor,
                size,
                position: 0,
            })
        })
    }

    /// Repeats the whole upstream sequence forever.
    ///
    /// Every repetition re-runs the upstream chain from its source. An empty
    /// upstream yields nothing instead of spinning, and the first `Err` from
    /// upstream ends the repetition after it is passed on. Bound the result with
    /// [`limit`](Self::limit) or [`take`](Self::take) before materializing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::Collection;
    ///
    /// let letters = Collection::list(['a', 'b']).cycle().limit(5, 0);
    /// assert_eq!(letters.all().unwrap(), vec!['a', 'b', 'a', 'b', 'a']);
    /// ```
    pub fn cycle(&self) -> Self {
        let upstream = self.clone();
        Self::new(move || {
            Box::new(Cycle {
                rewindable: Rewindable::from_producer(upstream.producer()),
                yielded_this_pass: false,
                failed: false,
            })
        })
    }
}

struct Chunks<K, V> {
    cursor: Cursor<K, V>,
    size: usize,
    position: usize,
}

impl<K, V> Iterator for Chunks<K, V> {
    type Item = Step<usize, Vec<(K, V)>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chunk = Vec::with_capacity(self.size);
        while chunk.len() < self.size {
            match self.cursor.next() {
                Some(Ok(pair)) => chunk.push(pair),
                Some(Err(error)) => return Some(Err(error)),
                None => break,
            }
        }

        if chunk.is_empty() {
            return None;
        }
        let index = self.position;
        self.position += 1;
        Some(Ok((index, chunk)))
    }
}

struct Cycle<K, V> {
    rewindable: Rewindable<K, V>,
    yielded_this_pass: bool,
    failed: bool,
}

impl<K: 'static, V: 'static> Cycle<K, V> {
    fn emit(&mut self, step: Step<K, V>) -> Step<K, V> {
        self.yielded_this_pass = true;
        self.failed = step.is_err();
        step
    }
}

impl<K: 'static, V: 'static> Iterator for Cycle<K, V> {
    type Item = Step<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(step) = self.rewindable.next() {
            return Some(self.emit(step));
        }
        if !self.yielded_this_pass {
            return None;
        }

        tracing::trace!("cycle restarting upstream");
        self.yielded_this_pass = false;
        self.rewindable.reset();
        let step = self.rewindable.next()?;
        Some(self.emit(step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyed;
    use rstest::rstest;
    use std::cell::Cell;
    use std::rc::Rc;

    fn letters() -> Collection<&'static str, i32> {
        Collection::wrap([("a", 1), ("b", 2), ("c", 3), ("d", 4)])
    }

    #[rstest]
    #[case(0, None, vec![1, 2, 3, 4])]
    #[case(1, None, vec![2, 3, 4])]
    #[case(1, Some(2), vec![2, 3])]
    #[case(3, Some(5), vec![4])]
    #[case(9, None, vec![])]
    #[case(2, Some(0), vec![1, 2, 3, 4])]
    fn test_slice(#[case] start: usize, #[case] length: Option<usize>, #[case] expected: Vec<i32>) {
        assert_eq!(letters().slice(start, length).all().unwrap(), expected);
    }

    #[rstest]
    fn test_slice_keeps_keys() {
        assert_eq!(
            letters().slice(1, Some(2)).all_with_keys().unwrap(),
            keyed! { "b" => 2, "c" => 3 }
        );
    }

    #[rstest]
    fn test_take_and_drop() {
        assert_eq!(letters().take(2).all().unwrap(), vec![1, 2]);
        assert_eq!(letters().drop(3).pairs().unwrap(), vec![("d", 4)]);
    }

    #[rstest]
    #[case(2, 0, vec![1, 2])]
    #[case(-1, 1, vec![2, 3, 4])]
    #[case(0, 0, vec![])]
    #[case(10, 3, vec![4])]
    fn test_limit(#[case] count: isize, #[case] offset: usize, #[case] expected: Vec<i32>) {
        assert_eq!(letters().limit(count, offset).all().unwrap(), expected);
    }

    #[rstest]
    fn test_limit_rejects_negative_counts() {
        assert_eq!(
            letters().limit(-3, 0).count(),
            Err(CollectionError::InvalidLimit { count: -3 })
        );
    }

    #[rstest]
    fn test_limit_stops_pulling_once_satisfied() {
        let pulls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulls);
        let collection = Collection::from_fn(move || {
            let counter = Rc::clone(&counter);
            (0..).map(move |index| {
                counter.set(counter.get() + 1);
                (index, index)
            })
        });

        assert_eq!(collection.limit(3, 0).all().unwrap(), vec![0, 1, 2]);
        assert_eq!(pulls.get(), 3);
    }

    #[rstest]
    fn test_chunk_keeps_keys_and_short_tail() {
        let chunks = Collection::wrap([("a", 1), ("b", 2), ("c", 3)]).chunk(2).all().unwrap();
        assert_eq!(chunks, vec![vec![("a", 1), ("b", 2)], vec![("c", 3)]]);
    }

    #[rstest]
    fn test_chunk_indices_are_fresh() {
        let chunks = Collection::list(1..=4).chunk(3);
        assert_eq!(chunks.keys().all().unwrap(), vec![0, 1]);
    }

    #[rstest]
    fn test_chunk_of_zero_fails() {
        assert_eq!(
            letters().chunk(0).all(),
            Err(CollectionError::InvalidChunkSize { size: 0 })
        );
    }

    #[rstest]
    fn test_cycle_repeats_upstream() {
        let collection = Collection::list([1]).cycle().limit(8, 0);
        assert_eq!(collection.count().unwrap(), 8);
        assert_eq!(
            Collection::list([1, 2, 3]).cycle().take(7).all().unwrap(),
            vec![1, 2, 3, 1, 2, 3, 1]
        );
    }

    #[rstest]
    fn test_cycle_of_empty_terminates() {
        let empty = Collection::list(Vec::<i32>::new()).cycle();
        assert_eq!(empty.count().unwrap(), 0);
    }

    #[rstest]
    fn test_cycle_stops_after_an_upstream_error() {
        let collection = letters().chunk(0).cycle().limit(2, 0);

        assert_eq!(collection.iter().count(), 1);
        assert_eq!(
            collection.all(),
            Err(CollectionError::InvalidChunkSize { size: 0 })
        );
    }

    #[rstest]
    fn test_cycle_stops_at_an_error_mid_pass() {
        let collection = Collection::list([1, 2])
            .associate(['x'])
            .cycle()
            .take(10);
        let steps: Vec<_> = collection.iter().collect();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], Ok((1, 'x')));
        assert!(steps[1].is_err());
    }

    #[rstest]
    fn test_cycle_reruns_the_chain_on_every_pass() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let collection = Collection::from_fn(move || {
            counter.set(counter.get() + 1);
            vec![(0, 'x'), (1, 'y')]
        })
        .cycle()
        .limit(5, 0);

        assert_eq!(collection.all().unwrap(), vec!['x', 'y', 'x', 'y', 'x']);
        assert_eq!(calls.get(), 3);
    }
}
