//! A cursor that can be restarted by re-invoking its producer.

use std::fmt;
use std::rc::Rc;

use super::{Cursor, Producer, Step};

/// Makes a producer function behave like a restartable cursor.
///
/// A `Rewindable` owns a factory and the cursor the factory most recently
/// returned. [`reset`](Self::reset) throws the live cursor away and calls the
/// factory again, so the sequence starts over from its first pair.
///
/// The factory is called once per reset. If it has side effects, those side
/// effects repeat on every reset; keeping the factory idempotent is the
/// caller's job.
///
/// # Examples
///
/// ```rust
/// use lazy_collection::iterator::Rewindable;
///
/// let mut rewindable = Rewindable::new(|| (0..3).map(|index| (index, index)));
///
/// assert!(rewindable.has_more());
/// assert_eq!(rewindable.current(), Some(Ok(&(0, 0))));
/// rewindable.advance();
/// rewindable.advance();
/// rewindable.advance();
/// assert!(!rewindable.has_more());
///
/// rewindable.reset();
/// assert_eq!(rewindable.current(), Some(Ok(&(0, 0))));
/// ```
pub struct Rewindable<K, V> {
    factory: Producer<K, V>,
    cursor: Cursor<K, V>,
    /// `None` means nothing has been pulled ahead of the consumer.
    peeked: Option<Option<Step<K, V>>>,
}

impl<K: 'static, V: 'static> Rewindable<K, V> {
    /// Creates a rewindable cursor over the pairs returned by `factory`.
    ///
    /// The factory is called immediately to open the first cursor.
    pub fn new<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: 'static,
    {
        Self::from_producer(Rc::new(move || {
            Box::new(factory().into_iter().map(Ok)) as Cursor<K, V>
        }))
    }

    /// Creates a rewindable cursor from a factory and the arguments it is
    /// invoked with on every (re)start.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::iterator::Rewindable;
    ///
    /// let mut rewindable = Rewindable::with_args(
    ///     |word: &String| word.chars().enumerate().collect::<Vec<_>>(),
    ///     "ab".to_string(),
    /// );
    ///
    /// assert_eq!(rewindable.next(), Some(Ok((0, 'a'))));
    /// assert_eq!(rewindable.next(), Some(Ok((1, 'b'))));
    /// rewindable.reset();
    /// assert_eq!(rewindable.next(), Some(Ok((0, 'a'))));
    /// ```
    pub fn with_args<A, F, I>(factory: F, args: A) -> Self
    where
        A: 'static,
        F: Fn(&A) -> I + 'static,
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: 'static,
    {
        Self::new(move || factory(&args))
    }

    pub(crate) fn from_producer(factory: Producer<K, V>) -> Self {
        let cursor = factory();
        Self {
            factory,
            cursor,
            peeked: None,
        }
    }

    /// Returns the pair at the current position, or `None` when exhausted.
    pub fn current(&mut self) -> Option<Result<&(K, V), &crate::CollectionError>> {
        let cursor = &mut self.cursor;
        self.peeked
            .get_or_insert_with(|| cursor.next())
            .as_ref()
            .map(Result::as_ref)
    }

    /// Moves past the current pair.
    ///
    /// Returns the error when the step moved past was an `Err`, so the
    /// caller still sees it.
    pub fn advance(&mut self) -> Option<crate::CollectionError> {
        let skipped = match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.cursor.next(),
        };
        skipped.and_then(Result::err)
    }

    /// Returns `true` while the cursor still has a current pair.
    pub fn has_more(&mut self) -> bool {
        self.current().is_some()
    }

    /// Drops the live cursor and opens a new one from the factory.
    pub fn reset(&mut self) {
        tracing::trace!("rewinding producer");
        self.peeked = None;
        // Release the live cursor before opening its replacement.
        self.cursor = Box::new(std::iter::empty());
        self.cursor = (self.factory)();
    }
}

impl<K, V> Iterator for Rewindable<K, V> {
    type Item = Step<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.cursor.next(),
        }
    }
}

impl<K, V> fmt::Debug for Rewindable<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Rewindable")
            .field("peeked", &self.peeked.is_some())
            .finish_non_exhaustive()
    }
}
