//! Skip-then-take over a fallible stream.

use crate::error::Result;

/// Skips `offset` successful items, then yields at most `count` of them.
///
/// Unlike chaining [`Iterator::skip`] and [`Iterator::take`], errors are never
/// counted as items and never skipped: an `Err` pulled while skipping is
/// yielded immediately. Once the count is spent the inner iterator is not
/// pulled again, which is what makes bounding an infinite stream terminate.
///
/// # Examples
///
/// ```rust
/// use lazy_collection::iterator::Bounded;
///
/// let bounded = Bounded::new((1..).map(Ok::<_, lazy_collection::CollectionError>), 2, Some(3));
/// let values: Vec<_> = bounded.collect::<Result<_, _>>().unwrap();
///
/// assert_eq!(values, vec![3, 4, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct Bounded<I> {
    inner: I,
    skip: usize,
    remaining: Option<usize>,
}

impl<I> Bounded<I> {
    /// Wraps `inner`, skipping `offset` items and keeping `count` (`None` keeps all).
    pub const fn new(inner: I, offset: usize, count: Option<usize>) -> Self {
        Self {
            inner,
            skip: offset,
            remaining: count,
        }
    }
}

impl<I, T> Iterator for Bounded<I>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == Some(0) {
            return None;
        }

        while self.skip > 0 {
            match self.inner.next()? {
                Ok(_) => self.skip -= 1,
                Err(error) => return Some(Err(error)),
            }
        }

        let item = self.inner.next()?;
        if item.is_ok()
            && let Some(remaining) = self.remaining.as_mut()
        {
            *remaining -= 1;
        }
        Some(item)
    }
}
