//! Set-like stages backed by a [`SetIndex`].
//!
//! Operands are copied when the stage is created. The index over them is
//! built at the first pull of every iteration, so an unused stage costs
//! nothing and every pass sees the same operands.

use std::rc::Rc;

use serde::Serialize;

use super::Collection;
use crate::error::Result;
use crate::index::{IndexMode, NormalizedKey, SetIndex};
use crate::iterator::{Cursor, Step};

type Normalizer<K, V> = dyn Fn(&K, &V) -> Result<NormalizedKey>;

impl<K: 'static, V: 'static> Collection<K, V> {
    /// Keeps pairs whose value occurs in none of `others`.
    ///
    /// With no operands every pair survives.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::Collection;
    ///
    /// let collection = Collection::list([1, 2, 3, 4, 5]).diff([vec![1, 2], vec![3]]);
    /// assert_eq!(collection.all().unwrap(), vec![4, 5]);
    /// ```
    pub fn diff<O, T>(&self, others: O) -> Self
    where
        O: IntoIterator,
        O::Item: IntoIterator<Item = T>,
        T: Serialize + 'static,
        V: Serialize,
    {
        self.retain_indexed(others, IndexMode::Presence, |_, value| NormalizedKey::of(value))
    }

    /// Keeps pairs whose key occurs as a value in none of `others`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::Collection;
    ///
    /// let collection = Collection::list([1, 2, 3, 4, 5]).diff_key([[1, 2, 3]]);
    /// assert_eq!(collection.all().unwrap(), vec![1, 5]);
    /// ```
    pub fn diff_key<O, T>(&self, others: O) -> Self
    where
        O: IntoIterator,
        O::Item: IntoIterator<Item = T>,
        T: Serialize + 'static,
        K: Serialize,
    {
        self.retain_indexed(others, IndexMode::Presence, |key, _| NormalizedKey::of(key))
    }

    /// Keeps pairs whose value occurs in every one of `others`.
    ///
    /// With no operands every pair survives.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::Collection;
    ///
    /// let collection = Collection::list(["a", "b", "c"]).intersect([vec!["b", "c"], vec!["c"]]);
    /// assert_eq!(collection.all().unwrap(), vec!["c"]);
    /// ```
    pub fn intersect<O, T>(&self, others: O) -> Self
    where
        O: IntoIterator,
        O::Item: IntoIterator<Item = T>,
        T: Serialize + 'static,
        V: Serialize,
    {
        self.retain_indexed(others, IndexMode::Occurrence, |_, value| NormalizedKey::of(value))
    }

    /// Keeps pairs whose key occurs as a value in every one of `others`.
    pub fn intersect_key<O, T>(&self, others: O) -> Self
    where
        O: IntoIterator,
        O::Item: IntoIterator<Item = T>,
        T: Serialize + 'static,
        K: Serialize,
    {
        self.retain_indexed(others, IndexMode::Occurrence, |key, _| NormalizedKey::of(key))
    }

    fn retain_indexed<O, T, N>(&self, others: O, mode: IndexMode, normalize: N) -> Self
    where
        O: IntoIterator,
        O::Item: IntoIterator<Item = T>,
        T: Serialize + 'static,
        N: Fn(&K, &V) -> Result<NormalizedKey> + 'static,
    {
        let operands: Rc<Vec<Vec<T>>> = Rc::new(
            others
                .into_iter()
                .map(|operand| operand.into_iter().collect())
                .collect(),
        );
        let normalize: Rc<Normalizer<K, V>> = Rc::new(normalize);

        self.derive(move |cursor| {
            Box::new(IndexedRetain {
                cursor,
                operands: Rc::clone(&operands),
                mode,
                normalize: Rc::clone(&normalize),
                index: None,
                failed: false,
            })
        })
    }
}

struct IndexedRetain<K, V, T> {
    cursor: Cursor<K, V>,
    operands: Rc<Vec<Vec<T>>>,
    mode: IndexMode,
    normalize: Rc<Normalizer<K, V>>,
    index: Option<SetIndex>,
    failed: bool,
}

impl<K, V, T: Serialize> Iterator for IndexedRetain<K, V, T> {
    type Item = Step<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        if self.index.is_none() {
            match SetIndex::build(self.mode, self.operands.iter()) {
                Ok(index) => self.index = Some(index),
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }
        let index = self.index.as_ref()?;

        loop {
            let (key, value) = match self.cursor.next()? {
                Ok(pair) => pair,
                Err(error) => return Some(Err(error)),
            };
            let normalized = match (self.normalize)(&key, &value) {
                Ok(normalized) => normalized,
                Err(error) => return Some(Err(error)),
            };
            let keep = match index.mode() {
                IndexMode::Presence => !index.contains(&normalized),
                IndexMode::Occurrence => index.in_every_operand(&normalized),
            };
            if keep {
                return Some(Ok((key, value)));
            }
        }
    }
}
