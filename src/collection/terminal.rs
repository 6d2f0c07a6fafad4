//! Terminal operations: these pull from the pipeline and return plain values.
//!
//! Every terminal operation stops at the first error the pipeline yields and
//! returns it. The lookups (`any`, `every`, `first*`, `get*`, `has`) stop
//! pulling as soon as the answer is known.

use super::Collection;
use crate::error::Result;
use crate::value::{KeyedArray, StructuralKey};

impl<K: 'static, V: 'static> Collection<K, V> {
    /// Materializes the values in order, dropping keys.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by the pipeline.
    pub fn all(&self) -> Result<Vec<V>> {
        self.iter().map(|step| step.map(|(_, value)| value)).collect()
    }

    /// Materializes the pairs in order, keeping duplicate keys.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by the pipeline.
    pub fn pairs(&self) -> Result<Vec<(K, V)>> {
        self.iter().collect()
    }

    /// Materializes into a [`KeyedArray`], where a later duplicate key
    /// overwrites the earlier value in place.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by the pipeline, or
    /// [`CollectionError::IllegalKey`](crate::CollectionError::IllegalKey)
    /// for the first key that has no structural form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::{Collection, keyed};
    ///
    /// let collection = Collection::wrap([("a", 1), ("a", 2), ("b", 3)]);
    /// assert_eq!(collection.all_with_keys().unwrap(), keyed! { "a" => 2, "b" => 3 });
    ///
    /// let lists = Collection::wrap([(vec![1], "x")]);
    /// assert!(lists.all_with_keys().is_err());
    /// ```
    pub fn all_with_keys(&self) -> Result<KeyedArray<V>>
    where
        K: StructuralKey,
    {
        let mut keyed = KeyedArray::new();
        for step in self {
            let (key, value) = step?;
            keyed.insert(key.to_array_key()?, value);
        }
        Ok(keyed)
    }

    /// Counts the pairs by draining one full pass.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by the pipeline.
    pub fn count(&self) -> Result<usize> {
        self.iter().try_fold(0, |count, step| step.map(|_| count + 1))
    }

    /// Returns `true` as soon as one pair satisfies `predicate(value, key)`.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded before a match.
    pub fn any<P>(&self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&V, &K) -> bool,
    {
        for step in self {
            let (key, value) = step?;
            if predicate(&value, &key) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Returns `false` as soon as one pair fails `predicate(value, key)`.
    ///
    /// An empty collection satisfies every predicate.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded before a failing pair.
    pub fn every<P>(&self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&V, &K) -> bool,
    {
        self.any(|value, key| !predicate(value, key)).map(|found| !found)
    }

    /// The first pair satisfying `predicate(value, key)`.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded before a match.
    pub fn first_pair<P>(&self, mut predicate: P) -> Result<Option<(K, V)>>
    where
        P: FnMut(&V, &K) -> bool,
    {
        for step in self {
            let (key, value) = step?;
            if predicate(&value, &key) {
                return Ok(Some((key, value)));
            }
        }
        Ok(None)
    }

    /// The value of the first pair satisfying `predicate(value, key)`.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded before a match.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::Collection;
    ///
    /// let collection = Collection::wrap([("a", 1), ("b", 2), ("c", 3)]);
    ///
    /// assert_eq!(collection.first(|value, _| value % 2 == 1).unwrap(), Some(1));
    /// assert_eq!(collection.first(|_, key| *key == "c").unwrap(), Some(3));
    /// assert_eq!(collection.first_or(|value, _| *value > 3, 0).unwrap(), 0);
    /// ```
    pub fn first<P>(&self, predicate: P) -> Result<Option<V>>
    where
        P: FnMut(&V, &K) -> bool,
    {
        Ok(self.first_pair(predicate)?.map(|(_, value)| value))
    }

    /// Like [`first`](Self::first), falling back to `default` when nothing
    /// matches.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded before a match.
    pub fn first_or<P>(&self, predicate: P, default: V) -> Result<V>
    where
        P: FnMut(&V, &K) -> bool,
    {
        Ok(self.first(predicate)?.unwrap_or(default))
    }

    /// The value of the first pair whose key equals `key`.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded before the key is found.
    pub fn get(&self, key: &K) -> Result<Option<V>>
    where
        K: PartialEq,
    {
        self.first(|_, candidate| candidate == key)
    }

    /// Like [`get`](Self::get), falling back to `default` when the key is
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded before the key is found.
    pub fn get_or(&self, key: &K, default: V) -> Result<V>
    where
        K: PartialEq,
    {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Returns `true` if some pair has a key equal to `key`.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded before the key is found.
    pub fn has(&self, key: &K) -> Result<bool>
    where
        K: PartialEq,
    {
        self.any(|_, candidate| candidate == key)
    }

    /// Folds every pair with `reducer(accumulator, value, key)`.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by the pipeline.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::Collection;
    ///
    /// let total = Collection::list([1, 2, 3]).reduce(|sum, value, _| sum + value, 0).unwrap();
    /// assert_eq!(total, 6);
    /// ```
    pub fn reduce<A, F>(&self, mut reducer: F, initial: A) -> Result<A>
    where
        F: FnMut(A, V, K) -> A,
    {
        self.iter()
            .try_fold(initial, |accumulator, step| {
                step.map(|(key, value)| reducer(accumulator, value, key))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArrayKey, CollectionError, Source, keyed};
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::cell::Cell;
    use std::rc::Rc;

    fn counted(pulls: &Rc<Cell<usize>>) -> Collection<usize, i32> {
        let counter = Rc::clone(pulls);
        Collection::from_fn(move || {
            let counter = Rc::clone(&counter);
            (1..=5).enumerate().inspect(move |_| counter.set(counter.get() + 1))
        })
    }

    #[rstest]
    #[cfg(feature = "json")]
    fn test_all_with_keys_follows_array_key_rules() {
        let collection = Collection::wrap([
            (json!("a"), 1),
            (json!(2), 2),
            (json!("3"), 3),
            (Value::Null, 4),
            (json!(true), 5),
            (json!(false), 6),
        ]);

        assert_eq!(collection.all().unwrap(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(
            collection.all_with_keys().unwrap(),
            keyed! { "a" => 1, 2 => 2, 3 => 3, "" => 4, 1 => 5, 0 => 6 }
        );
    }

    #[rstest]
    #[cfg(feature = "json")]
    fn test_all_with_keys_rejects_composite_keys() {
        let collection = Collection::wrap([(json!({"id": 1}), 5)]);
        assert!(matches!(
            collection.all_with_keys(),
            Err(CollectionError::IllegalKey { .. })
        ));
    }

    #[rstest]
    fn test_all_with_keys_last_duplicate_wins() {
        let keyed = Collection::wrap([("a", 1), ("b", 9), ("a", 2)]).all_with_keys().unwrap();

        assert_eq!(keyed.keys().cloned().collect::<Vec<_>>(), vec![ArrayKey::from("a"), ArrayKey::from("b")]);
        assert_eq!(keyed.get("a"), Some(&2));
    }

    #[rstest]
    #[case(vec![], 0)]
    #[case(vec![1, 2], 2)]
    #[case(vec![1, 2, 3, 4, 5], 5)]
    fn test_count(#[case] values: Vec<i32>, #[case] expected: usize) {
        assert_eq!(Collection::list(values).count().unwrap(), expected);
    }

    #[rstest]
    fn test_any_short_circuits() {
        let pulls = Rc::new(Cell::new(0));
        let collection = counted(&pulls);

        assert!(collection.any(|value, _| *value == 2).unwrap());
        assert_eq!(pulls.get(), 2);
        assert!(!collection.any(|value, _| *value > 5).unwrap());
    }

    #[rstest]
    fn test_every() {
        let collection = Collection::list([2, 4, 6]);

        assert!(collection.every(|value, _| value % 2 == 0).unwrap());
        assert!(!collection.every(|_, key| *key < 2).unwrap());
        assert!(Collection::list(Vec::<i32>::new()).every(|_, _| false).unwrap());
    }

    #[rstest]
    fn test_first_stops_at_the_match() {
        let pulls = Rc::new(Cell::new(0));
        let collection = counted(&pulls);

        assert_eq!(collection.first_pair(|value, _| *value > 2).unwrap(), Some((2, 3)));
        assert_eq!(pulls.get(), 3);
        assert_eq!(collection.first(|_, _| false).unwrap(), None);
        assert_eq!(collection.first_or(|_, _| false, -1).unwrap(), -1);
    }

    #[rstest]
    fn test_get_and_has() {
        let collection = Collection::wrap([("a", 1), ("b", 2), ("a", 3)]);

        assert_eq!(collection.get(&"a").unwrap(), Some(1));
        assert_eq!(collection.get(&"z").unwrap(), None);
        assert_eq!(collection.get_or(&"z", 0).unwrap(), 0);
        assert!(collection.has(&"b").unwrap());
        assert!(!collection.has(&"z").unwrap());
    }

    #[rstest]
    fn test_reduce_receives_keys() {
        let collection = Collection::wrap([("apple", 3), ("fig", 1)]);
        let summary = collection
            .reduce(|text: String, value, key| format!("{text}{key}={value};"), String::new())
            .unwrap();

        assert_eq!(summary, "apple=3;fig=1;");
    }

    #[rstest]
    fn test_terminal_operations_return_pipeline_errors() {
        let collection = Collection::list([1, 2, 3]).associate(["a"]);

        assert_eq!(collection.count(), Err(CollectionError::AssociateTooFewValues));
        assert_eq!(collection.get(&3), Err(CollectionError::AssociateTooFewValues));
        assert_eq!(collection.get(&1), Ok(Some("a")));
    }

    #[rstest]
    fn test_second_pass_over_a_cursor_sees_nothing() {
        let collection = Collection::wrap(Source::cursor(vec![(0, 'a'), (1, 'b')].into_iter()));

        assert_eq!(collection.count().unwrap(), 2);
        assert_eq!(collection.count().unwrap(), 0);
    }
}
