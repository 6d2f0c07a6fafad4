//! Element-wise stages: filtering, mapping, re-keying and side effects.

use std::rc::Rc;

use super::Collection;
use crate::error::CollectionError;
use crate::iterator::{Cursor, Step};
use crate::value::Truthy;

/// A callback run by [`Collection::tap_all`] for every pair, with
/// `(value, key)`.
pub type TapCallback<K, V> = Box<dyn Fn(&V, &K)>;

impl<K: 'static, V: 'static> Collection<K, V> {
    /// Keeps pairs for which `keep(key, value)` holds. Errors always pass.
    fn retain<P>(&self, keep: P) -> Self
    where
        P: Fn(&K, &V) -> bool + 'static,
    {
        let keep = Rc::new(keep);
        self.derive(move |cursor| {
            let keep = Rc::clone(&keep);
            Box::new(cursor.filter(move |step| match step {
                Ok((key, value)) => keep(key, value),
                Err(_) => true,
            }))
        })
    }

    fn map_pairs<K2, V2, F>(&self, transform: F) -> Collection<K2, V2>
    where
        K2: 'static,
        V2: 'static,
        F: Fn(K, V) -> (K2, V2) + 'static,
    {
        let transform = Rc::new(transform);
        self.derive(move |cursor| {
            let transform = Rc::clone(&transform);
            Box::new(cursor.map(move |step| step.map(|(key, value)| transform(key, value))))
        })
    }

    /// Replaces keys with `0, 1, 2, ...` and values with `pick(key, value)`.
    fn reindex<T, F>(&self, pick: F) -> Collection<usize, T>
    where
        T: 'static,
        F: Fn(K, V) -> T + 'static,
    {
        let pick = Rc::new(pick);
        self.derive(move |cursor| {
            let pick = Rc::clone(&pick);
            let mut position = 0;
            Box::new(cursor.map(move |step| {
                step.map(|(key, value)| {
                    let index = position;
                    position += 1;
                    (index, pick(key, value))
                })
            }))
        })
    }

    /// Keeps pairs whose value satisfies `predicate`. Keys are preserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::{Collection, keyed};
    ///
    /// let collection = Collection::list([0, 1, 2, 3, 4]).filter(|item| *item > 2);
    ///
    /// assert_eq!(collection.all().unwrap(), vec![3, 4]);
    /// assert_eq!(collection.all_with_keys().unwrap(), keyed! { 3 => 3, 4 => 4 });
    /// ```
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&V) -> bool + 'static,
    {
        self.retain(move |_, value| predicate(value))
    }

    /// Keeps pairs whose value is truthy.
    pub fn filter_truthy(&self) -> Self
    where
        V: Truthy,
    {
        self.retain(|_, value| value.is_truthy())
    }

    /// Keeps pairs whose key satisfies `predicate`.
    pub fn filter_keys<P>(&self, predicate: P) -> Self
    where
        P: Fn(&K) -> bool + 'static,
    {
        self.retain(move |key, _| predicate(key))
    }

    /// Keeps pairs whose key is truthy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::Collection;
    ///
    /// assert_eq!(Collection::list([1, 2]).filter_keys_truthy().all().unwrap(), vec![2]);
    /// ```
    pub fn filter_keys_truthy(&self) -> Self
    where
        K: Truthy,
    {
        self.retain(|key, _| key.is_truthy())
    }

    /// Keeps pairs for which `predicate(value, key)` holds.
    pub fn filter_with_key<P>(&self, predicate: P) -> Self
    where
        P: Fn(&V, &K) -> bool + 'static,
    {
        self.retain(move |key, value| predicate(value, key))
    }

    /// Keeps pairs whose key and value are both truthy.
    pub fn filter_with_key_truthy(&self) -> Self
    where
        K: Truthy,
        V: Truthy,
    {
        self.retain(|key, value| value.is_truthy() && key.is_truthy())
    }

    /// Drops pairs for which `predicate(value, key)` holds.
    pub fn reject<P>(&self, predicate: P) -> Self
    where
        P: Fn(&V, &K) -> bool + 'static,
    {
        self.retain(move |key, value| !predicate(value, key))
    }

    /// Drops pairs whose key and value are both truthy; the complement of
    /// [`filter_with_key_truthy`](Self::filter_with_key_truthy).
    pub fn reject_truthy(&self) -> Self
    where
        K: Truthy,
        V: Truthy,
    {
        self.retain(|key, value| !(value.is_truthy() && key.is_truthy()))
    }

    /// Drops pairs whose key equals one of `keys`.
    pub fn forget<I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: PartialEq,
    {
        let keys: Rc<[K]> = keys.into_iter().collect();
        self.retain(move |key, _| !keys.contains(key))
    }

    /// Transforms every value. Keys are untouched.
    pub fn map<U, F>(&self, transform: F) -> Collection<K, U>
    where
        U: 'static,
        F: Fn(V) -> U + 'static,
    {
        self.map_pairs(move |key, value| (key, transform(value)))
    }

    /// Transforms every key. Values are untouched and the new keys need not
    /// be unique.
    pub fn map_keys<K2, F>(&self, transform: F) -> Collection<K2, V>
    where
        K2: 'static,
        F: Fn(K) -> K2 + 'static,
    {
        self.map_pairs(move |key, value| (transform(key), value))
    }

    /// Transforms every value using `transform(value, key)`. Keys are untouched.
    pub fn map_with_key<U, F>(&self, transform: F) -> Collection<K, U>
    where
        U: 'static,
        F: Fn(V, &K) -> U + 'static,
    {
        self.map_pairs(move |key, value| {
            let value = transform(value, &key);
            (key, value)
        })
    }

    /// The keys, as values under fresh indices `0, 1, 2, ...`.
    pub fn keys(&self) -> Collection<usize, K> {
        self.reindex(|key, _| key)
    }

    /// The values under fresh indices `0, 1, 2, ...`.
    pub fn values(&self) -> Collection<usize, V> {
        self.reindex(|_, value| value)
    }

    /// Swaps every key with its value.
    ///
    /// Duplicate new keys are carried through; a keyed materialization keeps
    /// the last one.
    pub fn flip(&self) -> Collection<V, K> {
        self.map_pairs(|key, value| (value, key))
    }

    /// Calls `callback(value, key)` for every pair as it passes through.
    pub fn tap<F>(&self, callback: F) -> Self
    where
        F: Fn(&V, &K) + 'static,
    {
        self.tap_all([Box::new(callback) as TapCallback<K, V>])
    }

    /// Calls every callback, in order, for each pair as it passes through.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    /// use lazy_collection::{Collection, TapCallback};
    ///
    /// let log = Rc::new(RefCell::new(Vec::new()));
    /// let (first, second) = (Rc::clone(&log), Rc::clone(&log));
    ///
    /// Collection::wrap([("a", 1)])
    ///     .tap_all([
    ///         Box::new(move |value: &i32, _: &&str| first.borrow_mut().push(*value)) as TapCallback<_, _>,
    ///         Box::new(move |value: &i32, _: &&str| second.borrow_mut().push(value * 10)),
    ///     ])
    ///     .count()
    ///     .unwrap();
    ///
    /// assert_eq!(*log.borrow(), vec![1, 10]);
    /// ```
    pub fn tap_all<I>(&self, callbacks: I) -> Self
    where
        I: IntoIterator<Item = TapCallback<K, V>>,
    {
        let callbacks: Rc<[TapCallback<K, V>]> = callbacks.into_iter().collect();
        self.derive(move |cursor| {
            let callbacks = Rc::clone(&callbacks);
            Box::new(cursor.inspect(move |step| {
                if let Ok((key, value)) = step {
                    for callback in callbacks.iter() {
                        callback(value, key);
                    }
                }
            }))
        })
    }

    /// Every intermediate accumulator of folding with
    /// `reducer(accumulator, value, key)`, under fresh indices.
    ///
    /// The initial accumulator itself is not emitted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::Collection;
    ///
    /// let running = Collection::list([1, 2, 3]).reductions(|total, value, _| total + value, 0);
    /// assert_eq!(running.all().unwrap(), vec![1, 3, 6]);
    /// ```
    pub fn reductions<A, F>(&self, reducer: F, initial: A) -> Collection<usize, A>
    where
        A: Clone + 'static,
        F: Fn(A, V, K) -> A + 'static,
    {
        let reducer = Rc::new(reducer);
        self.derive(move |cursor| {
            let reducer = Rc::clone(&reducer);
            let mut accumulator = initial.clone();
            let mut position = 0;
            Box::new(cursor.map(move |step| {
                step.map(|(key, value)| {
                    let next = reducer(accumulator.clone(), value, key);
                    accumulator.clone_from(&next);
                    let index = position;
                    position += 1;
                    (index, next)
                })
            }))
        })
    }

    /// Appends `items` after the upstream pairs, keyed `0, 1, 2, ...`.
    ///
    /// The indices restart from zero whatever the upstream keys were, so
    /// keyed materialization lets an appended item overwrite an upstream
    /// pair with the same key.
    pub fn append<I>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        K: From<usize>,
        V: Clone,
    {
        let items: Rc<[V]> = items.into_iter().collect();
        self.derive(move |cursor| {
            let items = Rc::clone(&items);
            let appended = (0..items.len()).map(move |index| Ok((K::from(index), items[index].clone())));
            Box::new(cursor.chain(appended))
        })
    }

    /// Pairs the upstream values, as keys, with `values` in order.
    ///
    /// The lengths are compared while iterating: running out of values first
    /// yields [`CollectionError::AssociateTooFewValues`], leftover values
    /// yield [`CollectionError::AssociateTooManyValues`].
    pub fn associate<U, I>(&self, values: I) -> Collection<V, U>
    where
        U: Clone + 'static,
        I: IntoIterator<Item = U>,
    {
        let values: Rc<[U]> = values.into_iter().collect();
        self.derive(move |cursor| {
            Box::new(Associate {
                keys: cursor,
                values: Rc::clone(&values),
                position: 0,
                finished: false,
            })
        })
    }

    /// Splits the collection into the pairs satisfying
    /// `predicate(value, key)` and the pairs that do not.
    ///
    /// Both branches stay lazy and keep their original keys and order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazy_collection::Collection;
    ///
    /// let halves = Collection::list([1, 2, 3, 4]).partition(|value, _| value % 2 == 0).all().unwrap();
    ///
    /// assert_eq!(halves[0].all().unwrap(), vec![2, 4]);
    /// assert_eq!(halves[1].all().unwrap(), vec![1, 3]);
    /// ```
    pub fn partition<P>(&self, predicate: P) -> Collection<usize, Self>
    where
        P: Fn(&V, &K) -> bool + 'static,
    {
        let predicate = Rc::new(predicate);
        let accepted = {
            let predicate = Rc::clone(&predicate);
            self.retain(move |key, value| predicate(value, key))
        };
        let rejected = self.retain(move |key, value| !predicate(value, key));
        Collection::list([accepted, rejected])
    }
}

struct Associate<K, V, U> {
    keys: Cursor<K, V>,
    values: Rc<[U]>,
    position: usize,
    finished: bool,
}

impl<K, V, U: Clone> Iterator for Associate<K, V, U> {
    type Item = Step<V, U>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.keys.next() {
            Some(Ok((_, key))) => {
                if let Some(value) = self.values.get(self.position) {
                    self.position += 1;
                    Some(Ok((key, value.clone())))
                } else {
                    self.finished = true;
                    Some(Err(CollectionError::AssociateTooFewValues))
                }
            }
            Some(Err(error)) => Some(Err(error)),
            None => {
                self.finished = true;
                (self.position < self.values.len())
                    .then_some(Err(CollectionError::AssociateTooManyValues))
            }
        }
    }
}
