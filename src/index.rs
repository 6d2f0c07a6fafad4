//! Hash index over heterogeneous values, used by the set operations.
//!
//! `diff`, `diff_key`, `intersect` and `intersect_key` compare values that
//! need not share a type or implement `Hash`. Every value is first reduced to
//! a [`NormalizedKey`]: strings stand for themselves, anything else becomes
//! its canonical JSON text (object members sorted by name), so structurally
//! equal composites collide.
//!
//! Known limitation: non-finite floats serialize as JSON `null` and therefore
//! normalize to the same key as a null value.
//!
//! # Examples
//!
//! ```rust
//! use lazy_collection::index::{IndexMode, NormalizedKey, SetIndex};
//!
//! let index = SetIndex::build(IndexMode::Occurrence, [vec!["b", "c"], vec!["c"]]).unwrap();
//!
//! assert_eq!(index.count(&NormalizedKey::of("c").unwrap()), 2);
//! assert!(index.in_every_operand(&NormalizedKey::of("c").unwrap()));
//! assert!(!index.in_every_operand(&NormalizedKey::of("b").unwrap()));
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Canonical hashing form of an arbitrary value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormalizedKey {
    /// A string value, kept verbatim.
    String(String),
    /// Canonical JSON of a non-string value.
    Serialized(String),
}

impl NormalizedKey {
    /// Normalizes `value`.
    ///
    /// A string and its JSON-quoted spelling stay distinct, so `"1"` and `1`
    /// never collide.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Unnormalizable`](crate::CollectionError::Unnormalizable)
    /// when `value` cannot be serialized, for example a map with non-string
    /// keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use lazy_collection::index::NormalizedKey;
    ///
    /// assert_eq!(NormalizedKey::of("a").unwrap(), NormalizedKey::String("a".into()));
    /// assert_eq!(NormalizedKey::of(&[1, 2]).unwrap(), NormalizedKey::Serialized("[1,2]".into()));
    /// assert!(NormalizedKey::of(&HashMap::from([((1, 2), 3)])).is_err());
    /// ```
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::String(string) => Ok(Self::String(string)),
            other => Ok(Self::Serialized(canonicalize(other).to_string())),
        }
    }
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        Value::Object(entries) => {
            let mut entries: Vec<_> = entries.into_iter().collect();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(name, member)| (name, canonicalize(member)))
                    .collect::<Map<_, _>>(),
            )
        }
        scalar => scalar,
    }
}

/// What the index records per normalized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    /// Presence only: the value occurs in at least one operand.
    Presence,
    /// The number of distinct operands the value occurs in.
    Occurrence,
}

/// Lookup table from normalized values to their occurrence across operands.
#[derive(Debug, Clone)]
pub struct SetIndex {
    mode: IndexMode,
    counts: FxHashMap<NormalizedKey, usize>,
    operands: usize,
}

impl SetIndex {
    /// Builds the index in one pass over every operand.
    ///
    /// In [`IndexMode::Occurrence`] a value repeated inside one operand is
    /// still counted once for that operand.
    ///
    /// # Errors
    ///
    /// Fails on the first value that cannot be normalized.
    pub fn build<O, T>(mode: IndexMode, operands: O) -> Result<Self>
    where
        O: IntoIterator,
        O::Item: IntoIterator<Item = T>,
        T: Serialize,
    {
        let mut counts = FxHashMap::default();
        let mut operand_count = 0;

        for operand in operands {
            operand_count += 1;
            let mut seen = FxHashSet::default();
            for value in operand {
                let key = NormalizedKey::of(&value)?;
                match mode {
                    IndexMode::Presence => {
                        counts.insert(key, 1);
                    }
                    IndexMode::Occurrence => {
                        if seen.insert(key.clone()) {
                            *counts.entry(key).or_insert(0) += 1;
                        }
                    }
                }
            }
        }

        tracing::debug!(
            ?mode,
            operands = operand_count,
            entries = counts.len(),
            "built set index"
        );

        Ok(Self {
            mode,
            counts,
            operands: operand_count,
        })
    }

    /// The mode the index was built with.
    pub const fn mode(&self) -> IndexMode {
        self.mode
    }

    /// Number of operands the index was built from.
    pub const fn operands(&self) -> usize {
        self.operands
    }

    /// Returns `true` if `key` occurs in any operand.
    pub fn contains(&self, key: &NormalizedKey) -> bool {
        self.counts.contains_key(key)
    }

    /// The recorded occurrence for `key`; `0` when absent.
    pub fn count(&self, key: &NormalizedKey) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Returns `true` if `key` occurs in every operand.
    ///
    /// Vacuously true for an index built from zero operands.
    pub fn in_every_operand(&self, key: &NormalizedKey) -> bool {
        match self.mode {
            IndexMode::Occurrence => self.count(key) == self.operands,
            IndexMode::Presence => self.operands == 0 || (self.operands == 1 && self.contains(key)),
        }
    }

    /// Number of distinct normalized values.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if no value was indexed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
