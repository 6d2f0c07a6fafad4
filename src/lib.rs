//! # lazy-collection
//!
//! Lazy, composable key-value pipelines.
//!
//! ## Overview
//!
//! A [`Collection<K, V>`] is an immutable pipeline stage over a sequence of
//! `(key, value)` pairs. Every operation returns a new collection without
//! running anything; work happens only when a pass is pulled, either by
//! iterating or through a terminal operation such as [`Collection::all`].
//!
//! - **Sources**: fixed pairs, single-pass cursors and producer functions
//!   ([`Source`])
//! - **Cursors**: a restartable producer wrapper and a skip-then-take
//!   adapter ([`iterator`])
//! - **Operations**: filtering, mapping, slicing, chunking, cycling, set
//!   difference and intersection, folds and lookups ([`Collection`])
//! - **Keyed materialization**: array-key rules with last-wins duplicates
//!   ([`KeyedArray`], [`StructuralKey`])
//!
//! Errors found mid-pipeline (a bad chunk size, an `associate` length
//! mismatch) travel downstream as `Err` items and are returned by the
//! terminal operation that meets them.
//!
//! ## Feature Flags
//!
//! - `json` (default): [`Truthy`] and [`StructuralKey`] for
//!   `serde_json::Value`
//!
//! `serde_json` is linked with or without `json`, since [`index`] compares
//! values through their canonical JSON form.
//!
//! ## Example
//!
//! ```rust
//! use lazy_collection::prelude::*;
//!
//! let stock = Collection::wrap([("apples", 4), ("pears", 0), ("plums", 7)]);
//!
//! let in_stock = stock.filter_truthy();
//! assert_eq!(in_stock.all_with_keys().unwrap(), keyed! { "apples" => 4, "plums" => 7 });
//!
//! let total = stock.reduce(|sum, count, _| sum + count, 0).unwrap();
//! assert_eq!(total, 11);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use lazy_collection::prelude::*;
/// ```
pub mod prelude {
    pub use crate::collection::{Collection, TapCallback};
    pub use crate::error::{CollectionError, Result};
    pub use crate::keyed;
    pub use crate::source::Source;
    pub use crate::value::{ArrayKey, KeyedArray, StructuralKey, Truthy, is_truthy};
}

mod collection;
mod error;
pub mod index;
pub mod iterator;
mod source;
mod value;

pub use collection::{Collection, Pairs, TapCallback};
pub use error::{CollectionError, Result};
pub use source::Source;
pub use value::{ArrayKey, KeyedArray, StructuralKey, Truthy, is_truthy};
