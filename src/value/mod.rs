//! Value semantics shared by the collection operations.
//!
//! - [`Truthy`]: the default predicate of the `*_truthy` filters
//! - [`StructuralKey`], [`ArrayKey`], [`KeyedArray`]: keyed materialization

mod key;
mod truthy;

pub use key::{ArrayKey, KeyedArray, StructuralKey};
pub use truthy::{Truthy, is_truthy};
