//! Error types for collection pipelines.
//!
//! Collections are lazy, so most usage errors are only discovered while a
//! pipeline is being pulled. Such errors travel downstream as `Err` items of
//! the pair stream and surface from whichever terminal operation consumes it.
//!
//! # Examples
//!
//! ```rust
//! use lazy_collection::{Collection, CollectionError};
//!
//! let error = Collection::list([1, 2, 3])
//!     .associate(["a", "b"])
//!     .all()
//!     .unwrap_err();
//!
//! assert_eq!(error, CollectionError::AssociateTooFewValues);
//! assert_eq!(error.to_string(), "The number of values is lesser than the keys.");
//! ```

use thiserror::Error;

/// Errors raised while building or consuming a collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// `chunk` was asked for groups of zero pairs.
    #[error("chunk size must be at least 1, got {size}")]
    InvalidChunkSize {
        /// The rejected size.
        size: usize,
    },

    /// `associate` ran out of values before the upstream ran out of keys.
    #[error("The number of values is lesser than the keys.")]
    AssociateTooFewValues,

    /// `associate` still had values left after the upstream was exhausted.
    #[error("The number of values is greater than the keys.")]
    AssociateTooManyValues,

    /// `limit` received a negative count other than `-1`.
    #[error("limit count must be -1 or non-negative, got {count}")]
    InvalidLimit {
        /// The rejected count.
        count: isize,
    },

    /// A key cannot be used as the key of a keyed materialization.
    #[error("cannot use a value of type `{type_name}` as a structural key")]
    IllegalKey {
        /// Short name of the offending key's type.
        type_name: &'static str,
    },

    /// A value could not be reduced to a canonical string for hashing.
    #[error("value has no canonical form for hashing: {reason}")]
    Unnormalizable {
        /// Why serialization failed.
        reason: String,
    },
}

impl From<serde_json::Error> for CollectionError {
    fn from(error: serde_json::Error) -> Self {
        Self::Unnormalizable {
            reason: error.to_string(),
        }
    }
}

/// Result type used throughout the crate.
pub type Result<T, E = CollectionError> = std::result::Result<T, E>;
