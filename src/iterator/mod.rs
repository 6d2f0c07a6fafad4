//! Low-level cursors the collection pipeline is assembled from.
//!
//! Every stage of a [`Collection`](crate::Collection) is a boxed iterator of
//! [`Step`]s. This module holds the shared aliases plus the two cursor
//! helpers that need their own state machines:
//!
//! - [`Rewindable`]: restarts a producer by calling it again
//! - [`Bounded`]: skip-then-take over a fallible stream, used by `limit` and
//!   `slice`
//!
//! # Examples
//!
//! ```rust
//! use lazy_collection::iterator::Rewindable;
//!
//! let mut rewindable = Rewindable::new(|| vec![(0, 'a'), (1, 'b')]);
//!
//! assert_eq!(rewindable.next(), Some(Ok((0, 'a'))));
//! rewindable.reset();
//! assert_eq!(rewindable.next(), Some(Ok((0, 'a'))));
//! ```

mod bounded;
mod rewindable;

pub use bounded::Bounded;
pub use rewindable::Rewindable;

use std::rc::Rc;

use crate::error::Result;

/// One pulled item: a key-value pair, or the error that aborted the pipeline.
pub type Step<K, V> = Result<(K, V)>;

/// A live, single-pass stream of pairs.
pub type Cursor<K, V> = Box<dyn Iterator<Item = Step<K, V>>>;

/// A shareable factory that opens a fresh [`Cursor`] on every call.
pub type Producer<K, V> = Rc<dyn Fn() -> Cursor<K, V>>;
