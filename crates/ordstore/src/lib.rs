//! Insertion-ordered associative store tuned for bulk copy and merge.
//!
//! [`OrderedStore`] keeps its entries in two parallel vectors (keys and
//! values, in order of first insertion) plus a `HashMap` from key to slot.
//! Copying or merging a store copies the vectors only: the result's index is
//! left absent and may even hold duplicate keys. The next keyed access
//! reconciles it in one pass, keeping each key at its first position with its
//! last value.
//!
//! # Key Types
//!
//! - [`OrderedStore`] -- the container
//! - [`StoreConfig`] -- initial capacity and the default value for misses
//! - [`Snapshot`] -- ordered, serializable copy of the entries
//! - [`PairSource`] -- anything a bulk merge can read pairs from
//! - [`StoreError`] -- missing keys on strict fetches, allocation failure
//!
//! # Design Rules
//!
//! 1. Position is fixed by a key's first write; overwrites never move it.
//! 2. `duplicate` and `merge` never build an index.
//! 3. Every keyed read, write, delete, or traversal reconciles first, so it
//!    takes `&mut self`.
//! 4. Only strict `fetch` reports missing keys as errors.
//! 5. Allocation failure while growing surfaces as
//!    [`StoreError::CapacityExhausted`] and leaves the store unchanged.

pub mod config;
pub mod error;
mod index;
pub mod iter;
pub mod snapshot;
pub mod source;
pub mod store;

pub use config::{StoreConfig, MIN_CAPACITY};
pub use error::{StoreError, StoreResult};
pub use iter::{IntoIter, Iter, IterMut};
pub use snapshot::Snapshot;
pub use source::PairSource;
pub use store::OrderedStore;
