//! Serializable, ordered copies of a store's entries.
//!
//! A [`Snapshot`] is what reporting and instrumentation code consumes. It
//! serializes as a plain sequence of `[key, value]` pairs and renders as
//! `{key=>value, ...}` in insertion order.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::store::OrderedStore;

/// Owned `(key, value)` pairs in insertion order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot<K, V> {
    pairs: Vec<(K, V)>,
}

impl<K, V> Snapshot<K, V> {
    /// Borrow the pairs in insertion order.
    pub fn pairs(&self) -> &[(K, V)] {
        &self.pairs
    }

    /// Take ownership of the pairs.
    pub fn into_pairs(self) -> Vec<(K, V)> {
        self.pairs
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Rebuild a store by setting every pair in order.
    ///
    /// Pairs that repeat a key (possible in hand-written or deserialized
    /// snapshots) resolve like repeated `set` calls.
    pub fn into_store(self) -> StoreResult<OrderedStore<K, V>>
    where
        K: Hash + Eq + Clone,
    {
        OrderedStore::from_pairs(self.pairs)
    }
}

impl<K, V> From<Vec<(K, V)>> for Snapshot<K, V> {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self { pairs }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for Snapshot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key:?}=>{value:?}")?;
        }
        f.write_str("}")
    }
}
