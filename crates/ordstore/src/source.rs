//! Sources of key/value pairs accepted by bulk merges.

use std::collections::{BTreeMap, HashMap};

use crate::store::OrderedStore;

/// Anything that can hand its key/value pairs to a bulk merge.
///
/// Pairs are appended in whatever order the source visits them, so for
/// unordered maps the resulting positions follow that map's iteration order.
pub trait PairSource<K, V> {
    /// Number of pairs [`for_each_pair`](Self::for_each_pair) will visit.
    fn pair_count(&self) -> usize;

    /// Visit every pair in the source's own order.
    fn for_each_pair<F: FnMut(&K, &V)>(&self, visit: F);
}

/// Stores hand over their raw slots, unreconciled duplicates included. The
/// receiving side resolves them exactly as it resolves its own.
impl<K, V> PairSource<K, V> for OrderedStore<K, V> {
    fn pair_count(&self) -> usize {
        self.slot_count()
    }

    fn for_each_pair<F: FnMut(&K, &V)>(&self, mut visit: F) {
        let (keys, values) = self.raw_slots();
        for (key, value) in keys.iter().zip(values) {
            visit(key, value);
        }
    }
}

impl<K, V, S> PairSource<K, V> for HashMap<K, V, S> {
    fn pair_count(&self) -> usize {
        self.len()
    }

    fn for_each_pair<F: FnMut(&K, &V)>(&self, mut visit: F) {
        for (key, value) in self {
            visit(key, value);
        }
    }
}

impl<K, V> PairSource<K, V> for BTreeMap<K, V> {
    fn pair_count(&self) -> usize {
        self.len()
    }

    fn for_each_pair<F: FnMut(&K, &V)>(&self, mut visit: F) {
        for (key, value) in self {
            visit(key, value);
        }
    }
}

impl<K, V> PairSource<K, V> for [(K, V)] {
    fn pair_count(&self) -> usize {
        self.len()
    }

    fn for_each_pair<F: FnMut(&K, &V)>(&self, mut visit: F) {
        for (key, value) in self {
            visit(key, value);
        }
    }
}

impl<K, V> PairSource<K, V> for Vec<(K, V)> {
    fn pair_count(&self) -> usize {
        self.len()
    }

    fn for_each_pair<F: FnMut(&K, &V)>(&self, visit: F) {
        self.as_slice().for_each_pair(visit)
    }
}
