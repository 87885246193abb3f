//! The lazily rebuilt key → position index.
//!
//! Bulk copies and merges leave the index [`IndexState::Absent`] and may leave
//! duplicate keys in the slot sequences. The first index-dependent operation
//! afterwards calls [`IndexState::ensure`], which folds duplicates in a single
//! left-to-right pass and rebuilds the map.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::debug;

/// Reconciliation status of a store's lookup index.
#[derive(Clone, Debug)]
pub(crate) enum IndexState<K> {
    /// Slots may hold duplicate keys; rebuild before any key lookup.
    Absent,
    /// Every live key is unique and mapped to its slot.
    Present(HashMap<K, usize>),
}

impl<K> IndexState<K> {
    /// An empty, trivially reconciled index with room for `capacity` keys.
    pub(crate) fn empty(capacity: usize) -> Self {
        Self::Present(HashMap::with_capacity(capacity))
    }

    pub(crate) fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Forget every key but keep the map's allocation when there is one.
    pub(crate) fn reset(&mut self) {
        match self {
            Self::Present(map) => map.clear(),
            Self::Absent => *self = Self::Present(HashMap::new()),
        }
    }
}

impl<K: Hash + Eq + Clone> IndexState<K> {
    /// Return the index, rebuilding it from the slots first if it is absent.
    ///
    /// Rebuilding compacts `keys` and `values` in place: the first occurrence
    /// of a key keeps its slot, later occurrences donate their value to it and
    /// are dropped.
    pub(crate) fn ensure<V>(
        &mut self,
        keys: &mut Vec<K>,
        values: &mut Vec<V>,
    ) -> &mut HashMap<K, usize> {
        if let Self::Absent = self {
            *self = Self::Present(reconcile(keys, values));
        }
        match self {
            Self::Present(map) => map,
            Self::Absent => unreachable!("index rebuilt above"),
        }
    }
}

/// Fold duplicate keys and build a fresh index over the survivors.
///
/// After step `i`, slots `[0, cursor)` hold unique keys in first-occurrence
/// order and slots `[cursor, i]` are dead. Dead slots are only ever swapped
/// forward, so the final truncation discards exactly them.
fn reconcile<K: Hash + Eq + Clone, V>(
    keys: &mut Vec<K>,
    values: &mut Vec<V>,
) -> HashMap<K, usize> {
    debug_assert_eq!(keys.len(), values.len());
    let slots = keys.len();
    let mut map = HashMap::with_capacity(slots);
    let mut cursor = 0;

    for i in 0..slots {
        if let Some(&first) = map.get(&keys[i]) {
            // Later write wins the value, earlier write keeps the position.
            values.swap(first, i);
            continue;
        }
        if cursor != i {
            keys.swap(cursor, i);
            values.swap(cursor, i);
        }
        map.insert(keys[cursor].clone(), cursor);
        cursor += 1;
    }

    if cursor < slots {
        keys.truncate(cursor);
        values.truncate(cursor);
    }
    debug!(
        slots,
        unique = cursor,
        dropped = slots - cursor,
        "rebuilt lookup index"
    );
    map
}
