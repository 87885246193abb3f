//! The [`OrderedStore`] container.
//!
//! Entries live in two parallel vectors, `keys` and `values`, in order of
//! first insertion. A `HashMap<K, usize>` maps each key to its slot. Bulk
//! operations ([`OrderedStore::duplicate`], [`OrderedStore::merge`]) copy the
//! vectors only and leave the map absent; it is rebuilt on the next keyed
//! access. Every operation that may trigger that rebuild takes `&mut self`.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::config::{StoreConfig, MIN_CAPACITY};
use crate::error::{StoreError, StoreResult};
use crate::index::IndexState;
use crate::iter::{IntoIter, Iter, IterMut};
use crate::snapshot::Snapshot;
use crate::source::PairSource;

/// Insertion-ordered map with a lazily reconciled lookup index.
pub struct OrderedStore<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
    index: IndexState<K>,
    default_value: Option<V>,
}

impl<K, V> OrderedStore<K, V> {
    /// Number of occupied slots. Before reconciliation this may count
    /// duplicate keys; use [`len`](Self::len) for the number of entries.
    pub fn slot_count(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Slots available before the next growth step.
    pub fn capacity(&self) -> usize {
        self.keys.capacity().min(self.values.capacity())
    }

    /// Returns `true` if the lookup index is built and the slots hold no
    /// duplicate keys.
    pub fn is_reconciled(&self) -> bool {
        self.index.is_present()
    }

    /// Value handed out for missing keys.
    pub fn default_value(&self) -> Option<&V> {
        self.default_value.as_ref()
    }

    /// Replace the value handed out for missing keys.
    pub fn set_default_value(&mut self, value: Option<V>) {
        self.default_value = value;
    }

    /// Drop every entry. Allocated capacity and the default value are kept.
    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.index.reset();
    }

    pub(crate) fn raw_slots(&self) -> (&[K], &[V]) {
        (&self.keys, &self.values)
    }
}

impl<K: Hash + Eq + Clone, V> OrderedStore<K, V> {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self {
            keys: Vec::with_capacity(MIN_CAPACITY),
            values: Vec::with_capacity(MIN_CAPACITY),
            index: IndexState::empty(MIN_CAPACITY),
            default_value: None,
        }
    }

    /// Create an empty store with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> StoreResult<Self> {
        Self::with_config(StoreConfig::default().with_initial_capacity(capacity))
    }

    /// Create an empty store from an explicit configuration.
    pub fn with_config(config: StoreConfig<V>) -> StoreResult<Self> {
        let mut keys = Vec::new();
        let mut values = Vec::new();
        reserve_slots(&mut keys, &mut values, config.initial_capacity)?;
        Ok(Self {
            keys,
            values,
            index: IndexState::empty(config.initial_capacity),
            default_value: config.default_value,
        })
    }

    /// Build a store by setting every pair in order.
    pub fn from_pairs<I>(pairs: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut store = Self::new();
        for (key, value) in pairs {
            store.set(key, value)?;
        }
        Ok(store)
    }

    /// Rebuild the lookup index now instead of on the next keyed access.
    pub fn reconcile(&mut self) {
        self.index.ensure(&mut self.keys, &mut self.values);
    }

    /// Number of distinct entries.
    pub fn len(&mut self) -> usize {
        self.reconcile();
        self.keys.len()
    }

    fn position<Q>(&mut self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .ensure(&mut self.keys, &mut self.values)
            .get(key)
            .copied()
    }

    // ---------------------------------------------------------------
    // Core access
    // ---------------------------------------------------------------

    /// Stored value for `key`, or the configured default.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.position(key) {
            Some(pos) => Some(&self.values[pos]),
            None => self.default_value.as_ref(),
        }
    }

    /// Mutable access to a stored value. Never falls back to the default.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = self.position(key)?;
        Some(&mut self.values[pos])
    }

    /// Returns `true` if `key` has an entry.
    pub fn has_key<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.position(key).is_some()
    }

    /// Scan live values for one equal to `value`.
    ///
    /// Reconciles first: a value shadowed by a later duplicate is not live.
    pub fn has_value(&mut self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.reconcile();
        self.values.iter().any(|v| v == value)
    }

    /// Write `value` under `key` and return the stored value.
    ///
    /// An existing key is overwritten in place and keeps its position; a new
    /// key is appended.
    pub fn set(&mut self, key: K, value: V) -> StoreResult<&V> {
        let index = self.index.ensure(&mut self.keys, &mut self.values);
        if let Some(&pos) = index.get(&key) {
            self.values[pos] = value;
            return Ok(&self.values[pos]);
        }

        let pos = self.keys.len();
        reserve_slots(&mut self.keys, &mut self.values, pos + 1)?;
        index.insert(key.clone(), pos);
        self.keys.push(key);
        self.values.push(value);
        Ok(&self.values[pos])
    }

    /// Alias of [`set`](Self::set).
    pub fn store(&mut self, key: K, value: V) -> StoreResult<&V> {
        self.set(key, value)
    }

    /// Write `value` under `key` and return the value it replaced.
    pub fn put(&mut self, key: K, value: V) -> StoreResult<Option<V>> {
        if let Some(slot) = self.get_mut(&key) {
            return Ok(Some(std::mem::replace(slot, value)));
        }
        self.set(key, value)?;
        Ok(None)
    }

    /// Stored value for `key`, failing with [`StoreError::KeyNotFound`].
    pub fn fetch<Q>(&mut self, key: &Q) -> StoreResult<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        match self.position(key) {
            Some(pos) => Ok(&self.values[pos]),
            None => Err(StoreError::key_not_found(key)),
        }
    }

    // ---------------------------------------------------------------
    // Removal
    // ---------------------------------------------------------------

    /// Remove `key` and return its value, or `None` if it was absent.
    ///
    /// Later entries shift left by one slot, so this is O(n) in the number of
    /// entries after `key`.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.index.ensure(&mut self.keys, &mut self.values);
        let pos = index.remove(key)?;
        self.keys.remove(pos);
        let value = self.values.remove(pos);
        for (offset, shifted) in self.keys[pos..].iter().enumerate() {
            if let Some(slot) = index.get_mut::<K>(shifted) {
                *slot = pos + offset;
            }
        }
        Some(value)
    }

    /// Remove `key` and return its value; a missing key yields `fallback(key)`.
    pub fn delete_or_else<Q, F>(&mut self, key: &Q, fallback: F) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&Q) -> V,
    {
        match self.remove(key) {
            Some(value) => value,
            None => fallback(key),
        }
    }

    // ---------------------------------------------------------------
    // Iteration
    // ---------------------------------------------------------------

    /// Iterate entries in insertion order.
    pub fn iter(&mut self) -> Iter<'_, K, V> {
        self.reconcile();
        Iter::new(&self.keys, &self.values)
    }

    /// Iterate entries in insertion order with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.reconcile();
        IterMut::new(&self.keys, &mut self.values)
    }

    /// Visit every `(key, value)` pair in insertion order.
    pub fn each<F: FnMut(&K, &V)>(&mut self, mut visit: F) {
        for (key, value) in self.iter() {
            visit(key, value);
        }
    }

    /// Alias of [`each`](Self::each).
    pub fn each_pair<F: FnMut(&K, &V)>(&mut self, visit: F) {
        self.each(visit)
    }

    /// Visit every key in insertion order.
    pub fn each_key<F: FnMut(&K)>(&mut self, mut visit: F) {
        self.reconcile();
        self.keys.iter().for_each(&mut visit);
    }

    /// Visit every value in insertion order.
    pub fn each_value<F: FnMut(&V)>(&mut self, mut visit: F) {
        self.reconcile();
        self.values.iter().for_each(&mut visit);
    }

    /// Collect `transform(key, value)` for every entry, in order.
    pub fn map<R, F: FnMut(&K, &V) -> R>(&mut self, mut transform: F) -> Vec<R> {
        self.iter().map(|(key, value)| transform(key, value)).collect()
    }
}

impl<K: Hash + Eq + Clone, V: Clone> OrderedStore<K, V> {
    // ---------------------------------------------------------------
    // Reads with fallbacks
    // ---------------------------------------------------------------

    /// Stored value for `key`; otherwise `fallback(key)` if given, otherwise
    /// `default` if given, otherwise [`StoreError::KeyNotFound`].
    pub fn fetch_with<Q, F>(
        &mut self,
        key: &Q,
        default: Option<V>,
        fallback: Option<F>,
    ) -> StoreResult<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
        F: FnOnce(&Q) -> V,
    {
        if let Some(pos) = self.position(key) {
            return Ok(self.values[pos].clone());
        }
        match (fallback, default) {
            (Some(fallback), _) => Ok(fallback(key)),
            (None, Some(default)) => Ok(default),
            (None, None) => Err(StoreError::key_not_found(key)),
        }
    }

    /// Stored value for `key`, or `default`.
    pub fn fetch_or<Q>(&mut self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.position(key) {
            Some(pos) => self.values[pos].clone(),
            None => default,
        }
    }

    /// Stored value for `key`, or `fallback(key)`.
    pub fn fetch_or_else<Q, F>(&mut self, key: &Q, fallback: F) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        F: FnOnce(&Q) -> V,
    {
        match self.position(key) {
            Some(pos) => self.values[pos].clone(),
            None => fallback(key),
        }
    }

    /// Remove `key` and return its value, or a copy of the configured default
    /// when the key is missing.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key).or_else(|| self.default_value.clone())
    }

    // ---------------------------------------------------------------
    // Bulk copy and merge
    // ---------------------------------------------------------------

    /// Copy the live slots into an independent store.
    ///
    /// Only the two vectors are copied; the copy rebuilds its own index on
    /// first keyed access.
    pub fn duplicate(&self) -> StoreResult<Self> {
        self.concat(&[] as &[(K, V)])
    }

    /// Concatenate this store's slots with `other`'s into a new store.
    ///
    /// Duplicate keys are not resolved here. On the first keyed access the
    /// result keeps each key at its first position with its last value,
    /// exactly as if every pair had been `set` in order.
    pub fn merge<S>(&self, other: &S) -> StoreResult<Self>
    where
        S: PairSource<K, V> + ?Sized,
    {
        self.concat(other)
    }

    fn concat<S>(&self, other: &S) -> StoreResult<Self>
    where
        S: PairSource<K, V> + ?Sized,
    {
        let left = self.keys.len();
        let right = other.pair_count();
        let mut keys = Vec::new();
        let mut values = Vec::new();
        reserve_slots(&mut keys, &mut values, left.saturating_add(right))?;
        keys.extend_from_slice(&self.keys);
        values.extend_from_slice(&self.values);
        other.for_each_pair(|key, value| {
            keys.push(key.clone());
            values.push(value.clone());
        });
        debug!(left, right, "bulk copy, index deferred");
        Ok(Self {
            keys,
            values,
            index: IndexState::Absent,
            default_value: self.default_value.clone(),
        })
    }

    /// Set every pair of `other` into this store, in `other`'s order.
    ///
    /// Unlike [`merge`](Self::merge) this keeps the index reconciled
    /// throughout. Capacity for all of `other` is reserved up front, so a
    /// failed merge leaves the store untouched.
    pub fn merge_into<S>(&mut self, other: &S) -> StoreResult<()>
    where
        S: PairSource<K, V> + ?Sized,
    {
        self.reconcile();
        let needed = self.keys.len().saturating_add(other.pair_count());
        reserve_slots(&mut self.keys, &mut self.values, needed)?;
        let mut outcome = Ok(());
        other.for_each_pair(|key, value| {
            if outcome.is_ok() {
                outcome = self.set(key.clone(), value.clone()).map(|_| ());
            }
        });
        outcome
    }

    // ---------------------------------------------------------------
    // Derived stores
    // ---------------------------------------------------------------

    /// New store holding the entries for which `predicate` is true.
    pub fn select<F>(&mut self, mut predicate: F) -> StoreResult<Self>
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.filtered(|key, value| predicate(key, value))
    }

    /// New store holding the entries for which `predicate` is false.
    pub fn reject<F>(&mut self, mut predicate: F) -> StoreResult<Self>
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.filtered(|key, value| !predicate(key, value))
    }

    fn filtered<F>(&mut self, mut keep: F) -> StoreResult<Self>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut result = Self::new();
        for (key, value) in self.iter() {
            if keep(key, value) {
                result.set(key.clone(), value.clone())?;
            }
        }
        Ok(result)
    }

    /// New store with keys and values swapped. When several keys share a
    /// value, the last of them wins, at the position of the first.
    pub fn invert(&mut self) -> StoreResult<OrderedStore<V, K>>
    where
        V: Hash + Eq,
    {
        let mut result = OrderedStore::with_capacity(self.len())?;
        for (key, value) in self.iter() {
            result.set(value.clone(), key.clone())?;
        }
        Ok(result)
    }

    // ---------------------------------------------------------------
    // Conversion
    // ---------------------------------------------------------------

    /// Copy of the keys in insertion order.
    pub fn keys(&mut self) -> Vec<K> {
        self.reconcile();
        self.keys.clone()
    }

    /// Copy of the values in insertion order.
    pub fn values(&mut self) -> Vec<V> {
        self.reconcile();
        self.values.clone()
    }

    /// Copy of every `(key, value)` pair in insertion order.
    pub fn to_pairs(&mut self) -> Vec<(K, V)> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Unordered copy of the entries.
    pub fn to_hash(&mut self) -> HashMap<K, V> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Ordered, serializable copy of the entries.
    pub fn snapshot(&mut self) -> Snapshot<K, V> {
        Snapshot::from(self.to_pairs())
    }

    /// For each requested key, its value or the configured default.
    pub fn values_at<'q, Q, I>(&mut self, keys: I) -> Vec<Option<&V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        let index = self.index.ensure(&mut self.keys, &mut self.values);
        keys.into_iter()
            .map(|key| match index.get(key) {
                Some(&pos) => Some(&self.values[pos]),
                None => self.default_value.as_ref(),
            })
            .collect()
    }
}

/// Grow both slot vectors so they can hold `min` entries, doubling from the
/// current capacity and never below [`MIN_CAPACITY`].
fn reserve_slots<K, V>(keys: &mut Vec<K>, values: &mut Vec<V>, min: usize) -> StoreResult<()> {
    let current = keys.capacity().min(values.capacity());
    if min <= current {
        return Ok(());
    }
    let target = min.max(current.saturating_mul(2)).max(MIN_CAPACITY);
    trace!(from = current, to = target, "growing slot vectors");
    reserve_exact(keys, target)?;
    reserve_exact(values, target)
}

fn reserve_exact<T>(slots: &mut Vec<T>, target: usize) -> StoreResult<()> {
    slots
        .try_reserve_exact(target - slots.len())
        .map_err(|source| StoreError::CapacityExhausted {
            requested: target,
            source,
        })
}

impl<T: Hash + Eq + Clone> OrderedStore<T, T> {
    /// Keys and values interleaved as `[k0, v0, k1, v1, ...]`, in insertion
    /// order. Only available when keys and values share a type.
    pub fn flatten(&mut self) -> Vec<T> {
        self.reconcile();
        let mut flat = Vec::with_capacity(self.keys.len() * 2);
        for (key, value) in self.keys.iter().zip(&self.values) {
            flat.push(key.clone());
            flat.push(value.clone());
        }
        flat
    }
}

impl<K: Hash + Eq + Clone, V> Default for OrderedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> Clone for OrderedStore<K, V> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            values: self.values.clone(),
            index: IndexState::Absent,
            default_value: self.default_value.clone(),
        }
    }
}

impl<K, V> fmt::Debug for OrderedStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedStore")
            .field("slots", &self.keys.len())
            .field("capacity", &self.capacity())
            .field("reconciled", &self.index.is_present())
            .finish()
    }
}

impl<K: Hash + Eq + Clone, V> IntoIterator for OrderedStore<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> Self::IntoIter {
        self.reconcile();
        IntoIter::new(self.keys, self.values)
    }
}

impl<'a, K: Hash + Eq + Clone, V> IntoIterator for &'a mut OrderedStore<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
