//! Error types for the store crate.

use std::collections::TryReserveError;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A strict fetch found no entry and was given neither a default nor a
    /// fallback.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Growing the slot sequences failed. Not recoverable.
    #[error("capacity exhausted: could not grow to {requested} slots")]
    CapacityExhausted {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
}

impl StoreError {
    /// Build a `KeyNotFound` from any debuggable key.
    pub(crate) fn key_not_found<Q: std::fmt::Debug + ?Sized>(key: &Q) -> Self {
        Self::KeyNotFound(format!("{key:?}"))
    }

    /// Returns `true` for the missing-key error.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;
