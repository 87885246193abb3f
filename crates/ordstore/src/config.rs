//! Construction-time configuration for stores.

use serde::{Deserialize, Serialize};

/// Smallest capacity a store grows to on its first append.
pub const MIN_CAPACITY: usize = 16;

/// Construction-time settings for an [`OrderedStore`](crate::OrderedStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig<V> {
    /// Slots reserved up front in both sequences and the lookup index.
    pub initial_capacity: usize,
    /// Value returned by reads of missing keys. `None` means "no value".
    pub default_value: Option<V>,
}

impl<V> Default for StoreConfig<V> {
    fn default() -> Self {
        Self {
            initial_capacity: MIN_CAPACITY,
            default_value: None,
        }
    }
}

impl<V> StoreConfig<V> {
    /// Reserve room for `capacity` entries up front.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Value handed out for missing keys.
    pub fn with_default_value(mut self, value: V) -> Self {
        self.default_value = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::<i32>::default();
        assert_eq!(c.initial_capacity, MIN_CAPACITY);
        assert!(c.default_value.is_none());
    }

    #[test]
    fn builder_setters() {
        let c = StoreConfig::default()
            .with_initial_capacity(1024)
            .with_default_value("none");
        assert_eq!(c.initial_capacity, 1024);
        assert_eq!(c.default_value, Some("none"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let c: StoreConfig<i32> = serde_json::from_str(r#"{"default_value": 7}"#).unwrap();
        assert_eq!(c.initial_capacity, MIN_CAPACITY);
        assert_eq!(c.default_value, Some(7));
    }
}
