//! SlotValue - Type-Erased Resolved Values
//!
//! Slots resolve to values of arbitrary types. A `SlotValue` erases the type
//! behind an `Arc` but keeps enough to read it back (`downcast_ref`) and to
//! compare two resolutions of the same slot, either by identity or by value.

use crate::config::ChangeDetection;
use crate::error::FetchError;
use crate::slot::SlotKey;
use ahash::AHashMap;
use std::any::{Any, type_name};
use std::sync::Arc;

type ValueEq = fn(&dyn Any, &dyn Any) -> bool;

fn value_eq<T: PartialEq + 'static>(a: &dyn Any, b: &dyn Any) -> bool {
    match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// A resolved slot value.
///
/// Cloning is cheap: clones share the same allocation, so two clones are
/// identical under [`ChangeDetection::Identity`].
#[derive(Clone)]
pub struct SlotValue {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    eq: ValueEq,
}

impl SlotValue {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync + PartialEq,
    {
        Self {
            inner: Arc::new(value),
            type_name: type_name::<T>(),
            eq: value_eq::<T>,
        }
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Full type name of the stored value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Same allocation.
    pub fn same_identity(&self, other: &SlotValue) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.inner), Arc::as_ptr(&other.inner))
    }

    /// Same type and `PartialEq`-equal.
    pub fn same_value(&self, other: &SlotValue) -> bool {
        self.same_identity(other) || (self.eq)(&*self.inner, &*other.inner)
    }

    /// Whether `other` counts as a change from `self` under `mode`.
    pub fn changed(&self, other: &SlotValue, mode: ChangeDetection) -> bool {
        match mode {
            ChangeDetection::Identity => !self.same_identity(other),
            ChangeDetection::Value => !self.same_value(other),
        }
    }
}

impl std::fmt::Debug for SlotValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotValue")
            .field("type", &self.type_name)
            .finish()
    }
}

/// Resolved values keyed by slot.
///
/// A fetch function receives the values of its dependencies through this
/// map; the gate hands out the full set once slots resolve.
#[derive(Clone, Default)]
pub struct SlotValues {
    values: AHashMap<SlotKey, SlotValue>,
}

impl SlotValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<SlotKey>, value: SlotValue) {
        self.values.insert(key.into(), value);
    }

    /// Typed read. `None` if absent or of another type.
    pub fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|value| value.downcast_ref())
    }

    /// Typed read for use inside fetch functions.
    ///
    /// A missing or mistyped input becomes a [`FetchError::MissingInput`], so
    /// a fetch can write `inputs.require::<String>("username")?`.
    pub fn require<T: 'static>(&self, key: &str) -> Result<&T, FetchError> {
        self.get(key)
            .ok_or_else(|| FetchError::MissingInput(key.to_string()))
    }

    pub fn raw(&self, key: &str) -> Option<&SlotValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<SlotValue> {
        self.values.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for SlotValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut values = SlotValues::new();
        values.insert("answer", SlotValue::new(42i32));
        values.insert("name", SlotValue::new("hello".to_string()));

        assert_eq!(values.get::<i32>("answer"), Some(&42));
        assert_eq!(values.get::<String>("name"), Some(&"hello".to_string()));
        assert_eq!(values.get::<f64>("answer"), None);
        assert_eq!(values.get::<i32>("missing"), None);
    }

    #[test]
    fn test_require_reports_missing_input() {
        let values = SlotValues::new();
        let err = values.require::<String>("username").unwrap_err();
        assert!(matches!(err, FetchError::MissingInput(key) if key == "username"));
    }

    #[test]
    fn test_change_detection_modes() {
        let first = SlotValue::new(vec![1, 2, 3]);
        let equal = SlotValue::new(vec![1, 2, 3]);
        let shared = first.clone();

        assert!(!first.changed(&equal, ChangeDetection::Value));
        assert!(first.changed(&equal, ChangeDetection::Identity));
        assert!(!first.changed(&shared, ChangeDetection::Identity));

        let other_type = SlotValue::new(3u8);
        assert!(first.changed(&other_type, ChangeDetection::Value));
    }
}
