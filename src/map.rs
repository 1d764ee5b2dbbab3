//! Ordered map type for VDF objects.
//!
//! [`VdfMap`] wraps an [`IndexMap`] so that keys iterate in the order they
//! appeared in the input.
//!
//! ## Examples
//!
//! ```rust
//! use serde_vdf::{VdfMap, Value};
//!
//! let mut map = VdfMap::new();
//! map.insert("name".to_string(), Value::from("Widget"));
//! map.insert("count".to_string(), Value::from("42"));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Widget"));
//! ```

use indexmap::IndexMap;

/// An insertion-ordered map of string keys to VDF values.
///
/// # Examples
///
/// ```rust
/// use serde_vdf::{VdfMap, Value};
///
/// let mut map = VdfMap::new();
/// map.insert("first".to_string(), Value::from("1"));
/// map.insert("second".to_string(), Value::from("2"));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VdfMap(IndexMap<String, crate::Value>);

impl VdfMap {
    /// Creates an empty `VdfMap`.
    #[must_use]
    pub fn new() -> Self {
        VdfMap(IndexMap::new())
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key was already present its value is replaced in place (keeping
    /// its original position) and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_vdf::{VdfMap, Value};
    ///
    /// let mut map = VdfMap::new();
    /// assert!(map.insert("key".to_string(), Value::from("a")).is_none());
    /// assert!(map.insert("key".to_string(), Value::from("b")).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    /// Returns the number of elements in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.0.keys()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }
}

impl FromIterator<(String, crate::Value)> for VdfMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        VdfMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_reinsert_keeps_position() {
        let mut map = VdfMap::new();
        map.insert("a".to_string(), Value::from("1"));
        map.insert("b".to_string(), Value::from("2"));
        map.insert("a".to_string(), Value::from("3"));

        let pairs: Vec<_> = map
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str().unwrap()))
            .collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_collect_keeps_order_and_last_value() {
        let map: VdfMap = vec![
            ("z".to_string(), Value::from("1")),
            ("a".to_string(), Value::from("2")),
            ("z".to_string(), Value::from("3")),
        ]
        .into_iter()
        .collect();

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(map.get("z").and_then(Value::as_str), Some("3"));
        assert_eq!(map.len(), 2);
        assert!(!map.is_empty());
    }
}
