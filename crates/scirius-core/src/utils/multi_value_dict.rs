//! A dictionary that can hold multiple values per key.
//!
//! Submitted form data repeats a key once per checked box of a
//! multi-select, so single-valued lookups return the **last** value while
//! [`get_list`](MultiValueDict::get_list) returns all of them.

use std::collections::hash_map;
use std::collections::HashMap;
use std::hash::Hash;

/// A dictionary that maps keys to lists of values.
///
/// # Examples
///
/// ```
/// use scirius_core::utils::MultiValueDict;
///
/// let mut d = MultiValueDict::new();
/// d.append("sources", "1");
/// d.append("sources", "3");
///
/// assert_eq!(d.get(&"sources"), Some(&"3"));
/// assert_eq!(d.get_list(&"sources"), &["1", "3"]);
/// assert!(d.get_list(&"missing").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValueDict<K: Eq + Hash, V> {
    inner: HashMap<K, Vec<V>>,
}

impl<K: Eq + Hash, V> Default for MultiValueDict<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> MultiValueDict<K, V> {
    /// Creates an empty `MultiValueDict`.
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Returns the last value associated with the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key).and_then(|v| v.last())
    }

    /// Returns all values associated with the key; empty if the key is absent.
    pub fn get_list(&self, key: &K) -> &[V] {
        self.inner.get(key).map_or(&[], Vec::as_slice)
    }

    /// Sets the value for a key, replacing any existing values.
    pub fn set(&mut self, key: K, value: V) {
        self.inner.insert(key, vec![value]);
    }

    /// Replaces the whole value list for a key.
    pub fn set_list(&mut self, key: K, values: Vec<V>) {
        self.inner.insert(key, values);
    }

    /// Appends a value to the list for the given key.
    pub fn append(&mut self, key: K, value: V) {
        self.inner.entry(key).or_default().push(value);
    }

    /// Removes a key, returning its values.
    pub fn remove(&mut self, key: &K) -> Option<Vec<V>> {
        self.inner.remove(key)
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> hash_map::Keys<'_, K, Vec<V>> {
        self.inner.keys()
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the dictionary contains no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if the dictionary contains the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns an iterator over (key, value-list) pairs.
    pub fn iter(&self) -> hash_map::Iter<'_, K, Vec<V>> {
        self.inner.iter()
    }
}

impl<'a, K: Eq + Hash, V> IntoIterator for &'a MultiValueDict<K, V> {
    type Item = (&'a K, &'a Vec<V>);
    type IntoIter = hash_map::Iter<'a, K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for MultiValueDict<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (k, v) in iter {
            dict.append(k, v);
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let d: MultiValueDict<String, String> = MultiValueDict::new();
        assert!(d.is_empty());
        assert_eq!(d.len(), 0);
    }

    #[test]
    fn test_get_returns_last() {
        let mut d = MultiValueDict::new();
        d.append("k", 1);
        d.append("k", 2);
        assert_eq!(d.get(&"k"), Some(&2));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_set_replaces() {
        let mut d = MultiValueDict::new();
        d.append("k", 1);
        d.append("k", 2);
        d.set("k", 9);
        assert_eq!(d.get_list(&"k"), &[9]);
    }

    #[test]
    fn test_set_list_and_remove() {
        let mut d = MultiValueDict::new();
        d.set_list("k", vec!["a", "b"]);
        assert_eq!(d.get_list(&"k"), &["a", "b"]);
        assert_eq!(d.remove(&"k"), Some(vec!["a", "b"]));
        assert!(!d.contains_key(&"k"));
    }

    #[test]
    fn test_from_iterator_groups_keys() {
        let d: MultiValueDict<&str, &str> =
            [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(d.get_list(&"a"), &["1", "3"]);
        assert_eq!(d.get_list(&"b"), &["2"]);
    }
}
