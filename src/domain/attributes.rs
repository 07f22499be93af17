//! Ordered attribute maps stored as two parallel sequences.
//!
//! The document store has no map field type, only multivalued strings. A map is
//! therefore persisted as a key column and a value column of equal length. All
//! conversion between the two forms goes through [`decode`] and [`encode`] so the
//! length invariant has a single enforcement point.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::domain::error::{DomainError, DomainResult};

/// Map with unique string keys that remembers insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for AttributeMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> AttributeMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a value. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for AttributeMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V> IntoIterator for AttributeMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// Serialized as a map so JSON output keeps insertion order.
impl<V: Serialize> Serialize for AttributeMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Zip a key column and a value column into an ordered map.
///
/// Absent keys mean "never set" and yield an empty map. When keys are present
/// the value column must have the same length; absent values count as empty.
/// A repeated key keeps its first position and takes the later value.
pub fn decode<V: Clone>(
    keys: Option<&[String]>,
    values: Option<&[V]>,
) -> DomainResult<AttributeMap<V>> {
    let Some(keys) = keys else {
        return Ok(AttributeMap::new());
    };
    let values = values.unwrap_or(&[]);
    if keys.len() != values.len() {
        debug!("decode: {} keys vs {} values", keys.len(), values.len());
        return Err(DomainError::LengthMismatch {
            keys: keys.len(),
            values: values.len(),
        });
    }
    Ok(keys
        .iter()
        .cloned()
        .zip(values.iter().cloned())
        .collect())
}

/// Split an ordered map into its key column and value column.
pub fn encode<V: Clone>(map: &AttributeMap<V>) -> (Vec<String>, Vec<V>) {
    map.entries.iter().cloned().unzip()
}

/// The persisted form of one attribute map: a key column and a value column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeColumns<V> {
    keys: Option<Vec<String>>,
    values: Option<Vec<V>>,
}

impl<V> Default for AttributeColumns<V> {
    fn default() -> Self {
        Self {
            keys: None,
            values: None,
        }
    }
}

impl<V: Clone> AttributeColumns<V> {
    /// Wrap columns as read from storage. No validation happens until [`Self::decode`].
    pub fn from_raw(keys: Option<Vec<String>>, values: Option<Vec<V>>) -> Self {
        Self { keys, values }
    }

    pub fn decode(&self) -> DomainResult<AttributeMap<V>> {
        decode(self.keys.as_deref(), self.values.as_deref())
    }

    /// Replace both columns from a map.
    pub fn store(&mut self, map: &AttributeMap<V>) {
        let (keys, values) = encode(map);
        self.keys = Some(keys);
        self.values = Some(values);
    }

    pub fn keys(&self) -> Option<&[String]> {
        self.keys.as_deref()
    }

    pub fn values(&self) -> Option<&[V]> {
        self.values.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn given_absent_keys_when_decoding_then_returns_empty_map() {
        let map: AttributeMap<String> = decode(None, Some(strings(&["x"]).as_slice())).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn given_keys_without_values_when_decoding_then_length_mismatch() {
        let keys = strings(&["a"]);
        let result: DomainResult<AttributeMap<String>> = decode(Some(keys.as_slice()), None);
        assert_eq!(result, Err(DomainError::LengthMismatch { keys: 1, values: 0 }));
    }

    #[test]
    fn given_more_keys_than_values_when_decoding_then_length_mismatch() {
        let keys = strings(&["a", "b"]);
        let values = strings(&["x"]);
        let err = decode(Some(keys.as_slice()), Some(values.as_slice())).unwrap_err();
        assert_eq!(err, DomainError::LengthMismatch { keys: 2, values: 1 });
    }

    #[test]
    fn given_duplicate_stored_key_when_decoding_then_later_value_wins_in_first_position() {
        let keys = strings(&["a", "b", "a"]);
        let values = strings(&["1", "2", "3"]);
        let map = decode(Some(keys.as_slice()), Some(values.as_slice())).unwrap();
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![("a", &"3".to_string()), ("b", &"2".to_string())]);
    }

    #[test]
    fn given_map_when_encoding_then_columns_follow_insertion_order() {
        let map: AttributeMap<String> =
            [("class", "nav".to_string()), ("id", "main".to_string())].into_iter().collect();
        let (keys, values) = encode(&map);
        assert_eq!(keys, strings(&["class", "id"]));
        assert_eq!(values, strings(&["nav", "main"]));
        assert_eq!(encode(&map), (keys, values));
    }

    #[test]
    fn given_existing_key_when_inserting_then_position_is_kept() {
        let mut map = AttributeMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 3), Some(1));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&3));
    }

    #[test]
    fn given_columns_when_storing_empty_map_then_decodes_to_empty() {
        let mut columns: AttributeColumns<String> = AttributeColumns::default();
        columns.store(&AttributeMap::new());
        assert_eq!(columns.keys(), Some(&[][..]));
        assert!(columns.decode().unwrap().is_empty());
    }

    #[test]
    fn given_map_when_serialized_then_json_keeps_order() {
        let map: AttributeMap<String> =
            [("z", "1".to_string()), ("a", "2".to_string())].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2"}"#);
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(pairs in proptest::collection::vec(("[a-z]{1,6}", ".*"), 0..12)) {
            let map: AttributeMap<String> = pairs.into_iter().collect();
            let (keys, values) = encode(&map);
            prop_assert_eq!(keys.len(), values.len());
            let decoded = decode(Some(keys.as_slice()), Some(values.as_slice())).unwrap();
            prop_assert_eq!(decoded, map);
        }
    }
}
