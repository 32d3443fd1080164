//! Output records and their identifiers

use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Reserved key holding the record identifier
pub const ID_KEY: &str = "id";

/// Default reserved key holding the source document's name
pub const DEFAULT_PROVENANCE_KEY: &str = "invoiceFile";

/// A converted `(key, value)` pair ready to be merged into a record
pub type Entry = (String, Value);

/// Unique identifier for a record based on UUIDv7
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u128);

impl RecordId {
    /// Generate a new UUIDv7-based RecordId
    ///
    /// # Examples
    ///
    /// ```
    /// use folio_domain::RecordId;
    ///
    /// let a = RecordId::new();
    /// let b = RecordId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Parse a RecordId from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid record id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A flat output document: string keys to values, in insertion order
///
/// Re-inserting an existing key replaces its value in place, so the key keeps
/// its original position.
#[derive(Debug, Clone, Default)]
pub struct Record {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The record identifier, if it is a string
    pub fn id(&self) -> Option<&str> {
        self.get(ID_KEY).and_then(Value::as_str)
    }

    /// Convert into a JSON object; keys are emitted in sorted order by `serde_json`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Serialize to a JSON string, keeping insertion order
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl PartialEq for Record {
    /// Records are equal when they hold the same keys and values, whatever the order
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_roundtrip() {
        let id = RecordId::new();
        let parsed = RecordId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(RecordId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_insert_keeps_position_on_replace() {
        let mut record = Record::new();
        record.insert("id", Value::from("1"));
        record.insert("name", Value::from("Acme"));
        let previous = record.insert("id", Value::from("2"));

        assert_eq!(previous, Some(Value::from("1")));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(record.id(), Some("2"));
    }

    #[test]
    fn test_serialization_keeps_insertion_order() {
        let record: Record = [
            ("zeta", Value::Int64(1)),
            ("alpha", Value::Int64(2)),
        ]
        .into_iter()
        .collect();

        assert_eq!(record.to_json_string().unwrap(), r#"{"zeta":1,"alpha":2}"#);
        assert_eq!(record.to_json(), json!({"alpha": 2, "zeta": 1}));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: Record = [("x", Value::Int64(1)), ("y", Value::Int64(2))]
            .into_iter()
            .collect();
        let b: Record = [("y", Value::Int64(2)), ("x", Value::Int64(1))]
            .into_iter()
            .collect();
        let c: Record = [("x", Value::Int64(1))].into_iter().collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashMap;

        proptest! {
            #[test]
            fn last_insert_wins(pairs in proptest::collection::vec(("[a-e]{1,2}", any::<i64>()), 0..40)) {
                let mut record = Record::new();
                let mut expected = HashMap::new();
                for (k, v) in &pairs {
                    record.insert(k.clone(), Value::Int64(*v));
                    expected.insert(k.clone(), *v);
                }

                prop_assert_eq!(record.len(), expected.len());
                for (k, v) in expected {
                    prop_assert_eq!(record.get(&k), Some(&Value::Int64(v)));
                }
            }
        }
    }
}
