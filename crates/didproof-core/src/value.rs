//! Structured values: the input to canonicalization.
//!
//! A [`StructuredValue`] is a JSON-shaped tree. Records keep their entries in
//! insertion order so the wire form of a document can round-trip untouched;
//! the canonicalizer is responsible for sorting keys, never the container.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

use crate::error::CanonicalError;

/// A recursive structured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredValue {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
    List(Vec<StructuredValue>),
    Record(Record),
}

impl StructuredValue {
    /// Build a record value from `(key, value)` pairs.
    pub fn record<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<StructuredValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        StructuredValue::Record(entries.into_iter().collect())
    }

    /// Build a list value.
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<StructuredValue>,
        I: IntoIterator<Item = V>,
    {
        StructuredValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a number from a float. Returns `None` for NaN and infinities,
    /// which have no JSON representation.
    pub fn from_f64(f: f64) -> Option<Self> {
        Number::from_f64(f).map(StructuredValue::Number)
    }

    /// Convert any serializable value (e.g. a document struct).
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self, CanonicalError> {
        let json =
            serde_json::to_value(value).map_err(|e| CanonicalError::Serialization(e.to_string()))?;
        Ok(json.into())
    }

    /// Convert into a `serde_json::Value`.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            StructuredValue::String(s) => serde_json::Value::String(s.clone()),
            StructuredValue::Number(n) => serde_json::Value::Number(n.clone()),
            StructuredValue::Bool(b) => serde_json::Value::Bool(*b),
            StructuredValue::Null => serde_json::Value::Null,
            StructuredValue::List(items) => {
                serde_json::Value::Array(items.iter().map(|v| v.to_json_value()).collect())
            }
            StructuredValue::Record(record) => serde_json::Value::Object(
                record
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_json_value()))
                    .collect(),
            ),
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            StructuredValue::String(_) => "string",
            StructuredValue::Number(_) => "number",
            StructuredValue::Bool(_) => "bool",
            StructuredValue::Null => "null",
            StructuredValue::List(_) => "list",
            StructuredValue::Record(_) => "record",
        }
    }

    /// Borrow the record, if this value is one.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            StructuredValue::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Mutably borrow the record, if this value is one.
    pub fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            StructuredValue::Record(r) => Some(r),
            _ => None,
        }
    }
}

/// A record: unique string keys mapped to values, in insertion order.
///
/// Equality ignores entry order, so two records built from the same fields
/// in different orders compare equal.
#[derive(Debug, Clone, Default)]
pub struct Record {
    entries: Vec<(String, StructuredValue)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. If the key exists its value is replaced in place and
    /// the old value returned.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<StructuredValue>,
    ) -> Option<StructuredValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<StructuredValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&StructuredValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Mutable lookup by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut StructuredValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StructuredValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).map_or(false, |ov| ov == v))
    }
}

impl Eq for Record {}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<StructuredValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, StructuredValue);
    type IntoIter = std::vec::IntoIter<(String, StructuredValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────────────────────

impl From<&str> for StructuredValue {
    fn from(s: &str) -> Self {
        StructuredValue::String(s.to_string())
    }
}

impl From<String> for StructuredValue {
    fn from(s: String) -> Self {
        StructuredValue::String(s)
    }
}

impl From<bool> for StructuredValue {
    fn from(b: bool) -> Self {
        StructuredValue::Bool(b)
    }
}

impl From<i64> for StructuredValue {
    fn from(n: i64) -> Self {
        StructuredValue::Number(n.into())
    }
}

impl From<u64> for StructuredValue {
    fn from(n: u64) -> Self {
        StructuredValue::Number(n.into())
    }
}

impl From<i32> for StructuredValue {
    fn from(n: i32) -> Self {
        StructuredValue::Number(n.into())
    }
}

impl From<Number> for StructuredValue {
    fn from(n: Number) -> Self {
        StructuredValue::Number(n)
    }
}

impl From<Record> for StructuredValue {
    fn from(r: Record) -> Self {
        StructuredValue::Record(r)
    }
}

impl From<Vec<StructuredValue>> for StructuredValue {
    fn from(items: Vec<StructuredValue>) -> Self {
        StructuredValue::List(items)
    }
}

impl<T: Into<StructuredValue>> From<Option<T>> for StructuredValue {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(StructuredValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for StructuredValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => StructuredValue::Null,
            serde_json::Value::Bool(b) => StructuredValue::Bool(b),
            serde_json::Value::Number(n) => StructuredValue::Number(n),
            serde_json::Value::String(s) => StructuredValue::String(s),
            serde_json::Value::Array(items) => {
                StructuredValue::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => StructuredValue::Record(map.into_iter().collect()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serde
// ─────────────────────────────────────────────────────────────────────────────

impl Serialize for StructuredValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StructuredValue::String(s) => serializer.serialize_str(s),
            StructuredValue::Number(n) => n.serialize(serializer),
            StructuredValue::Bool(b) => serializer.serialize_bool(*b),
            StructuredValue::Null => serializer.serialize_unit(),
            StructuredValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            StructuredValue::Record(record) => record.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct StructuredValueVisitor;

impl<'de> Visitor<'de> for StructuredValueVisitor {
    type Value = StructuredValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(StructuredValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v.into())
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(v.into())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        StructuredValue::from_f64(v).ok_or_else(|| E::custom("non-finite number"))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.into())
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(v.into())
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(StructuredValue::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(StructuredValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        StructuredValue::deserialize(d)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(StructuredValue::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut record = Record::new();
        while let Some((k, v)) = map.next_entry::<String, StructuredValue>()? {
            if record.insert(k.clone(), v).is_some() {
                return Err(de::Error::custom(format!("duplicate key `{k}`")));
            }
        }
        Ok(StructuredValue::Record(record))
    }
}

impl<'de> Deserialize<'de> for StructuredValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StructuredValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_insert_replaces_in_place() {
        let mut record = Record::new();
        record.insert("a", "1");
        record.insert("b", "2");
        let old = record.insert("a", "3");

        assert_eq!(old, Some(StructuredValue::from("1")));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&StructuredValue::from("3")));
    }

    #[test]
    fn test_record_equality_ignores_order() {
        let r1: Record = [("a", "1"), ("b", "2")].into_iter().collect();
        let r2: Record = [("b", "2"), ("a", "1")].into_iter().collect();
        let r3: Record = [("b", "2"), ("a", "x")].into_iter().collect();
        assert_eq!(r1, r2);
        assert_ne!(r1, r3);
    }

    #[test]
    fn test_list_equality_respects_order() {
        let l1 = StructuredValue::list(["a", "b"]);
        let l2 = StructuredValue::list(["b", "a"]);
        assert_ne!(l1, l2);
    }

    #[test]
    fn test_deserialize_preserves_insertion_order() {
        let value: StructuredValue = serde_json::from_str(r#"{"z":1,"a":[true,null]}"#).unwrap();
        let record = value.as_record().unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["z", "a"]);

        // Serialization writes entries back in the same order.
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"z":1,"a":[true,null]}"#);
    }

    #[test]
    fn test_deserialize_rejects_duplicate_keys() {
        let result: Result<StructuredValue, _> = serde_json::from_str(r#"{"a":1,"a":2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_float_rejected() {
        assert!(StructuredValue::from_f64(f64::NAN).is_none());
        assert!(StructuredValue::from_f64(f64::INFINITY).is_none());
        assert!(StructuredValue::from_f64(1.5).is_some());
    }

    #[test]
    fn test_json_value_conversion() {
        let json = serde_json::json!({"b": [1, "two", false], "a": {"c": null}});
        let value = StructuredValue::from(json.clone());
        assert_eq!(value.to_json_value(), json);
        assert_eq!(value.type_name(), "record");
    }
}
