//! Dynamic data values processed by schemas
//!
//! [`Data`] is the value space every schema reads from and produces: the
//! JSON-like primitives plus byte sequences and timestamps, which leaf schemas
//! emit as their internal (parsed) representation.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Insertion-ordered mapping of text keys to values
pub type Record = IndexMap<String, Data>;

/// A dynamic value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Data {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integral number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    String(String),
    /// Raw byte sequence
    Bytes(Vec<u8>),
    /// Timestamp with a fixed UTC offset
    DateTime(DateTime<FixedOffset>),
    /// Ordered sequence of values
    List(Vec<Data>),
    /// Keyed record, iterated in insertion order
    Record(Record),
}

/// The variant of a [`Data`] value, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Bytes,
    DateTime,
    List,
    Record,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::Null => write!(f, "null"),
            DataKind::Bool => write!(f, "bool"),
            DataKind::Int => write!(f, "int"),
            DataKind::Float => write!(f, "float"),
            DataKind::String => write!(f, "string"),
            DataKind::Bytes => write!(f, "bytes"),
            DataKind::DateTime => write!(f, "datetime"),
            DataKind::List => write!(f, "list"),
            DataKind::Record => write!(f, "record"),
        }
    }
}

impl Data {
    /// Get the kind of this value
    pub fn kind(&self) -> DataKind {
        match self {
            Data::Null => DataKind::Null,
            Data::Bool(_) => DataKind::Bool,
            Data::Int(_) => DataKind::Int,
            Data::Float(_) => DataKind::Float,
            Data::String(_) => DataKind::String,
            Data::Bytes(_) => DataKind::Bytes,
            Data::DateTime(_) => DataKind::DateTime,
            Data::List(_) => DataKind::List,
            Data::Record(_) => DataKind::Record,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Data::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Data::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Data::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Data::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Data::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Data::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Data::DateTime(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Data]> {
        match self {
            Data::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Data::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Look up a key when this value is a record
    pub fn get(&self, key: &str) -> Option<&Data> {
        self.as_record().and_then(|r| r.get(key))
    }

    /// Convert into a JSON value.
    ///
    /// Bytes become standard base64 text, timestamps RFC 3339 text and
    /// non-finite floats `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Data::Null => Value::Null,
            Data::Bool(b) => Value::Bool(*b),
            Data::Int(i) => Value::from(*i),
            Data::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Data::String(s) => Value::String(s.clone()),
            Data::Bytes(b) => Value::String(STANDARD.encode(b)),
            Data::DateTime(t) => Value::String(format_rfc3339(t)),
            Data::List(l) => Value::Array(l.iter().map(Data::to_json).collect()),
            Data::Record(r) => Value::Object(
                r.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Format a timestamp as RFC 3339, with only as many fractional digits as needed
pub(crate) fn format_rfc3339(t: &DateTime<FixedOffset>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<serde_json::Value> for Data {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Data::Null,
            Value::Bool(b) => Data::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Data::Int(i),
                None => n.as_f64().map(Data::Float).unwrap_or(Data::Null),
            },
            Value::String(s) => Data::String(s),
            Value::Array(a) => Data::List(a.into_iter().map(Data::from).collect()),
            Value::Object(o) => Data::Record(
                o.into_iter()
                    .map(|(key, value)| (key, Data::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Data> for serde_json::Value {
    fn from(data: &Data) -> Self {
        data.to_json()
    }
}

impl From<bool> for Data {
    fn from(b: bool) -> Self {
        Data::Bool(b)
    }
}

impl From<i32> for Data {
    fn from(i: i32) -> Self {
        Data::Int(i64::from(i))
    }
}

impl From<i64> for Data {
    fn from(i: i64) -> Self {
        Data::Int(i)
    }
}

impl From<f64> for Data {
    fn from(f: f64) -> Self {
        Data::Float(f)
    }
}

impl From<&str> for Data {
    fn from(s: &str) -> Self {
        Data::String(s.to_string())
    }
}

impl From<String> for Data {
    fn from(s: String) -> Self {
        Data::String(s)
    }
}

impl From<Vec<u8>> for Data {
    fn from(b: Vec<u8>) -> Self {
        Data::Bytes(b)
    }
}

impl From<DateTime<FixedOffset>> for Data {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Data::DateTime(t)
    }
}

impl From<DateTime<Utc>> for Data {
    fn from(t: DateTime<Utc>) -> Self {
        Data::DateTime(t.into())
    }
}

impl From<Vec<Data>> for Data {
    fn from(l: Vec<Data>) -> Self {
        Data::List(l)
    }
}

impl From<Record> for Data {
    fn from(r: Record) -> Self {
        Data::Record(r)
    }
}

impl<T: Into<Data>> From<Option<T>> for Data {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Data::Null)
    }
}

impl<K: Into<String>, V: Into<Data>> FromIterator<(K, V)> for Data {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Data::Record(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl Serialize for Data {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Data::Null => serializer.serialize_unit(),
            Data::Bool(b) => serializer.serialize_bool(*b),
            Data::Int(i) => serializer.serialize_i64(*i),
            Data::Float(f) => serializer.serialize_f64(*f),
            Data::String(s) => serializer.serialize_str(s),
            Data::Bytes(b) => serializer.serialize_str(&STANDARD.encode(b)),
            Data::DateTime(t) => serializer.serialize_str(&format_rfc3339(t)),
            Data::List(l) => {
                let mut seq = serializer.serialize_seq(Some(l.len()))?;
                for element in l {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Data::Record(r) => {
                let mut map = serializer.serialize_map(Some(r.len()))?;
                for (key, value) in r {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Data {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Data::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_splits_numbers() {
        let data = Data::from(json!({"a": 1, "b": 1.5, "c": [true, null]}));
        assert_eq!(data.get("a"), Some(&Data::Int(1)));
        assert_eq!(data.get("b"), Some(&Data::Float(1.5)));
        assert_eq!(
            data.get("c"),
            Some(&Data::List(vec![Data::Bool(true), Data::Null]))
        );
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let data = Data::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<&str> = data
            .as_record()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_to_json_encodes_bytes_and_timestamps() {
        let t = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z").unwrap();
        let data: Data = [
            ("raw", Data::Bytes(b"hi".to_vec())),
            ("at", Data::DateTime(t)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            data.to_json(),
            json!({"raw": "aGk=", "at": "2024-05-01T10:00:00Z"})
        );
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Data::Int(1).kind().to_string(), "int");
        assert_eq!(Data::Record(Record::new()).kind().to_string(), "record");
        assert_eq!(Data::Null.kind(), DataKind::Null);
    }

    #[test]
    fn test_deserialize_via_serde() {
        let data: Data = serde_json::from_str(r#"{"n": -3, "s": "x"}"#).unwrap();
        assert_eq!(data.get("n"), Some(&Data::Int(-3)));
        assert_eq!(serde_json::to_string(&data).unwrap(), r#"{"n":-3,"s":"x"}"#);
    }
}
