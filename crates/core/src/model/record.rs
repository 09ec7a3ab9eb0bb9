use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::ids::{SpanId, TraceId};
use crate::model::value::{PropertyValue, Scalar};

/// Backend severity; discriminants are the OTLP severity numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Severity {
    #[default]
    Unspecified = 0,
    Trace = 1,
    Debug = 5,
    Info = 9,
    Warn = 13,
    Error = 17,
    Fatal = 21,
}

impl Severity {
    pub fn number(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct OutputRecord {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub severity_text: Option<String>,
    pub body: Option<String>,
    pub trace_id: Option<TraceId>,
    pub span_id: Option<SpanId>,
}

/// Backend-neutral value tree produced from a [`PropertyValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertedValue {
    Primitive(Scalar),
    Map(IndexMap<String, ConvertedValue>),
    List(Vec<ConvertedValue>),
    /// A property shape the converter does not know, passed through as-is.
    Opaque(PropertyValue),
}

impl ConvertedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Primitive(s) => s.as_str(),
            _ => None,
        }
    }
}

impl From<&str> for ConvertedValue {
    fn from(value: &str) -> Self {
        Self::Primitive(Scalar::from(value))
    }
}

impl From<String> for ConvertedValue {
    fn from(value: String) -> Self {
        Self::Primitive(Scalar::String(value))
    }
}

impl Serialize for ConvertedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Primitive(scalar) => scalar.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
            Self::List(items) => items.serialize(serializer),
            Self::Opaque(value) => serializer.collect_str(value),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Attribute {
    pub key: String,
    pub value: ConvertedValue,
}

/// Ordered record attributes. Keys are not deduplicated.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(transparent)]
pub struct AttributeList(Vec<Attribute>);

impl AttributeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<ConvertedValue>) {
        self.0.push(Attribute {
            key: key.into(),
            value: value.into(),
        });
    }

    /// First attribute stored under `key`.
    pub fn get(&self, key: &str) -> Option<&ConvertedValue> {
        self.0.iter().find(|a| a.key == key).map(|a| &a.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|a| a.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for AttributeList {
    type Item = Attribute;
    type IntoIter = std::vec::IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_numbers_follow_otlp() {
        assert_eq!(Severity::Unspecified.number(), 0);
        assert_eq!(Severity::Info.number(), 9);
        assert_eq!(Severity::Fatal.number(), 21);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn attribute_list_keeps_duplicates_in_order() {
        let mut attrs = AttributeList::new();
        attrs.add("a", "first");
        attrs.add("b", "other");
        attrs.add("a", "second");
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.keys().collect::<Vec<_>>(), vec!["a", "b", "a"]);
        assert_eq!(attrs.get("a").and_then(ConvertedValue::as_str), Some("first"));
    }

    #[test]
    fn converted_value_serializes_as_plain_json() {
        let mut map = IndexMap::new();
        map.insert("$type".to_string(), ConvertedValue::from("Point"));
        map.insert(
            "xs".to_string(),
            ConvertedValue::List(vec![
                ConvertedValue::Primitive(Scalar::Int(1)),
                ConvertedValue::Primitive(Scalar::Null),
            ]),
        );
        let json = serde_json::to_string(&ConvertedValue::Map(map)).unwrap();
        assert_eq!(json, r#"{"$type":"Point","xs":[1,null]}"#);
    }
}
