use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::render::{Culture, write_value};

/// Property values keyed by name, in the order they were captured.
pub type Properties = IndexMap<String, PropertyValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Literal text of the value: strings unquoted, `null` for [`Scalar::Null`].
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructureValue {
    pub type_tag: Option<String>,
    pub properties: Vec<(String, PropertyValue)>,
}

/// A captured property value.
///
/// New shapes may be added; consumers outside this crate must keep a
/// fallback arm.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PropertyValue {
    Scalar(Scalar),
    Structure(StructureValue),
    Sequence(Vec<PropertyValue>),
    KeyedMap(Vec<(Scalar, PropertyValue)>),
}

impl PropertyValue {
    pub fn structure<I, K>(type_tag: Option<&str>, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, PropertyValue)>,
        K: Into<String>,
    {
        Self::Structure(StructureValue {
            type_tag: type_tag.map(str::to_string),
            properties: properties
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        })
    }

    pub fn sequence<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = PropertyValue>,
    {
        Self::Sequence(elements.into_iter().collect())
    }

    pub fn keyed_map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, PropertyValue)>,
        K: Into<Scalar>,
    {
        Self::KeyedMap(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }
}

impl From<Scalar> for PropertyValue {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! scalar_property_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PropertyValue {
                fn from(value: $t) -> Self {
                    Self::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_property_from!(&str, String, bool, i32, i64, u64, f64);

/// Renders the value the way it appears inside a message, strings quoted.
impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_value(&mut out, self, None, &Culture::invariant());
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_literal_text() {
        assert_eq!(Scalar::Null.to_string(), "null");
        assert_eq!(Scalar::from("abc").to_string(), "abc");
        assert_eq!(Scalar::from(42).to_string(), "42");
        assert_eq!(Scalar::from(None::<i64>), Scalar::Null);
    }

    #[test]
    fn property_value_display_quotes_nested_strings() {
        let value = PropertyValue::structure(
            Some("User"),
            [("Name", PropertyValue::from("ada")), ("Id", 7.into())],
        );
        assert_eq!(value.to_string(), "User { Name: \"ada\", Id: 7 }");
    }

    #[test]
    fn scalars_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            Scalar::Null,
            Scalar::Bool(true),
            Scalar::Int(-3),
            Scalar::from("x"),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,true,-3,"x"]"#);
    }
}
