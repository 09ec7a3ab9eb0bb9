use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Which optional parts of an event are carried into the output record.
///
/// Flags are independent and combine with `|`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IncludedData(u16);

impl IncludedData {
    pub const NONE: Self = Self(0);
    /// Raw template text as `message_template.text`.
    pub const MESSAGE_TEMPLATE_TEXT_ATTRIBUTE: Self = Self(1);
    /// Hex MD5 of the template text as `message_template.hash.md5`.
    pub const MESSAGE_TEMPLATE_MD5_HASH_ATTRIBUTE: Self = Self(1 << 1);
    pub const TRACE_ID_FIELD: Self = Self(1 << 2);
    pub const SPAN_ID_FIELD: Self = Self(1 << 3);
    /// Structure type tags kept under a leading `$type` key.
    pub const STRUCTURE_VALUE_TYPE_TAGS: Self = Self(1 << 4);
    /// Formatted hole renderings as `message_template.renderings`.
    pub const MESSAGE_TEMPLATE_RENDERINGS_ATTRIBUTE: Self = Self(1 << 5);
    /// Raw template text as the body instead of the rendered message.
    pub const TEMPLATE_BODY: Self = Self(1 << 6);
    /// Keep `SourceContext` as an attribute in addition to the scope name.
    pub const SOURCE_CONTEXT_ATTRIBUTE: Self = Self(1 << 7);

    pub const DEFAULT: Self = Self(
        Self::MESSAGE_TEMPLATE_TEXT_ATTRIBUTE.0
            | Self::STRUCTURE_VALUE_TYPE_TAGS.0
            | Self::TRACE_ID_FIELD.0
            | Self::SPAN_ID_FIELD.0,
    );

    pub const FLAGS: [(&'static str, IncludedData); 8] = [
        (
            "message_template_text_attribute",
            Self::MESSAGE_TEMPLATE_TEXT_ATTRIBUTE,
        ),
        (
            "message_template_md5_hash_attribute",
            Self::MESSAGE_TEMPLATE_MD5_HASH_ATTRIBUTE,
        ),
        ("trace_id_field", Self::TRACE_ID_FIELD),
        ("span_id_field", Self::SPAN_ID_FIELD),
        ("structure_value_type_tags", Self::STRUCTURE_VALUE_TYPE_TAGS),
        (
            "message_template_renderings_attribute",
            Self::MESSAGE_TEMPLATE_RENDERINGS_ATTRIBUTE,
        ),
        ("template_body", Self::TEMPLATE_BODY),
        ("source_context_attribute", Self::SOURCE_CONTEXT_ATTRIBUTE),
    ];

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn message_template_text_attribute(self) -> bool {
        self.contains(Self::MESSAGE_TEMPLATE_TEXT_ATTRIBUTE)
    }

    pub fn message_template_md5_hash_attribute(self) -> bool {
        self.contains(Self::MESSAGE_TEMPLATE_MD5_HASH_ATTRIBUTE)
    }

    pub fn trace_id_field(self) -> bool {
        self.contains(Self::TRACE_ID_FIELD)
    }

    pub fn span_id_field(self) -> bool {
        self.contains(Self::SPAN_ID_FIELD)
    }

    pub fn structure_value_type_tags(self) -> bool {
        self.contains(Self::STRUCTURE_VALUE_TYPE_TAGS)
    }

    pub fn message_template_renderings_attribute(self) -> bool {
        self.contains(Self::MESSAGE_TEMPLATE_RENDERINGS_ATTRIBUTE)
    }

    pub fn template_body(self) -> bool {
        self.contains(Self::TEMPLATE_BODY)
    }

    pub fn source_context_attribute(self) -> bool {
        self.contains(Self::SOURCE_CONTEXT_ATTRIBUTE)
    }

    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::FLAGS
            .into_iter()
            .filter(move |(_, flag)| self.contains(*flag))
            .map(|(name, _)| name)
    }
}

impl Default for IncludedData {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl BitOr for IncludedData {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for IncludedData {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for IncludedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IncludedData({self})")
    }
}

/// Comma separated flag names, or `none`.
impl fmt::Display for IncludedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<_> = self.names().collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for IncludedData {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut out = Self::NONE;
        for entry in s.split(',') {
            let name = entry.trim().to_ascii_lowercase().replace('-', "_");
            if name.is_empty() || name == "none" {
                continue;
            }
            if name == "default" {
                out |= Self::DEFAULT;
                continue;
            }
            let Some((_, flag)) = Self::FLAGS.iter().find(|(n, _)| *n == name) else {
                return Err(BridgeError::Parse(format!(
                    "unknown included data flag: {}",
                    entry.trim()
                )));
            };
            out |= *flag;
        }
        Ok(out)
    }
}

impl TryFrom<String> for IncludedData {
    type Error = BridgeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<IncludedData> for String {
    fn from(value: IncludedData) -> Self {
        value.to_string()
    }
}
