use serde::{Deserialize, Serialize};

use crate::format::{Number, format_number};
use crate::model::value::{Properties, PropertyValue, Scalar};
use crate::template::{Alignment, MessageTemplate, PropertyToken, Token};

/// Number formatting conventions used while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Culture {
    pub decimal_separator: char,
    pub group_separator: char,
}

impl Culture {
    pub const fn invariant() -> Self {
        Self {
            decimal_separator: '.',
            group_separator: ',',
        }
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

/// Renders `template` as plain text. Top-level string values are written
/// without quotes; holes with no matching property keep their raw text.
pub fn render_clean(
    template: &MessageTemplate,
    properties: &Properties,
    culture: Option<&Culture>,
) -> String {
    let culture = culture.copied().unwrap_or_default();
    let mut out = String::new();
    for token in template.tokens() {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Property(pt) => match properties.get(&pt.name) {
                Some(PropertyValue::Scalar(Scalar::String(s))) => {
                    write_aligned(&mut out, s, pt.alignment)
                }
                Some(value) => {
                    let mut rendered = String::new();
                    write_value(&mut rendered, value, pt.format.as_deref(), &culture);
                    write_aligned(&mut out, &rendered, pt.alignment);
                }
                None => out.push_str(&pt.raw),
            },
        }
    }
    out
}

/// Renders a single hole the way it appears inside a formatted message:
/// strings are quoted unless the format is `l`.
pub fn render_token(
    token: &PropertyToken,
    properties: &Properties,
    culture: Option<&Culture>,
) -> String {
    let Some(value) = properties.get(&token.name) else {
        return token.raw.clone();
    };
    let culture = culture.copied().unwrap_or_default();
    let mut rendered = String::new();
    write_value(&mut rendered, value, token.format.as_deref(), &culture);

    let mut out = String::new();
    write_aligned(&mut out, &rendered, token.alignment);
    out
}

pub(crate) fn write_value(
    out: &mut String,
    value: &PropertyValue,
    format: Option<&str>,
    culture: &Culture,
) {
    match value {
        PropertyValue::Scalar(scalar) => write_scalar(out, scalar, format, culture),
        PropertyValue::Structure(structure) => {
            if let Some(tag) = structure.type_tag.as_deref().filter(|t| !t.is_empty()) {
                out.push_str(tag);
                out.push(' ');
            }
            if structure.properties.is_empty() {
                out.push_str("{ }");
                return;
            }
            out.push_str("{ ");
            for (i, (name, value)) in structure.properties.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(name);
                out.push_str(": ");
                write_value(out, value, format, culture);
            }
            out.push_str(" }");
        }
        PropertyValue::Sequence(elements) => {
            out.push('[');
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, element, format, culture);
            }
            out.push(']');
        }
        PropertyValue::KeyedMap(entries) => {
            out.push('[');
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('(');
                write_scalar(out, key, None, culture);
                out.push_str(": ");
                write_value(out, value, format, culture);
                out.push(')');
            }
            out.push(']');
        }
    }
}

fn write_scalar(out: &mut String, scalar: &Scalar, format: Option<&str>, culture: &Culture) {
    let number = match scalar {
        Scalar::Null => return out.push_str("null"),
        Scalar::Bool(b) => return out.push_str(if *b { "true" } else { "false" }),
        Scalar::String(s) if format == Some("l") => return out.push_str(s),
        Scalar::String(s) => return write_quoted(out, s),
        Scalar::Int(i) => Number::Int(i128::from(*i)),
        Scalar::UInt(u) => Number::Int(i128::from(*u)),
        Scalar::Float(x) => Number::Float(*x),
    };
    out.push_str(&format_number(number, format, culture));
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

fn write_aligned(out: &mut String, text: &str, alignment: Option<Alignment>) {
    let Some(alignment) = alignment else {
        out.push_str(text);
        return;
    };
    let padding = alignment.width.saturating_sub(text.chars().count());
    if alignment.left {
        out.push_str(text);
        out.extend(std::iter::repeat_n(' ', padding));
    } else {
        out.extend(std::iter::repeat_n(' ', padding));
        out.push_str(text);
    }
}
