//! Reader for the compact log event format: one JSON object per line, with
//! reserved fields under `@`-prefixed keys.

use std::io::BufRead;

use serde_json::{Map, Value};

use crate::error::{BridgeError, Result};
use crate::ids::{SpanId, TraceId};
use crate::model::event::{ExceptionInfo, LogEvent};
use crate::model::level::Level;
use crate::model::value::{PropertyValue, Scalar, StructureValue};
use crate::template::MessageTemplate;
use crate::time::parse_timestamp;

const TYPE_TAG_KEY: &str = "$type";

pub fn parse_line(line: &str) -> Result<LogEvent> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| BridgeError::Parse(format!("invalid JSON: {e}")))?;
    from_json(value)
}

pub fn from_json(value: Value) -> Result<LogEvent> {
    let Value::Object(fields) = value else {
        return Err(BridgeError::Parse(
            "log event must be a JSON object".to_string(),
        ));
    };

    let mut timestamp = None;
    let mut template = None;
    let mut message = None;
    let mut level = Level::Information;
    let mut exception = None;
    let mut trace_id = None;
    let mut span_id = None;
    let mut properties = Vec::new();

    for (key, value) in fields {
        if let Some(escaped) = key.strip_prefix("@@") {
            properties.push((format!("@{escaped}"), value));
            continue;
        }
        match key.as_str() {
            "@t" => timestamp = Some(parse_timestamp(require_str(&key, &value)?)?),
            "@mt" => template = Some(MessageTemplate::parse(require_str(&key, &value)?)),
            "@m" => message = Some(require_str(&key, &value)?.to_string()),
            "@l" => level = require_str(&key, &value)?.parse()?,
            "@x" => exception = Some(ExceptionInfo::parse(require_str(&key, &value)?)),
            "@tr" => trace_id = Some(TraceId::parse(require_str(&key, &value)?)?),
            "@sp" => span_id = Some(SpanId::parse(require_str(&key, &value)?)?),
            "@i" | "@r" => {}
            reserved if reserved.starts_with('@') => {
                return Err(BridgeError::Parse(format!(
                    "unsupported reserved field: {reserved}"
                )));
            }
            _ => properties.push((key, value)),
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| BridgeError::Parse("missing @t timestamp".to_string()))?;
    let template = template
        .or_else(|| message.map(|m| MessageTemplate::parse(&MessageTemplate::escape(&m))))
        .unwrap_or_default();

    let mut event = LogEvent::new(timestamp, level, template);
    event.trace_id = trace_id;
    event.span_id = span_id;
    event.exception = exception;
    for (name, value) in properties {
        event.properties.insert(name, json_to_property(value));
    }
    Ok(event)
}

/// Reads events line by line, skipping blank lines. Each item carries its
/// 1-based line number so callers can report and skip malformed input.
pub fn read_events<R: BufRead>(reader: R) -> impl Iterator<Item = (usize, Result<LogEvent>)> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some((index + 1, parse_line(&line))),
            Err(e) => Some((index + 1, Err(e.into()))),
        })
}

pub fn json_to_property(value: Value) -> PropertyValue {
    match value {
        Value::Null => PropertyValue::Scalar(Scalar::Null),
        Value::Bool(b) => PropertyValue::Scalar(Scalar::Bool(b)),
        Value::Number(n) => PropertyValue::Scalar(if let Some(i) = n.as_i64() {
            Scalar::Int(i)
        } else if let Some(u) = n.as_u64() {
            Scalar::UInt(u)
        } else {
            Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
        }),
        Value::String(s) => PropertyValue::Scalar(Scalar::String(s)),
        Value::Array(items) => {
            PropertyValue::Sequence(items.into_iter().map(json_to_property).collect())
        }
        Value::Object(fields) => PropertyValue::Structure(object_to_structure(fields)),
    }
}

fn object_to_structure(fields: Map<String, Value>) -> StructureValue {
    let mut structure = StructureValue::default();
    for (name, value) in fields {
        match value {
            Value::String(tag) if name == TYPE_TAG_KEY && structure.type_tag.is_none() => {
                structure.type_tag = Some(tag);
            }
            value => structure.properties.push((name, json_to_property(value))),
        }
    }
    structure
}

fn require_str<'a>(key: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| BridgeError::Parse(format!("{key} must be a string")))
}
