use logbridge_core::model::{AttributeList, ConvertedValue, OutputRecord, Scalar};
use logbridge_core::time::unix_nanos;
use opentelemetry_proto::tonic::common::v1::any_value::Value;
use opentelemetry_proto::tonic::common::v1::{AnyValue, ArrayValue, KeyValue, KeyValueList};
use opentelemetry_proto::tonic::logs::v1::LogRecord as OtlpLogRecord;

pub fn encode_record(record: &OutputRecord, attributes: &AttributeList) -> OtlpLogRecord {
    let time_unix_nano = unix_nanos(&record.timestamp);

    OtlpLogRecord {
        time_unix_nano,
        observed_time_unix_nano: time_unix_nano,
        severity_number: record.severity.number(),
        severity_text: record.severity_text.clone().unwrap_or_default(),
        body: record.body.as_ref().map(|body| string_value(body.clone())),
        attributes: attributes
            .iter()
            .map(|attr| key_value(&attr.key, &attr.value))
            .collect(),
        trace_id: record
            .trace_id
            .as_ref()
            .map(|id| id.to_bytes())
            .unwrap_or_default(),
        span_id: record
            .span_id
            .as_ref()
            .map(|id| id.to_bytes())
            .unwrap_or_default(),
        ..Default::default()
    }
}

pub fn key_value(key: &str, value: &ConvertedValue) -> KeyValue {
    KeyValue {
        key: key.to_string(),
        value: Some(to_any_value(value)),
    }
}

pub fn to_any_value(value: &ConvertedValue) -> AnyValue {
    let value = match value {
        ConvertedValue::Primitive(scalar) => scalar_value(scalar),
        ConvertedValue::Map(map) => Some(Value::KvlistValue(KeyValueList {
            values: map.iter().map(|(k, v)| key_value(k, v)).collect(),
        })),
        ConvertedValue::List(items) => Some(Value::ArrayValue(ArrayValue {
            values: items.iter().map(to_any_value).collect(),
        })),
        ConvertedValue::Opaque(other) => Some(Value::StringValue(other.to_string())),
    };
    AnyValue { value }
}

fn scalar_value(scalar: &Scalar) -> Option<Value> {
    match scalar {
        Scalar::Null => None,
        Scalar::Bool(b) => Some(Value::BoolValue(*b)),
        Scalar::Int(i) => Some(Value::IntValue(*i)),
        // Values past i64::MAX keep their exact digits as text.
        Scalar::UInt(u) => Some(match i64::try_from(*u) {
            Ok(i) => Value::IntValue(i),
            Err(_) => Value::StringValue(u.to_string()),
        }),
        Scalar::Float(x) => Some(Value::DoubleValue(*x)),
        Scalar::String(s) => Some(Value::StringValue(s.clone())),
    }
}

fn string_value(text: String) -> AnyValue {
    AnyValue {
        value: Some(Value::StringValue(text)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use indexmap::IndexMap;
    use logbridge_core::ids::{SpanId, TraceId};
    use logbridge_core::model::{PropertyValue, Severity};

    use super::*;

    #[test]
    fn encodes_record_fields() {
        let record = OutputRecord {
            timestamp: Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap(),
            severity: Severity::Error,
            severity_text: Some("Error".to_string()),
            body: Some("boom".to_string()),
            trace_id: Some(TraceId::parse("4bf92f3577b34da6a3ce929d0e0e4736").unwrap()),
            span_id: Some(SpanId::parse("00f067aa0ba902b7").unwrap()),
        };
        let mut attributes = AttributeList::new();
        attributes.add("peer", "redis:6379");

        let log = encode_record(&record, &attributes);
        assert_eq!(log.time_unix_nano, 1_700_000_000_000_000_000);
        assert_eq!(log.severity_number, 17);
        assert_eq!(log.severity_text, "Error");
        assert_eq!(
            log.body.and_then(|b| b.value),
            Some(Value::StringValue("boom".to_string()))
        );
        assert_eq!(log.trace_id.len(), 16);
        assert_eq!(log.span_id, vec![0x00, 0xf0, 0x67, 0xaa, 0x0b, 0xa9, 0x02, 0xb7]);
        assert_eq!(log.attributes.len(), 1);
        assert_eq!(log.attributes[0].key, "peer");
    }

    #[test]
    fn unset_fields_stay_empty() {
        let log = encode_record(&OutputRecord::default(), &AttributeList::new());
        assert_eq!(log.severity_number, 0);
        assert!(log.body.is_none());
        assert!(log.trace_id.is_empty());
        assert!(log.span_id.is_empty());
    }

    #[test]
    fn nested_values_become_kvlists_and_arrays() {
        let mut map = IndexMap::new();
        map.insert("$type".to_string(), ConvertedValue::from("Point"));
        map.insert(
            "xs".to_string(),
            ConvertedValue::List(vec![
                ConvertedValue::Primitive(Scalar::Int(1)),
                ConvertedValue::Primitive(Scalar::Null),
            ]),
        );

        let Some(Value::KvlistValue(kvlist)) = to_any_value(&ConvertedValue::Map(map)).value
        else {
            panic!("expected kvlist");
        };
        assert_eq!(kvlist.values[0].key, "$type");
        let Some(Value::ArrayValue(array)) = kvlist.values[1]
            .value
            .as_ref()
            .and_then(|v| v.value.clone())
        else {
            panic!("expected array");
        };
        assert_eq!(array.values.len(), 2);
        assert_eq!(array.values[0].value, Some(Value::IntValue(1)));
        assert_eq!(array.values[1].value, None);
    }

    #[test]
    fn large_unsigned_and_opaque_values_become_text() {
        assert_eq!(
            to_any_value(&ConvertedValue::Primitive(Scalar::UInt(u64::MAX))).value,
            Some(Value::StringValue(u64::MAX.to_string()))
        );
        assert_eq!(
            to_any_value(&ConvertedValue::Primitive(Scalar::UInt(7))).value,
            Some(Value::IntValue(7))
        );
        let opaque = ConvertedValue::Opaque(PropertyValue::sequence([PropertyValue::from("a")]));
        assert_eq!(
            to_any_value(&opaque).value,
            Some(Value::StringValue("[\"a\"]".to_string()))
        );
    }
}
