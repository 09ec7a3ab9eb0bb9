use chrono::Utc;
use logbridge_core::model::{
    AttributeList, ConvertedValue, LogEvent, OutputRecord, PropertyValue, Scalar,
    SOURCE_CONTEXT_PROPERTY,
};
use logbridge_core::render::{render_clean, render_token};
use logbridge_core::{Culture, IncludedData};
use tracing::debug;

use crate::hash::md5_hash;
use crate::semconv;
use crate::severity::to_severity;
use crate::value::convert_value;

/// Converts one event into an output record, its attributes, and the scope
/// name taken from `SourceContext` when present.
pub fn to_log_record(
    event: &LogEvent,
    culture: Option<&Culture>,
    included: IncludedData,
) -> (OutputRecord, AttributeList, Option<String>) {
    let mut record = OutputRecord::default();
    let mut attributes = AttributeList::new();

    let scope_name = process_properties(&mut attributes, event, included);
    process_timestamp(&mut record, event);
    process_body(&mut record, event, culture, included);
    process_level(&mut record, event);
    process_exception(&mut attributes, event);
    process_included_fields(&mut record, &mut attributes, event, included);

    (record, attributes, scope_name)
}

/// Appends converted properties in source order and returns the scope name.
pub fn process_properties(
    attributes: &mut AttributeList,
    event: &LogEvent,
    included: IncludedData,
) -> Option<String> {
    let mut scope_name = None;

    for (name, value) in &event.properties {
        if name == SOURCE_CONTEXT_PROPERTY {
            if let PropertyValue::Scalar(Scalar::String(context)) = value {
                scope_name = Some(context.clone());
                if !included.source_context_attribute() {
                    continue;
                }
            } else {
                debug!(
                    property = %name,
                    "source context is not a string; keeping it as an attribute"
                );
            }
        }
        attributes.add(name.clone(), convert_value(value, included));
    }

    scope_name
}

pub fn process_timestamp(record: &mut OutputRecord, event: &LogEvent) {
    record.timestamp = event.timestamp.with_timezone(&Utc);
}

pub fn process_body(
    record: &mut OutputRecord,
    event: &LogEvent,
    culture: Option<&Culture>,
    included: IncludedData,
) {
    if included.template_body() {
        let text = event.message_template.text();
        if !text.trim().is_empty() {
            record.body = Some(text.to_string());
        }
        return;
    }

    let rendered = render_clean(&event.message_template, &event.properties, culture);
    if !rendered.trim().is_empty() {
        record.body = Some(rendered);
    }
}

pub fn process_level(record: &mut OutputRecord, event: &LogEvent) {
    record.severity = to_severity(event.level);
    record.severity_text = Some(event.level.to_string());
}

pub fn process_exception(attributes: &mut AttributeList, event: &LogEvent) {
    let Some(exception) = &event.exception else {
        return;
    };

    let fields = [
        (semconv::EXCEPTION_TYPE, &exception.type_name),
        (semconv::EXCEPTION_MESSAGE, &exception.message),
        (semconv::EXCEPTION_STACKTRACE, &exception.full_text),
    ];
    for (key, text) in fields {
        if !text.is_empty() {
            attributes.add(key, text.as_str());
        }
    }
}

pub fn process_included_fields(
    record: &mut OutputRecord,
    attributes: &mut AttributeList,
    event: &LogEvent,
    included: IncludedData,
) {
    if included.trace_id_field() {
        if let Some(trace_id) = &event.trace_id {
            record.trace_id = Some(trace_id.clone());
        }
    }

    if included.span_id_field() {
        if let Some(span_id) = &event.span_id {
            record.span_id = Some(span_id.clone());
        }
    }

    let template = &event.message_template;

    if included.message_template_text_attribute() {
        attributes.add(semconv::MESSAGE_TEMPLATE_TEXT, template.text());
    }

    if included.message_template_md5_hash_attribute() {
        attributes.add(semconv::MESSAGE_TEMPLATE_MD5_HASH, md5_hash(template.text()));
    }

    if included.message_template_renderings_attribute() {
        // Renderings are always produced with the invariant culture.
        let renderings: Vec<_> = template
            .property_tokens()
            .filter(|token| token.format.is_some())
            .map(|token| ConvertedValue::from(render_token(token, &event.properties, None)))
            .collect();
        if !renderings.is_empty() {
            attributes.add(
                semconv::MESSAGE_TEMPLATE_RENDERINGS,
                ConvertedValue::List(renderings),
            );
        }
    }
}
