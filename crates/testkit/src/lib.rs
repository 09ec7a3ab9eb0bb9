use chrono::{DateTime, FixedOffset, TimeZone};
use logbridge_core::MessageTemplate;
use logbridge_core::ids::{SpanId, TraceId};
use logbridge_core::model::{LogEvent, Level, PropertyValue, SOURCE_CONTEXT_PROPERTY};

pub const SAMPLE_TRACE_ID: &str = "4bf92f3577b34da6a3ce929d0e0e4736";
pub const SAMPLE_SPAN_ID: &str = "00f067aa0ba902b7";

pub fn sample_timestamp() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2026, 2, 1, 10, 30, 0)
        .unwrap()
}

pub fn event_with_template(template: &str) -> LogEvent {
    LogEvent::new(
        sample_timestamp(),
        Level::Information,
        MessageTemplate::parse(template),
    )
}

pub fn event_with_context(source_context: &str) -> LogEvent {
    event_with_template("log message").with_property(SOURCE_CONTEXT_PROPERTY, source_context)
}

/// Warning event with a structured payload, trace context and one string
/// property referenced from the template.
pub fn sample_event() -> LogEvent {
    let mut event = event_with_template("Order {OrderId} shipped to {@Address}")
        .with_property("OrderId", 1042)
        .with_property(
            "Address",
            PropertyValue::structure(
                Some("Address"),
                [
                    ("Street", PropertyValue::from("1 Main St")),
                    ("Zip", PropertyValue::from("12345")),
                ],
            ),
        )
        .with_property(
            "Tags",
            PropertyValue::sequence([PropertyValue::from("express"), PropertyValue::from(2)]),
        )
        .with_trace_context(
            TraceId::parse(SAMPLE_TRACE_ID).unwrap(),
            Some(SpanId::parse(SAMPLE_SPAN_ID).unwrap()),
        );
    event.level = Level::Warning;
    event
}
