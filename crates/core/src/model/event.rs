use chrono::{DateTime, FixedOffset};

use crate::ids::{SpanId, TraceId};
use crate::model::level::Level;
use crate::model::value::{Properties, PropertyValue};
use crate::template::MessageTemplate;

/// Property carrying the logical component that emitted an event.
pub const SOURCE_CONTEXT_PROPERTY: &str = "SourceContext";

#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<FixedOffset>,
    pub level: Level,
    pub message_template: MessageTemplate,
    pub properties: Properties,
    pub trace_id: Option<TraceId>,
    pub span_id: Option<SpanId>,
    pub exception: Option<ExceptionInfo>,
}

impl LogEvent {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        level: Level,
        message_template: MessageTemplate,
    ) -> Self {
        Self {
            timestamp,
            level,
            message_template,
            properties: Properties::new(),
            trace_id: None,
            span_id: None,
            exception: None,
        }
    }

    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_trace_context(mut self, trace_id: TraceId, span_id: Option<SpanId>) -> Self {
        self.trace_id = Some(trace_id);
        self.span_id = span_id;
        self
    }

    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }
}

/// Exception attached to an event, reduced to its textual parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    pub type_name: String,
    pub message: String,
    /// Complete rendering including the stack trace.
    pub full_text: String,
}

impl ExceptionInfo {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let message = message.into();
        let full_text = if message.is_empty() {
            type_name.clone()
        } else {
            format!("{type_name}: {message}")
        };
        Self {
            type_name,
            message,
            full_text,
        }
    }

    pub fn with_stack_trace(mut self, stack_trace: &str) -> Self {
        if !stack_trace.is_empty() {
            self.full_text.push('\n');
            self.full_text.push_str(stack_trace);
        }
        self
    }

    /// Recovers type and message from text shaped like `Type: message\n   at ...`.
    pub fn parse(text: &str) -> Self {
        let first_line = text.lines().next().unwrap_or_default().trim_end();
        let (type_name, message) = match first_line.split_once(": ") {
            Some((type_name, message)) if !type_name.contains(char::is_whitespace) => {
                // Inner exceptions follow on the same line after ` ---> `.
                let message = message.split(" ---> ").next().unwrap_or_default();
                (type_name.to_string(), message.to_string())
            }
            _ => (first_line.to_string(), String::new()),
        };
        Self {
            type_name,
            message,
            full_text: text.to_string(),
        }
    }
}
