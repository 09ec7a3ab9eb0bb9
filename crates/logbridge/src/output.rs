use std::io::Write;

use chrono::SecondsFormat;
use logbridge_convert::LogSink;
use logbridge_core::model::{AttributeList, ConvertedValue, OutputRecord, Scalar, Severity};
use logbridge_core::{BridgeError, IncludedData, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Json,
    Human { color: bool },
}

/// Writes one line per record, as JSON or as a human-readable summary.
pub struct LineSink<W: Write> {
    out: W,
    style: LineStyle,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    #[serde(flatten)]
    record: &'a OutputRecord,
    severity_number: i32,
    scope: Option<&'a str>,
    attributes: &'a AttributeList,
}

impl<W: Write> LineSink<W> {
    pub fn new(out: W, style: LineStyle) -> Self {
        Self { out, style }
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> LogSink for LineSink<W> {
    fn emit(
        &mut self,
        record: OutputRecord,
        attributes: AttributeList,
        scope_name: Option<String>,
    ) -> Result<()> {
        let line = match self.style {
            LineStyle::Json => serde_json::to_string(&JsonLine {
                record: &record,
                severity_number: record.severity.number(),
                scope: scope_name.as_deref(),
                attributes: &attributes,
            })
            .map_err(|e| BridgeError::Io(format!("encode record: {e}")))?,
            LineStyle::Human { color } => {
                human_line(&record, &attributes, scope_name.as_deref(), color)
            }
        };
        writeln!(self.out, "{line}")?;
        Ok(())
    }
}

pub fn human_line(
    record: &OutputRecord,
    attributes: &AttributeList,
    scope: Option<&str>,
    color: bool,
) -> String {
    let ts = record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
    let label = record.severity.label();
    let sev = if color {
        colored_severity(record.severity, label)
    } else {
        label.to_string()
    };
    let scope = scope.filter(|s| !s.is_empty()).unwrap_or("-");
    let scope = if color {
        scope.cyan().to_string()
    } else {
        scope.to_string()
    };

    let mut line = format!(
        "{ts} {sev} {scope} | {}",
        record.body.as_deref().unwrap_or_default()
    );
    if let Some(trace) = &record.trace_id {
        let span = record.span_id.as_ref().map(|s| s.as_str()).unwrap_or("-");
        line.push_str(&format!(" trace={trace} span={span}"));
    }
    for attr in attributes {
        line.push_str(&format!(" {}={}", attr.key, attr_text(&attr.value)));
    }
    line
}

fn colored_severity(severity: Severity, label: &str) -> String {
    match severity {
        Severity::Trace => label.blue().to_string(),
        Severity::Debug => label.bright_black().to_string(),
        Severity::Info => label.green().to_string(),
        Severity::Warn => label.yellow().to_string(),
        Severity::Error => label.red().to_string(),
        Severity::Fatal => label.magenta().to_string(),
        Severity::Unspecified => label.to_string(),
    }
}

fn attr_text(value: &ConvertedValue) -> String {
    match value {
        ConvertedValue::Primitive(Scalar::String(s)) => s.clone(),
        ConvertedValue::Primitive(other) => other.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

pub fn print_flags_human(effective: IncludedData) {
    for (name, flag) in IncludedData::FLAGS {
        let state = if effective.contains(flag) { "on" } else { "off" };
        println!("{name:<40} {state}");
    }
    println!("-- effective: {effective} --");
}

pub fn flags_json(effective: IncludedData) -> serde_json::Value {
    let flags: Vec<_> = IncludedData::FLAGS
        .iter()
        .map(|(name, flag)| {
            serde_json::json!({
                "name": name,
                "bit": flag.bits(),
                "enabled": effective.contains(*flag),
            })
        })
        .collect();
    serde_json::json!({
        "effective": effective.to_string(),
        "flags": flags,
    })
}
