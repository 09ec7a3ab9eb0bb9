use indexmap::IndexMap;
use logbridge_core::config::Config;
use logbridge_core::model::{AttributeList, ConvertedValue, Level, LogEvent, OutputRecord};
use logbridge_core::{Culture, IncludedData, Result};
use opentelemetry_proto::tonic::collector::logs::v1::ExportLogsServiceRequest;
use opentelemetry_proto::tonic::common::v1::InstrumentationScope;
use opentelemetry_proto::tonic::logs::v1::{LogRecord as OtlpLogRecord, ResourceLogs, ScopeLogs};
use opentelemetry_proto::tonic::resource::v1::Resource;
use prost::Message;
use tracing::trace;

use crate::otlp::{encode_record, key_value};
use crate::record::to_log_record;
use crate::semconv;

/// Receives converted records. Transport, batching and retry live behind
/// this trait.
pub trait LogSink {
    fn emit(
        &mut self,
        record: OutputRecord,
        attributes: AttributeList,
        scope_name: Option<String>,
    ) -> Result<()>;
}

pub type ConvertedRecord = (OutputRecord, AttributeList, Option<String>);

impl LogSink for Vec<ConvertedRecord> {
    fn emit(
        &mut self,
        record: OutputRecord,
        attributes: AttributeList,
        scope_name: Option<String>,
    ) -> Result<()> {
        self.push((record, attributes, scope_name));
        Ok(())
    }
}

/// Collects records into one OTLP export request, one `ScopeLogs` per scope
/// name in first-seen order.
#[derive(Debug, Clone)]
pub struct OtlpBatch {
    service_name: String,
    scopes: IndexMap<String, Vec<OtlpLogRecord>>,
}

impl OtlpBatch {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            scopes: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.scopes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn scope_names(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }

    pub fn into_request(self) -> ExportLogsServiceRequest {
        let resource = Resource {
            attributes: vec![key_value(
                semconv::SERVICE_NAME,
                &ConvertedValue::from(self.service_name),
            )],
            ..Default::default()
        };

        let scope_logs = self
            .scopes
            .into_iter()
            .map(|(name, log_records)| ScopeLogs {
                scope: Some(InstrumentationScope {
                    name,
                    ..Default::default()
                }),
                log_records,
                ..Default::default()
            })
            .collect();

        ExportLogsServiceRequest {
            resource_logs: vec![ResourceLogs {
                resource: Some(resource),
                scope_logs,
                ..Default::default()
            }],
        }
    }

    /// Protobuf bytes of the export request, as sent over OTLP/HTTP.
    pub fn encode_request(self) -> Vec<u8> {
        self.into_request().encode_to_vec()
    }
}

impl LogSink for OtlpBatch {
    fn emit(
        &mut self,
        record: OutputRecord,
        attributes: AttributeList,
        scope_name: Option<String>,
    ) -> Result<()> {
        let encoded = encode_record(&record, &attributes);
        self.scopes
            .entry(scope_name.unwrap_or_default())
            .or_default()
            .push(encoded);
        Ok(())
    }
}

/// Entry point for a logging frontend: filters events by level, converts
/// them and hands the result to a [`LogSink`].
#[derive(Debug)]
pub struct Bridge<S> {
    sink: S,
    included: IncludedData,
    culture: Option<Culture>,
    min_level: Level,
}

impl<S: LogSink> Bridge<S> {
    pub fn new(sink: S, included: IncludedData) -> Self {
        Self {
            sink,
            included,
            culture: None,
            min_level: Level::Verbose,
        }
    }

    pub fn from_config(sink: S, cfg: &Config) -> Self {
        Self::new(sink, cfg.included_data)
            .with_culture(cfg.culture)
            .with_min_level(cfg.min_level)
    }

    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = Some(culture);
        self
    }

    pub fn with_min_level(mut self, min_level: Level) -> Self {
        self.min_level = min_level;
        self
    }

    pub fn included(&self) -> IncludedData {
        self.included
    }

    /// Returns `false` when the event is below the minimum level.
    pub fn emit(&mut self, event: &LogEvent) -> Result<bool> {
        if event.level < self.min_level {
            trace!(level = %event.level, "event below minimum level");
            return Ok(false);
        }
        let (record, attributes, scope_name) =
            to_log_record(event, self.culture.as_ref(), self.included);
        self.sink.emit(record, attributes, scope_name)?;
        Ok(true)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use logbridge_core::model::Severity;
    use opentelemetry_proto::tonic::common::v1::any_value::Value;
    use testkit::{event_with_context, event_with_template, sample_event};

    use super::*;

    #[test]
    fn bridge_filters_below_min_level() {
        let mut bridge = Bridge::new(Vec::new(), IncludedData::DEFAULT)
            .with_min_level(Level::Information);

        let mut debug = event_with_template("noisy");
        debug.level = Level::Debug;
        assert!(!bridge.emit(&debug).unwrap());
        assert!(bridge.emit(&sample_event()).unwrap());

        let records = bridge.into_sink();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0.severity, Severity::Warn);
    }

    #[test]
    fn bridge_uses_config() {
        let cfg = Config {
            included_data: IncludedData::TEMPLATE_BODY,
            min_level: Level::Error,
            ..Config::default()
        };
        let mut bridge = Bridge::from_config(Vec::new(), &cfg);
        assert_eq!(bridge.included(), IncludedData::TEMPLATE_BODY);

        let mut error = event_with_template("failed {Id}").with_property("Id", 3);
        error.level = Level::Error;
        assert!(bridge.emit(&error).unwrap());
        assert!(!bridge.emit(&sample_event()).unwrap());
        assert_eq!(bridge.sink()[0].0.body.as_deref(), Some("failed {Id}"));
    }

    #[test]
    fn batch_groups_records_by_scope() {
        let mut bridge = Bridge::new(OtlpBatch::new("billing"), IncludedData::DEFAULT);
        bridge.emit(&event_with_context("App.Orders")).unwrap();
        bridge.emit(&sample_event()).unwrap();
        bridge.emit(&event_with_context("App.Orders")).unwrap();

        let batch = bridge.into_sink();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.scope_names().collect::<Vec<_>>(), vec!["App.Orders", ""]);

        let request = batch.into_request();
        assert_eq!(request.resource_logs.len(), 1);
        let resource_logs = &request.resource_logs[0];
        let service = &resource_logs.resource.as_ref().unwrap().attributes[0];
        assert_eq!(service.key, "service.name");
        assert_eq!(
            service.value.as_ref().and_then(|v| v.value.clone()),
            Some(Value::StringValue("billing".to_string()))
        );

        let scopes: Vec<_> = resource_logs
            .scope_logs
            .iter()
            .map(|s| {
                (
                    s.scope.as_ref().map(|scope| scope.name.clone()).unwrap_or_default(),
                    s.log_records.len(),
                )
            })
            .collect();
        assert_eq!(
            scopes,
            vec![("App.Orders".to_string(), 2), (String::new(), 1)]
        );
    }

    #[test]
    fn encoded_request_decodes() {
        let mut batch = OtlpBatch::new("svc");
        batch
            .emit(OutputRecord::default(), AttributeList::new(), Some("A".into()))
            .unwrap();
        let bytes = batch.encode_request();
        let decoded = ExportLogsServiceRequest::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded.resource_logs[0].scope_logs[0].log_records.len(), 1);
    }

    #[test]
    fn empty_batch_has_no_scopes() {
        let batch = OtlpBatch::new("svc");
        assert!(batch.is_empty());
        let request = batch.into_request();
        assert!(request.resource_logs[0].scope_logs.is_empty());
    }
}
