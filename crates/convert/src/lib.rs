pub mod hash;
pub mod otlp;
pub mod record;
pub mod semconv;
pub mod severity;
pub mod sink;
pub mod value;

pub use hash::md5_hash;
pub use record::to_log_record;
pub use severity::{severity_for_ordinal, to_severity};
pub use sink::{Bridge, ConvertedRecord, LogSink, OtlpBatch};
