use logbridge_core::model::{Level, Severity};

/// Maps a source level onto the backend severity scale. Levels this table
/// does not know map to [`Severity::Unspecified`].
pub fn to_severity(level: Level) -> Severity {
    match level {
        Level::Verbose => Severity::Trace,
        Level::Debug => Severity::Debug,
        Level::Information => Severity::Info,
        Level::Warning => Severity::Warn,
        Level::Error => Severity::Error,
        Level::Fatal => Severity::Fatal,
        _ => Severity::Unspecified,
    }
}

/// Severity for a raw level ordinal (`0` = Verbose .. `5` = Fatal).
pub fn severity_for_ordinal(ordinal: u8) -> Severity {
    Level::from_ordinal(ordinal)
        .map(to_severity)
        .unwrap_or(Severity::Unspecified)
}
