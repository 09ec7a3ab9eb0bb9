use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use crate::error::{BridgeError, Result};

/// Parses an RFC 3339 timestamp. Text without an offset is taken as UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts);
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc().fixed_offset());
    }

    Err(BridgeError::Parse(format!(
        "expected RFC3339 timestamp, got {input}"
    )))
}

/// Nanoseconds since the unix epoch, clamped at zero.
pub fn unix_nanos(ts: &DateTime<Utc>) -> u64 {
    ts.timestamp_nanos_opt()
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0)
}
