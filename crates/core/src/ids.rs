use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanId(String);

impl TraceId {
    pub fn parse(input: &str) -> Result<Self> {
        if input.len() != 32 || !input.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BridgeError::Parse(format!("invalid trace id: {input}")));
        }
        Ok(Self(input.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        decode_hex(&self.0)
    }
}

impl SpanId {
    pub fn parse(input: &str) -> Result<Self> {
        if input.len() != 16 || !input.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BridgeError::Parse(format!("invalid span id: {input}")));
        }
        Ok(Self(input.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        decode_hex(&self.0)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Both id types only ever hold validated hex.
fn decode_hex(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).unwrap_or_default()
}
