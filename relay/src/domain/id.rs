//! Trace and span identifiers
//!
//! Capture files carry identifiers as lowercase hex strings; the collector
//! wants raw bytes. Both live here as fixed-size byte arrays so a record
//! with a bad identifier is rejected at decode time, not at export time.

use std::fmt;

use thiserror::Error;

/// Identifier that failed hex decoding
#[derive(Error, Debug, PartialEq)]
pub enum IdentityError {
    #[error("expected {expected} hex characters, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// 16-byte trace identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId([u8; 16]);

impl TraceId {
    /// Decode from a 32-character hex string
    pub fn from_hex(s: &str) -> Result<Self, IdentityError> {
        let mut bytes = [0u8; 16];
        decode_exact(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// 8-byte span identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanId([u8; 8]);

impl SpanId {
    /// Decode from a 16-character hex string
    pub fn from_hex(s: &str) -> Result<Self, IdentityError> {
        let mut bytes = [0u8; 8];
        decode_exact(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn decode_exact(s: &str, out: &mut [u8]) -> Result<(), IdentityError> {
    let expected = out.len() * 2;
    if s.len() != expected {
        return Err(IdentityError::Length {
            expected,
            actual: s.len(),
        });
    }
    hex::decode_to_slice(s, out)?;
    Ok(())
}
