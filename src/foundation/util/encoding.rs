use crate::foundation::{CeremonyError, Hash32};

/// Parses a 64-character hex string (optionally `0x`-prefixed) into 32 bytes.
pub fn parse_hex_32bytes(value: &str) -> Result<Hash32, CeremonyError> {
    let trimmed = value.trim_start_matches("0x").trim_start_matches("0X");
    let decoded = hex::decode(trimmed)?;
    decoded
        .as_slice()
        .try_into()
        .map_err(|_| CeremonyError::MalformedKey { context: "hex decode", details: format!("expected 32 bytes, got {}", decoded.len()) })
}
