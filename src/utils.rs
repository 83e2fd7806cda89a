//! Hex Utilities
//!
//! Hex <-> byte conversion used at API boundaries. Decoding tolerates
//! either case; encoding is lowercase. Malformed input fails with a
//! parse error rather than truncating.

use crate::error::{CryptoError, CryptoResult};

/// Decode a hex string (upper or lower case) into bytes
pub fn hex_to_bytes(s: &str) -> CryptoResult<Vec<u8>> {
    Ok(hex::decode(s)?)
}

/// Decode a hex string into a fixed 32-byte array
pub fn hex_to_bytes32(s: &str) -> CryptoResult<[u8; 32]> {
    let bytes = hex::decode(s)?;
    if bytes.len() != 32 {
        return Err(CryptoError::InvalidKeyLength(format!(
            "Expected 32 bytes, got {}",
            bytes.len()
        )));
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Encode bytes as a lowercase hex string
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
