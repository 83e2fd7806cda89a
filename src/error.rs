//! Unified error types for the crypto core
//!
//! All failures in this crate are local and recoverable: a caller that
//! hits one of these rejects the offending input and moves on. Nothing
//! here panics in non-test code.

use serde::{Deserialize, Serialize};

/// Errors produced by the crypto core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CryptoError {
    /// Malformed or non-canonical 32-byte point / scalar encoding
    InvalidEncoding(String),
    /// Private or public key material with a byte length other than 32
    InvalidKeyLength(String),
    /// Structurally malformed signature
    InvalidSignature(String),
    /// Ciphertext too short, or authentication failed. Deliberately carries
    /// no detail: callers must not be able to tell the two apart.
    DecryptionFailure,
    /// Malformed hex input at an API boundary
    HexParse(String),
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEncoding(s) => write!(f, "Invalid encoding: {}", s),
            Self::InvalidKeyLength(s) => write!(f, "Invalid key length: {}", s),
            Self::InvalidSignature(s) => write!(f, "Invalid signature: {}", s),
            Self::DecryptionFailure => write!(f, "Decryption failed"),
            Self::HexParse(s) => write!(f, "Hex parse error: {}", s),
        }
    }
}

impl std::error::Error for CryptoError {}

impl From<hex::FromHexError> for CryptoError {
    fn from(e: hex::FromHexError) -> Self {
        CryptoError::HexParse(e.to_string())
    }
}

/// Result type alias for crypto operations
pub type CryptoResult<T> = Result<T, CryptoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = CryptoError::InvalidEncoding("not a curve point".into());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("InvalidEncoding"));
        assert!(json.contains("not a curve point"));
    }

    #[test]
    fn test_decryption_failure_is_opaque() {
        let msg = CryptoError::DecryptionFailure.to_string();
        assert_eq!(msg, "Decryption failed");
    }

    #[test]
    fn test_hex_error_conversion() {
        let err: CryptoError = hex::decode("zz").unwrap_err().into();
        assert!(matches!(err, CryptoError::HexParse(_)));
    }
}
