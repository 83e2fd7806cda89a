//! Sign Schemas
//!
//! Two deployed networks share this curve core but disagree on the hash
//! family and on how private key bytes are fed to it:
//!
//! - `Sha3`: SHA3-512 over the key bytes as given
//! - `KeccakReversedKey`: legacy Keccak-512 over the private key bytes
//!   in reversed order
//!
//! The two produce unrelated key pairs and signatures from identical
//! seed bytes, so every key and signature operation takes the schema as
//! an explicit parameter. There is no ambient default.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak512, Sha3_512};

/// Hash schema selecting the network flavor of every derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignSchema {
    /// SHA3-512, private key bytes in natural order
    Sha3,
    /// Keccak-512, private key bytes reversed before hashing
    KeccakReversedKey,
}

impl SignSchema {
    /// Hash a sequence of byte slices into a 64-byte digest with this
    /// schema's hash function.
    pub fn hash_parts(&self, parts: &[&[u8]]) -> [u8; 64] {
        let mut digest = [0u8; 64];
        match self {
            Self::Sha3 => {
                let mut hasher = Sha3_512::new();
                for part in parts {
                    hasher.update(part);
                }
                digest.copy_from_slice(&hasher.finalize());
            }
            Self::KeccakReversedKey => {
                let mut hasher = Keccak512::new();
                for part in parts {
                    hasher.update(part);
                }
                digest.copy_from_slice(&hasher.finalize());
            }
        }
        digest
    }

    /// Digest a private key according to the schema. The byte reversal
    /// applies only here, never to message or nonce hashing.
    pub fn hash_private_key(&self, key: &[u8; 32]) -> [u8; 64] {
        match self {
            Self::Sha3 => self.hash_parts(&[key]),
            Self::KeccakReversedKey => {
                let mut reversed = *key;
                reversed.reverse();
                self.hash_parts(&[&reversed])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::bytes_to_hex;

    #[test]
    fn test_sha3_empty_digest() {
        let digest = SignSchema::Sha3.hash_parts(&[]);
        assert_eq!(
            bytes_to_hex(&digest),
            "a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a6\
             15b2123af1f5f94c11e3e9402c3ac558f500199d95b6d3e301758586281dcd26"
        );
    }

    #[test]
    fn test_keccak_empty_digest() {
        let digest = SignSchema::KeccakReversedKey.hash_parts(&[]);
        assert_eq!(
            bytes_to_hex(&digest),
            "0eab42de4c3ceb9235fc91acffe746b29c29a8c366b7c60e4e67c466f36a4304\
             c00fa9caf9d87976ba469bcbe06713b435f091ef2769fb160cdab33d3670680e"
        );
    }

    #[test]
    fn test_private_key_reversal_only_in_legacy_schema() {
        let mut key = [0u8; 32];
        key[0] = 1;
        let mut reversed = key;
        reversed.reverse();

        assert_eq!(
            SignSchema::KeccakReversedKey.hash_private_key(&key),
            SignSchema::KeccakReversedKey.hash_parts(&[&reversed])
        );
        assert_eq!(
            SignSchema::Sha3.hash_private_key(&key),
            SignSchema::Sha3.hash_parts(&[&key])
        );
    }

    #[test]
    fn test_schemas_disagree() {
        let key = [7u8; 32];
        assert_ne!(
            SignSchema::Sha3.hash_private_key(&key),
            SignSchema::KeccakReversedKey.hash_private_key(&key)
        );
    }

    #[test]
    fn test_schema_serde_roundtrip() {
        let json = serde_json::to_string(&SignSchema::KeccakReversedKey).unwrap();
        let back: SignSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SignSchema::KeccakReversedKey);
    }

    #[test]
    fn test_multi_part_hashing_is_concatenation() {
        let a = SignSchema::Sha3.hash_parts(&[b"ab", b"cd"]);
        let b = SignSchema::Sha3.hash_parts(&[b"abcd"]);
        assert_eq!(a, b);
    }
}
