//! Key Material
//!
//! Private keys, public keys and schema-bound key pairs. Private key
//! bytes are wiped on drop and never appear in debug output. Public key
//! derivation is deterministic per schema: hash the private key, clamp
//! the low half, multiply the basepoint.

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants;
use crate::error::CryptoResult;
use crate::scalar::Scalar;
use crate::schema::SignSchema;
use crate::utils::{bytes_to_hex, hex_to_bytes32};

// MARK: - Private key

/// A 32-byte private key. The bytes themselves carry no schema; the
/// same seed yields different public keys under different schemas.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        Ok(Self(hex_to_bytes32(s)?))
    }

    /// Draw a fresh key from the operating system RNG
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }

    /// Derive the public key for this private key under the given
    /// schema: clamp the low 32 bytes of the schema digest and multiply
    /// the basepoint in constant time.
    pub fn derive_public_key(&self, schema: SignSchema) -> PublicKey {
        let digest = schema.hash_private_key(&self.0);
        let mut low = [0u8; 32];
        low.copy_from_slice(&digest[..32]);
        Scalar::clamp(&mut low);
        let a = Scalar::from_bytes(low);
        let point = constants::basepoint_table().multiply(&a);
        PublicKey(point.encode())
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

// MARK: - Public key

/// A 32-byte encoded curve point. Stored as wire bytes; decoding and
/// validity checks happen where the point is actually used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        Ok(Self(hex_to_bytes32(s)?))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }
}

// MARK: - Key pair

/// A private key bound to the schema it was derived under, with the
/// matching public key.
#[derive(Debug, Clone)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
    schema: SignSchema,
}

impl KeyPair {
    /// Build a key pair from existing private key bytes
    pub fn from_private_key(private: PrivateKey, schema: SignSchema) -> Self {
        let public = private.derive_public_key(schema);
        Self { private, public, schema }
    }

    /// Generate a fresh random key pair for the given schema
    pub fn generate(schema: SignSchema) -> Self {
        Self::from_private_key(PrivateKey::random(), schema)
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn schema(&self) -> SignSchema {
        self.schema
    }
}
