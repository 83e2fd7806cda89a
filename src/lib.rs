//! # Catapult Crypto
//!
//! Ed25519 primitives for the Catapult and NIS transaction networks:
//!
//! - Field and group arithmetic over 2^255 - 19 with explicit,
//!   representation-tagged curve points
//! - Constant-time fixed-base scalar multiplication from precomputed
//!   window tables, plus a variable-time double-scalar path for
//!   verification
//! - Key generation and public key derivation under two network hash
//!   schemas: SHA3-512 and legacy Keccak-512 with reversed key bytes
//! - Deterministic signatures with strict canonical verification
//! - ECDH shared secrets and AES-256-GCM message encryption
//!
//! The schema is always an explicit parameter. Identical private key
//! bytes produce unrelated identities on the two networks, and nothing
//! in this crate picks a network for you.
//!
//! ## Example
//!
//! ```
//! use catapult_crypto::{sign, verify, KeyPair, SignSchema};
//!
//! let pair = KeyPair::generate(SignSchema::Sha3);
//! let signature = sign(pair.private_key(), SignSchema::Sha3, b"transfer").unwrap();
//! assert!(verify(pair.public_key(), SignSchema::Sha3, b"transfer", &signature));
//! ```

pub mod cipher;
pub mod constants;
pub mod error;
pub mod field;
pub mod group;
pub mod keys;
pub mod scalar;
pub mod schema;
pub mod signer;
pub mod table;
pub mod utils;

pub use cipher::{
    decrypt_message, derive_shared_key, derive_shared_secret, encrypt_message,
    PERSISTENT_DELEGATION_MARKER,
};
pub use error::{CryptoError, CryptoResult};
pub use field::FieldElement;
pub use group::GroupElement;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use scalar::{Scalar, GROUP_ORDER};
pub use schema::SignSchema;
pub use signer::{sign, sign_with_public_key, verify, Signature};
pub use table::{
    double_scalar_multiply_vartime, DoubleScalarMultiplicationTable, ScalarMultiplicationTable,
};
