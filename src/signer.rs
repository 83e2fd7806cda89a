//! Signing and Verification
//!
//! Deterministic Ed25519-style signatures, parameterized by schema.
//! The nonce is the schema hash of the private key's upper half and the
//! message, so no signing randomness is required and the same input
//! always produces the same signature.
//!
//! Verification is strict: the S half must be a canonical non-zero
//! scalar and the public key must decode to a valid point outside the
//! small-order subgroup. The expensive step is the variable-time
//! two-exponent check R == S·B - k·A, which only touches public data.

use subtle::ConstantTimeEq;

use crate::constants;
use crate::error::{CryptoError, CryptoResult};
use crate::group::GroupElement;
use crate::keys::{PrivateKey, PublicKey};
use crate::scalar::Scalar;
use crate::schema::SignSchema;
use crate::table::double_scalar_multiply_vartime;
use crate::utils::{bytes_to_hex, hex_to_bytes};

/// A 64-byte signature: the encoded nonce point R followed by the
/// scalar S.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    pub fn from_bytes(bytes: &[u8; 64]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Self { r, s }
    }

    pub fn from_hex(hex: &str) -> CryptoResult<Self> {
        let bytes = hex_to_bytes(hex)?;
        if bytes.len() != 64 {
            return Err(CryptoError::InvalidSignature(format!(
                "Expected 64 bytes, got {}",
                bytes.len()
            )));
        }
        let mut wire = [0u8; 64];
        wire.copy_from_slice(&bytes);
        Ok(Self::from_bytes(&wire))
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.to_bytes())
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }
}

/// Sign a message with the given private key under the given schema.
///
/// The public key is re-derived here because it is an input to the
/// challenge hash; callers holding a `KeyPair` avoid the extra
/// derivation by going through [`sign_with_public_key`].
pub fn sign(
    private: &PrivateKey,
    schema: SignSchema,
    message: &[u8],
) -> CryptoResult<Signature> {
    let public = private.derive_public_key(schema);
    sign_with_public_key(private, &public, schema, message)
}

pub fn sign_with_public_key(
    private: &PrivateKey,
    public: &PublicKey,
    schema: SignSchema,
    message: &[u8],
) -> CryptoResult<Signature> {
    let digest = schema.hash_private_key(private.as_bytes());
    let mut low = [0u8; 32];
    low.copy_from_slice(&digest[..32]);
    Scalar::clamp(&mut low);
    let a = Scalar::from_bytes(low);

    // Deterministic nonce from the digest's upper half and the message.
    let r_wide = schema.hash_parts(&[&digest[32..], message]);
    let r = Scalar::from_bytes_wide(&r_wide);
    let r_point = constants::basepoint_table().multiply(&r);
    let r_bytes = r_point.encode();

    let k_wide = schema.hash_parts(&[&r_bytes, public.as_bytes(), message]);
    let k = Scalar::from_bytes_wide(&k_wide);
    let s = k.multiply_and_add(&a, &r);

    if s == Scalar::ZERO {
        return Err(CryptoError::InvalidSignature(
            "Degenerate signature with S = 0".into(),
        ));
    }
    Ok(Signature { r: r_bytes, s: s.to_bytes() })
}

/// Verify a signature over a message.
///
/// Returns false for any failure: non-canonical or zero S, a public
/// key that does not decode to a large-order curve point, or a nonce
/// point that does not match the two-exponent reconstruction.
pub fn verify(
    public: &PublicKey,
    schema: SignSchema,
    message: &[u8],
    signature: &Signature,
) -> bool {
    if !Scalar::is_canonical(&signature.s) || signature.s == [0u8; 32] {
        return false;
    }

    let a = match GroupElement::decode(public.as_bytes()) {
        Ok(point) => point,
        Err(_) => return false,
    };
    if a.is_small_order() {
        return false;
    }
    if GroupElement::decode(&signature.r).is_err() {
        return false;
    }

    let k_wide = schema.hash_parts(&[&signature.r, public.as_bytes(), message]);
    let k = Scalar::from_bytes_wide(&k_wide);
    let s = Scalar::from_bytes(signature.s);

    // R' = S·B + k·(-A); a valid signature reproduces R exactly.
    let minus_a = a.negate();
    let minus_a_table = minus_a.precompute_for_double_scalar_multiplication();
    let r_check = double_scalar_multiply_vartime(
        &s,
        constants::basepoint_double_table(),
        &k,
        &minus_a_table,
    );

    r_check.encode().ct_eq(&signature.r).into()
}
