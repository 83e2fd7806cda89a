//! Shared Secrets and Message Encryption
//!
//! ECDH over the signing curve plus AES-256-GCM for message payloads.
//! The raw curve point is never used as a key directly: it runs through
//! HKDF-SHA-256 first, so related-point structure cannot leak into the
//! cipher.
//!
//! Wire layout of an encrypted message: 12-byte nonce followed by the
//! GCM ciphertext and tag. Anything shorter than nonce + tag (28 bytes)
//! is rejected before any cipher work happens.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};
use crate::group::GroupElement;
use crate::keys::{PrivateKey, PublicKey};
use crate::scalar::Scalar;
use crate::schema::SignSchema;

type HmacSha256 = Hmac<Sha256>;

/// Marker prefix identifying a persistent delegation request payload
pub const PERSISTENT_DELEGATION_MARKER: [u8; 8] =
    [0xFE, 0x2A, 0x80, 0x61, 0x57, 0x73, 0x01, 0xE2];

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Derive the raw 32-byte ECDH value between a private key and a peer
/// public key: the encoding of clamp(hash(priv))·PeerPoint.
///
/// Both sides arrive at the same point from either end. The
/// multiplication runs through the constant-time table engine since the
/// scalar is secret. This value is never used as a cipher key directly;
/// see [`derive_shared_key`].
pub fn derive_shared_secret(
    private: &PrivateKey,
    peer: &PublicKey,
    schema: SignSchema,
) -> CryptoResult<[u8; 32]> {
    let digest = Zeroizing::new(schema.hash_private_key(private.as_bytes()));
    let mut low = [0u8; 32];
    low.copy_from_slice(&digest[..32]);
    Scalar::clamp(&mut low);
    let a = Scalar::from_bytes(low);

    let peer_point = GroupElement::decode(peer.as_bytes())?;
    let shared_point = peer_point
        .precompute_for_scalar_multiplication()
        .multiply(&a);
    Ok(shared_point.encode())
}

/// Derive the 32-byte AEAD key: the shared secret stretched with
/// HKDF-SHA-256.
pub fn derive_shared_key(
    private: &PrivateKey,
    peer: &PublicKey,
    schema: SignSchema,
) -> CryptoResult<[u8; 32]> {
    let shared_secret = Zeroizing::new(derive_shared_secret(private, peer, schema)?);
    Ok(hkdf_sha256(&*shared_secret, b"catapult"))
}

/// HKDF-SHA-256 with an all-zero salt, expanded to a single 32-byte
/// output block.
fn hkdf_sha256(ikm: &[u8], info: &[u8]) -> [u8; 32] {
    // Extract with a zero salt of hash length. HMAC-SHA-256 accepts
    // keys of any length, so construction cannot fail.
    let mut extract = <HmacSha256 as Mac>::new_from_slice(&[0u8; 32])
        .expect("HMAC accepts keys of any length");
    extract.update(ikm);
    let prk = extract.finalize().into_bytes();

    // Expand: first block only, T(1) = HMAC(prk, info || 0x01).
    let mut expand = <HmacSha256 as Mac>::new_from_slice(&prk)
        .expect("HMAC accepts keys of any length");
    expand.update(info);
    expand.update(&[0x01]);
    let okm = expand.finalize().into_bytes();

    let mut out = [0u8; 32];
    out.copy_from_slice(&okm);
    out
}

/// Encrypt a payload under a shared key. The fresh random nonce is
/// prepended to the ciphertext.
pub fn encrypt(key: &[u8; 32], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CryptoError::DecryptionFailure)?;

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt a nonce-prefixed payload. Truncated input and a failed
/// authentication tag are indistinguishable to the caller.
pub fn decrypt(key: &[u8; 32], data: &[u8]) -> CryptoResult<Vec<u8>> {
    if data.len() < NONCE_LEN + TAG_LEN {
        return Err(CryptoError::DecryptionFailure);
    }
    let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CryptoError::DecryptionFailure)
}

/// ECDH-encrypt a message from `private` to `peer`
pub fn encrypt_message(
    private: &PrivateKey,
    peer: &PublicKey,
    schema: SignSchema,
    plaintext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let key = Zeroizing::new(derive_shared_key(private, peer, schema)?);
    encrypt(&key, plaintext)
}

/// Decrypt a message sent from `peer` to `private`
pub fn decrypt_message(
    private: &PrivateKey,
    peer: &PublicKey,
    schema: SignSchema,
    data: &[u8],
) -> CryptoResult<Vec<u8>> {
    let key = Zeroizing::new(derive_shared_key(private, peer, schema)?);
    decrypt(&key, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyPair;

    fn pairs() -> (KeyPair, KeyPair) {
        (
            KeyPair::from_private_key(PrivateKey::from_bytes([0x11; 32]), SignSchema::Sha3),
            KeyPair::from_private_key(PrivateKey::from_bytes([0x22; 32]), SignSchema::Sha3),
        )
    }

    #[test]
    fn test_shared_key_is_symmetric() {
        let (alice, bob) = pairs();
        let k1 =
            derive_shared_key(alice.private_key(), bob.public_key(), SignSchema::Sha3).unwrap();
        let k2 =
            derive_shared_key(bob.private_key(), alice.public_key(), SignSchema::Sha3).unwrap();
        assert_eq!(k1, k2);
    }

    #[test]
    fn test_raw_secret_is_symmetric_and_distinct_from_key() {
        let (alice, bob) = pairs();
        let s1 =
            derive_shared_secret(alice.private_key(), bob.public_key(), SignSchema::Sha3)
                .unwrap();
        let s2 =
            derive_shared_secret(bob.private_key(), alice.public_key(), SignSchema::Sha3)
                .unwrap();
        assert_eq!(s1, s2);

        let key =
            derive_shared_key(alice.private_key(), bob.public_key(), SignSchema::Sha3).unwrap();
        assert_ne!(key, s1);
    }

    #[test]
    fn test_shared_key_differs_per_peer() {
        let (alice, bob) = pairs();
        let carol =
            KeyPair::from_private_key(PrivateKey::from_bytes([0x33; 32]), SignSchema::Sha3);
        let to_bob =
            derive_shared_key(alice.private_key(), bob.public_key(), SignSchema::Sha3).unwrap();
        let to_carol =
            derive_shared_key(alice.private_key(), carol.public_key(), SignSchema::Sha3)
                .unwrap();
        assert_ne!(to_bob, to_carol);
    }

    #[test]
    fn test_invalid_peer_point_rejected() {
        let (alice, _) = pairs();
        let mut bytes = [0u8; 32];
        bytes[0] = 2; // not a curve point
        let bad = PublicKey::from_bytes(bytes);
        assert!(derive_shared_key(alice.private_key(), &bad, SignSchema::Sha3).is_err());
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = [0x55u8; 32];
        let sealed = encrypt(&key, b"delegation request").unwrap();
        assert_eq!(decrypt(&key, &sealed).unwrap(), b"delegation request");
    }

    #[test]
    fn test_nonces_are_fresh() {
        let key = [0x55u8; 32];
        let a = encrypt(&key, b"msg").unwrap();
        let b = encrypt(&key, b"msg").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = [0x55u8; 32];
        let mut sealed = encrypt(&key, b"msg").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 1;
        assert_eq!(decrypt(&key, &sealed).unwrap_err(), CryptoError::DecryptionFailure);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = encrypt(&[0x55u8; 32], b"msg").unwrap();
        assert!(decrypt(&[0x56u8; 32], &sealed).is_err());
    }

    #[test]
    fn test_truncated_input_fails() {
        let key = [0x55u8; 32];
        assert_eq!(decrypt(&key, &[0u8; 27]).unwrap_err(), CryptoError::DecryptionFailure);
        assert!(decrypt(&key, &[]).is_err());
    }

    #[test]
    fn test_message_roundtrip_between_parties() {
        let (alice, bob) = pairs();
        let payload: Vec<u8> = PERSISTENT_DELEGATION_MARKER
            .iter()
            .chain(b"linked remote key".iter())
            .copied()
            .collect();
        let sealed = encrypt_message(
            alice.private_key(),
            bob.public_key(),
            SignSchema::Sha3,
            &payload,
        )
        .unwrap();
        let opened = decrypt_message(
            bob.private_key(),
            alice.public_key(),
            SignSchema::Sha3,
            &sealed,
        )
        .unwrap();
        assert_eq!(opened, payload);
        assert!(opened.starts_with(&PERSISTENT_DELEGATION_MARKER));
    }

    #[test]
    fn test_eavesdropper_cannot_decrypt() {
        let (alice, bob) = pairs();
        let eve = KeyPair::from_private_key(PrivateKey::from_bytes([0x99; 32]), SignSchema::Sha3);
        let sealed = encrypt_message(
            alice.private_key(),
            bob.public_key(),
            SignSchema::Sha3,
            b"secret",
        )
        .unwrap();
        assert!(decrypt_message(
            eve.private_key(),
            alice.public_key(),
            SignSchema::Sha3,
            &sealed
        )
        .is_err());
    }
}
