//! Property-based tests across the signing, key derivation and
//! encryption surfaces.

use proptest::prelude::*;

use catapult_crypto::{
    cipher, sign, verify, GroupElement, KeyPair, PrivateKey, SignSchema, Signature,
};

fn schema_strategy() -> impl Strategy<Value = SignSchema> {
    prop_oneof![
        Just(SignSchema::Sha3),
        Just(SignSchema::KeccakReversedKey),
    ]
}

proptest! {
    // Every case pays for at least one scalar multiplication, and the
    // ECDH cases build a full window table, so keep the case count low.
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sign_verify_roundtrip(
        seed in any::<[u8; 32]>(),
        message in proptest::collection::vec(any::<u8>(), 0..256),
        schema in schema_strategy(),
    ) {
        let pair = KeyPair::from_private_key(PrivateKey::from_bytes(seed), schema);
        let signature = sign(pair.private_key(), schema, &message).unwrap();
        prop_assert!(verify(pair.public_key(), schema, &message, &signature));
    }

    #[test]
    fn bit_flip_invalidates_signature(
        seed in any::<[u8; 32]>(),
        message in proptest::collection::vec(any::<u8>(), 1..128),
        bit in 0usize..512,
        schema in schema_strategy(),
    ) {
        let pair = KeyPair::from_private_key(PrivateKey::from_bytes(seed), schema);
        let signature = sign(pair.private_key(), schema, &message).unwrap();

        let mut bytes = signature.to_bytes();
        bytes[bit / 8] ^= 1 << (bit % 8);
        let tampered = Signature::from_bytes(&bytes);
        prop_assert!(!verify(pair.public_key(), schema, &message, &tampered));
    }

    #[test]
    fn modified_message_invalidates_signature(
        seed in any::<[u8; 32]>(),
        message in proptest::collection::vec(any::<u8>(), 1..128),
        index in 0usize..128,
        schema in schema_strategy(),
    ) {
        let pair = KeyPair::from_private_key(PrivateKey::from_bytes(seed), schema);
        let signature = sign(pair.private_key(), schema, &message).unwrap();

        let mut modified = message.clone();
        let index = index % modified.len();
        modified[index] ^= 0xff;
        prop_assert!(!verify(pair.public_key(), schema, &modified, &signature));
    }

    #[test]
    fn public_keys_decode_and_roundtrip(
        seed in any::<[u8; 32]>(),
        schema in schema_strategy(),
    ) {
        let public = PrivateKey::from_bytes(seed).derive_public_key(schema);
        let point = GroupElement::decode(public.as_bytes()).unwrap();
        prop_assert!(point.is_on_curve());
        prop_assert!(!point.is_small_order());
        prop_assert_eq!(point.encode(), *public.as_bytes());
    }

    #[test]
    fn shared_keys_are_symmetric(
        seed_a in any::<[u8; 32]>(),
        seed_b in any::<[u8; 32]>(),
        schema in schema_strategy(),
    ) {
        let alice = KeyPair::from_private_key(PrivateKey::from_bytes(seed_a), schema);
        let bob = KeyPair::from_private_key(PrivateKey::from_bytes(seed_b), schema);

        let k_ab = cipher::derive_shared_key(alice.private_key(), bob.public_key(), schema)
            .unwrap();
        let k_ba = cipher::derive_shared_key(bob.private_key(), alice.public_key(), schema)
            .unwrap();
        prop_assert_eq!(k_ab, k_ba);
    }

    #[test]
    fn encrypted_messages_roundtrip(
        key in any::<[u8; 32]>(),
        plaintext in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let sealed = cipher::encrypt(&key, &plaintext).unwrap();
        prop_assert_eq!(cipher::decrypt(&key, &sealed).unwrap(), plaintext);
    }

    #[test]
    fn ciphertext_tampering_detected(
        key in any::<[u8; 32]>(),
        plaintext in proptest::collection::vec(any::<u8>(), 1..128),
        bit in 0usize..64,
    ) {
        let mut sealed = cipher::encrypt(&key, &plaintext).unwrap();
        let bit = bit % (sealed.len() * 8);
        sealed[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(cipher::decrypt(&key, &sealed).is_err());
    }
}
