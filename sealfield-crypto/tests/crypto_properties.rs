//! Property-based tests for the crypto layer.
//!
//! These properties must always hold:
//! - Sealing is reversible with the correct key
//! - Tokens never contain their plaintext
//! - Any single flipped byte is detected
//! - A key ring opens tokens from any of its keys

use proptest::prelude::*;
use sealfield_crypto::{
    FieldEncryptor, FieldKey, KEY_SIZE, KeyRing, Token, generate_random_key, open, seal,
};

fn plaintext_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..4096)
}

fn key_strategy() -> impl Strategy<Value = FieldKey> {
    prop::array::uniform32(any::<u8>()).prop_map(FieldKey::from_bytes)
}

mod sealing_properties {
    use super::*;

    proptest! {
        #[test]
        fn roundtrip_preserves_data(plaintext in plaintext_strategy(), key in key_strategy()) {
            let token = seal(&key, &plaintext).unwrap();
            prop_assert_eq!(open(&key, &token).unwrap(), plaintext);
        }

        #[test]
        fn token_does_not_contain_plaintext(plaintext in prop::collection::vec(any::<u8>(), 16..256)) {
            let key = generate_random_key();
            let bytes = seal(&key, &plaintext).unwrap().to_bytes();
            let leaked = bytes
                .windows(plaintext.len())
                .any(|w| w == plaintext.as_slice());
            prop_assert!(!leaked);
        }

        #[test]
        fn ciphertext_length_is_plaintext_plus_overhead(plaintext in plaintext_strategy()) {
            let key = generate_random_key();
            let token = seal(&key, &plaintext).unwrap();
            prop_assert_eq!(token.ciphertext.len(), plaintext.len() + 16);
        }

        #[test]
        fn wrong_key_never_opens(plaintext in plaintext_strategy(), k1 in key_strategy(), k2 in key_strategy()) {
            prop_assume!(k1.as_bytes() != k2.as_bytes());
            let token = seal(&k1, &plaintext).unwrap();
            prop_assert!(open(&k2, &token).is_err());
        }
    }
}

mod tamper_properties {
    use super::*;

    proptest! {
        #[test]
        fn any_flipped_byte_is_detected(
            plaintext in prop::collection::vec(any::<u8>(), 1..512),
            index in any::<prop::sample::Index>(),
            mask in 1u8..=255,
        ) {
            let ring = KeyRing::single(generate_random_key());
            let mut blob = ring.encrypt(&plaintext).unwrap();
            let i = index.index(blob.len());
            blob[i] ^= mask;
            prop_assert!(ring.decrypt(&blob).is_err());
        }

        #[test]
        fn parse_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
            let _ = Token::from_bytes(&bytes);
        }
    }
}

mod ring_properties {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn any_member_key_opens(plaintext in plaintext_strategy(), which in 0usize..4) {
            let keys: Vec<FieldKey> = (0..4).map(|_| generate_random_key()).collect();
            let blob = KeyRing::single(keys[which].clone()).encrypt(&plaintext).unwrap();
            let ring = KeyRing::new(keys).unwrap();
            prop_assert_eq!(ring.decrypt(&blob).unwrap(), plaintext);
        }
    }
}

#[test]
fn key_size_is_256_bits() {
    assert_eq!(KEY_SIZE, 32);
}
