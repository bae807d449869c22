use sealfield_crypto::{
    CryptoError, FieldEncryptor, KeyRing, KeyRingConfig, MAX_CLOCK_SKEW_SECS, Token,
    generate_random_key, now_unix,
};
use std::sync::Arc;
use std::time::Duration;

// ── KeyRing basics ───────────────────────────────────────────────

#[test]
fn empty_ring_rejected() {
    assert!(matches!(KeyRing::new(vec![]), Err(CryptoError::NoKeys)));
}

#[test]
fn ring_encrypt_decrypt_roundtrip() {
    let ring = KeyRing::single(generate_random_key());
    let blob = ring.encrypt(b"payload").unwrap();
    assert_eq!(ring.decrypt(&blob).unwrap(), b"payload");
}

#[test]
fn ring_output_is_a_token() {
    let ring = KeyRing::single(generate_random_key());
    let blob = ring.encrypt(b"payload").unwrap();
    let token = Token::from_bytes(&blob).unwrap();
    assert!(token.issued_at.abs_diff(now_unix()) <= 5);
}

#[test]
fn truncated_blob_fails() {
    let ring = KeyRing::single(generate_random_key());
    let blob = ring.encrypt(b"payload").unwrap();
    assert!(ring.decrypt(&blob[..blob.len() - 1]).is_err());
    assert!(ring.decrypt(&blob[..10]).is_err());
}

#[test]
fn ring_usable_as_trait_object() {
    let enc: Arc<dyn FieldEncryptor> = Arc::new(KeyRing::single(generate_random_key()));
    let blob = enc.encrypt(b"x").unwrap();
    assert_eq!(enc.decrypt(&blob).unwrap(), b"x");
}

// ── Rotation ─────────────────────────────────────────────────────

#[test]
fn secondary_key_still_decrypts() {
    let old = generate_random_key();
    let new = generate_random_key();
    let old_ring = KeyRing::single(old.clone());
    let blob = old_ring.encrypt(b"legacy").unwrap();

    let ring = KeyRing::new(vec![new, old]).unwrap();
    assert_eq!(ring.decrypt(&blob).unwrap(), b"legacy");
}

#[test]
fn rotate_moves_token_to_primary() {
    let old = generate_random_key();
    let new = generate_random_key();
    let blob = KeyRing::single(old.clone()).encrypt(b"legacy").unwrap();

    let ring = KeyRing::new(vec![new.clone(), old]).unwrap();
    let rotated = ring.rotate(&blob).unwrap();

    let new_only = KeyRing::single(new);
    assert_eq!(new_only.decrypt(&rotated).unwrap(), b"legacy");
    assert!(new_only.decrypt(&blob).is_err());
}

#[test]
fn rotate_ignores_ttl() {
    let ring = KeyRing::single(generate_random_key()).with_ttl(Duration::from_secs(10));
    let blob = ring.encrypt_at(b"old", now_unix() - 3600).unwrap();
    assert!(ring.decrypt(&blob).is_err());
    let rotated = ring.rotate(&blob).unwrap();
    assert_eq!(ring.decrypt(&rotated).unwrap(), b"old");
}

#[test]
fn unknown_key_fails_with_decryption_error() {
    let blob = KeyRing::single(generate_random_key())
        .encrypt(b"x")
        .unwrap();
    let ring = KeyRing::new(vec![generate_random_key(), generate_random_key()]).unwrap();
    let err = ring.decrypt(&blob).unwrap_err();
    assert!(matches!(err, CryptoError::Decryption(_)));
    assert!(format!("{err}").contains("2"));
}

// ── TTL and clock skew ───────────────────────────────────────────

#[test]
fn ttl_accepts_fresh_token() {
    let ring = KeyRing::single(generate_random_key());
    let blob = ring.encrypt(b"fresh").unwrap();
    assert_eq!(
        ring.decrypt_with_ttl(&blob, Duration::from_secs(60)).unwrap(),
        b"fresh"
    );
}

#[test]
fn ttl_rejects_old_token() {
    let ring = KeyRing::single(generate_random_key());
    let blob = ring.encrypt_at(b"stale", now_unix() - 120).unwrap();
    match ring.decrypt_with_ttl(&blob, Duration::from_secs(60)) {
        Err(CryptoError::Expired { age_secs, ttl_secs }) => {
            assert!(age_secs >= 120);
            assert_eq!(ttl_secs, 60);
        }
        other => panic!("expected expiry, got {other:?}"),
    }
}

#[test]
fn future_token_rejected() {
    let ring = KeyRing::single(generate_random_key());
    let blob = ring
        .encrypt_at(b"later", now_unix() + MAX_CLOCK_SKEW_SECS + 120)
        .unwrap();
    assert!(matches!(
        ring.decrypt(&blob),
        Err(CryptoError::InvalidToken(_))
    ));
}

// ── Configuration ────────────────────────────────────────────────

#[test]
fn ring_from_json_config() {
    let k1 = generate_random_key();
    let k2 = generate_random_key();
    let json = format!(
        r#"{{"keys": ["{}", "{}"], "ttl_secs": 30}}"#,
        k1.to_base64(),
        k2.to_base64()
    );
    let config = KeyRingConfig::from_json(&json).unwrap();
    let ring = KeyRing::from_config(&config).unwrap();
    assert_eq!(ring.len(), 2);
    assert_eq!(ring.primary().as_bytes(), k1.as_bytes());
    assert_eq!(ring.ttl(), Some(Duration::from_secs(30)));
}

#[test]
fn key_list_ignores_blanks() {
    let k1 = generate_random_key().to_base64();
    let config = KeyRingConfig::from_key_list(&format!(" {k1} , ,"));
    assert_eq!(config.keys, vec![k1]);
}

#[test]
fn ring_from_env() {
    let key = generate_random_key();
    let var = "SEALFIELD_TEST_RING_FROM_ENV";
    // SAFETY: this test is the only user of this variable.
    unsafe { std::env::set_var(var, key.to_base64()) };
    let ring = KeyRing::from_env(var).unwrap();
    assert_eq!(ring.primary().as_bytes(), key.as_bytes());
    unsafe { std::env::remove_var(var) };
}

#[test]
fn missing_env_var_reported() {
    let err = KeyRing::from_env("SEALFIELD_TEST_DEFINITELY_UNSET").unwrap_err();
    assert!(matches!(err, CryptoError::MissingKeyMaterial(_)));
}

#[test]
fn config_debug_redacts_keys() {
    let key = generate_random_key().to_base64();
    let config = KeyRingConfig::from_key_list(&key);
    assert!(!format!("{config:?}").contains(&key));
}
