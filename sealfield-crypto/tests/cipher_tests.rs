use sealfield_crypto::{
    CryptoError, HEADER_SIZE, MIN_TOKEN_SIZE, NONCE_SIZE, TOKEN_VERSION, Token,
    generate_random_key, open, seal, seal_at,
};

#[test]
fn seal_open_roundtrip() {
    let key = generate_random_key();
    let plaintext = b"Hello, World!";
    let token = seal(&key, plaintext).unwrap();
    let opened = open(&key, &token).unwrap();
    assert_eq!(opened, plaintext);
}

#[test]
fn seal_open_empty() {
    let key = generate_random_key();
    let token = seal(&key, b"").unwrap();
    assert_eq!(open(&key, &token).unwrap(), b"");
}

#[test]
fn seal_open_large_data() {
    let key = generate_random_key();
    let plaintext: Vec<u8> = (0..10000).map(|i| (i % 256) as u8).collect();
    let token = seal(&key, &plaintext).unwrap();
    assert_eq!(open(&key, &token).unwrap(), plaintext);
}

#[test]
fn wrong_key_fails_open() {
    let key1 = generate_random_key();
    let key2 = generate_random_key();
    let token = seal(&key1, b"Secret").unwrap();
    assert!(matches!(
        open(&key2, &token),
        Err(CryptoError::Decryption(_))
    ));
}

#[test]
fn tampered_ciphertext_fails_open() {
    let key = generate_random_key();
    let mut token = seal(&key, b"Secret").unwrap();
    token.ciphertext[0] ^= 0xFF;
    assert!(open(&key, &token).is_err());
}

#[test]
fn tampered_timestamp_fails_open() {
    let key = generate_random_key();
    let mut token = seal_at(&key, b"Secret", 1_700_000_000).unwrap();
    token.issued_at += 1;
    assert!(matches!(
        open(&key, &token),
        Err(CryptoError::Decryption(_))
    ));
}

#[test]
fn same_plaintext_produces_different_tokens() {
    let key = generate_random_key();
    let t1 = seal(&key, b"Same").unwrap();
    let t2 = seal(&key, b"Same").unwrap();
    assert_ne!(t1.nonce, t2.nonce);
    assert_ne!(t1.ciphertext, t2.ciphertext);
}

// ── Token layout ─────────────────────────────────────────────────

#[test]
fn token_layout() {
    let key = generate_random_key();
    let token = seal_at(&key, b"abc", 0x0102_0304_0506_0708).unwrap();
    let bytes = token.to_bytes();
    assert_eq!(bytes.len(), token.len());
    assert_eq!(bytes[0], TOKEN_VERSION);
    assert_eq!(&bytes[1..HEADER_SIZE], &[1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(&bytes[HEADER_SIZE..HEADER_SIZE + NONCE_SIZE], &token.nonce);
    // 3 bytes of plaintext + 16 byte tag
    assert_eq!(bytes.len(), MIN_TOKEN_SIZE + 3);
}

#[test]
fn token_bytes_roundtrip() {
    let key = generate_random_key();
    let token = seal(&key, b"data").unwrap();
    let parsed = Token::from_bytes(&token.to_bytes()).unwrap();
    assert_eq!(parsed, token);
    assert_eq!(open(&key, &parsed).unwrap(), b"data");
}

#[test]
fn token_too_short_fails() {
    let err = Token::from_bytes(&[TOKEN_VERSION; MIN_TOKEN_SIZE - 1]).unwrap_err();
    assert!(matches!(err, CryptoError::InvalidToken(_)));
}

#[test]
fn token_unknown_version_fails() {
    let key = generate_random_key();
    let mut bytes = seal(&key, b"x").unwrap().to_bytes();
    bytes[0] = 0x80;
    let err = Token::from_bytes(&bytes).unwrap_err();
    assert!(format!("{err}").contains("0x80"));
}

#[test]
fn token_base64_roundtrip() {
    let key = generate_random_key();
    let token = seal(&key, b"Data").unwrap();
    let encoded = token.to_base64();
    assert!(!encoded.contains('+') && !encoded.contains('/'));
    assert_eq!(Token::from_base64(&encoded).unwrap(), token);
}

#[test]
fn token_base64_invalid_fails() {
    assert!(Token::from_base64("!!!not-base64!!!").is_err());
}

#[test]
fn token_issued_at_utc() {
    let key = generate_random_key();
    let token = seal_at(&key, b"x", 1_700_000_000).unwrap();
    assert_eq!(token.issued_at_utc().unwrap().timestamp(), 1_700_000_000);
}
