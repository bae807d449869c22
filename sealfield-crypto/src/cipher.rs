//! Field token encryption using ChaCha20-Poly1305.
//!
//! A token is laid out as:
//!
//! ```text
//! version (1) | issued_at (8, big-endian unix seconds) | nonce (12) | ciphertext + tag
//! ```
//!
//! The version byte and timestamp are authenticated as associated data, so a
//! token whose header is altered fails decryption just like one whose body is.

use crate::error::{CryptoError, CryptoResult};
use crate::key::FieldKey;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit, Payload},
};
use chrono::{DateTime, Utc};
use rand::RngCore;

/// Size of nonce in bytes (96 bits for ChaCha20-Poly1305).
pub const NONCE_SIZE: usize = 12;

/// Size of authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Current token format version.
pub const TOKEN_VERSION: u8 = 0xA1;

/// Version byte plus timestamp.
pub const HEADER_SIZE: usize = 1 + 8;

/// Smallest well-formed token (empty plaintext).
pub const MIN_TOKEN_SIZE: usize = HEADER_SIZE + NONCE_SIZE + TAG_SIZE;

/// A parsed field token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Unix seconds at which the token was sealed.
    pub issued_at: u64,
    /// The nonce used for encryption (unique per token).
    pub nonce: [u8; NONCE_SIZE],
    /// The encrypted ciphertext (includes auth tag).
    pub ciphertext: Vec<u8>,
}

impl Token {
    fn header(issued_at: u64) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[0] = TOKEN_VERSION;
        header[1..].copy_from_slice(&issued_at.to_be_bytes());
        header
    }

    /// Total encoded length in bytes.
    pub fn len(&self) -> usize {
        HEADER_SIZE + NONCE_SIZE + self.ciphertext.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }

    /// Issue time as a UTC datetime.
    pub fn issued_at_utc(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.issued_at)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Encodes the token to its binary layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len());
        bytes.extend_from_slice(&Self::header(self.issued_at));
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Parses a token from its binary layout.
    ///
    /// Only the structure is checked here; authenticity is checked by [`open`].
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < MIN_TOKEN_SIZE {
            return Err(CryptoError::InvalidToken(format!(
                "token too short: {} bytes, need at least {MIN_TOKEN_SIZE}",
                bytes.len()
            )));
        }
        if bytes[0] != TOKEN_VERSION {
            return Err(CryptoError::InvalidToken(format!(
                "unknown token version 0x{:02x}",
                bytes[0]
            )));
        }

        let mut ts = [0u8; 8];
        ts.copy_from_slice(&bytes[1..HEADER_SIZE]);
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[HEADER_SIZE..HEADER_SIZE + NONCE_SIZE]);

        Ok(Self {
            issued_at: u64::from_be_bytes(ts),
            nonce,
            ciphertext: bytes[HEADER_SIZE + NONCE_SIZE..].to_vec(),
        })
    }

    /// Encodes to unpadded base64url, for text transports.
    pub fn to_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_bytes())
    }

    /// Decodes from base64url.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim().trim_end_matches('='))
            .map_err(|e| CryptoError::InvalidToken(format!("invalid base64: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

/// Current wall-clock time in unix seconds.
pub fn now_unix() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

/// Seals `plaintext` under `key`, stamped with the current time.
pub fn seal(key: &FieldKey, plaintext: &[u8]) -> CryptoResult<Token> {
    seal_at(key, plaintext, now_unix())
}

/// Seals `plaintext` under `key` with an explicit issue time.
pub fn seal_at(key: &FieldKey, plaintext: &[u8], issued_at: u64) -> CryptoResult<Token> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let header = Token::header(issued_at);
    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    Ok(Token {
        issued_at,
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Opens a token sealed under `key`.
///
/// Fails with [`CryptoError::Decryption`] on a wrong key or any tampering.
pub fn open(key: &FieldKey, token: &Token) -> CryptoResult<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = Nonce::from_slice(&token.nonce);
    let header = Token::header(token.issued_at);

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: token.ciphertext.as_ref(),
                aad: &header,
            },
        )
        .map_err(|_| {
            CryptoError::Decryption("decryption failed (wrong key or tampered data)".to_string())
        })
}
