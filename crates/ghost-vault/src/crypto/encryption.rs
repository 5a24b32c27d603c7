//! Record sealing with ChaCha20-Poly1305.
//!
//! A sealed record is a self-describing token:
//!
//! ```text
//! raw   = version (1) || nonce (12) || ciphertext || tag (16)
//! token = base64url(raw)
//! ```
//!
//! The version byte is bound to the ciphertext as associated data. The
//! token is ASCII so it can be written to disk as-is.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Nonce,
};
use zeroize::Zeroize;

use crate::crypto::derivation::VaultKey;
use crate::crypto::random::random_nonce_12;
use crate::error::{Result, VaultError};

/// Current token format version.
pub const TOKEN_VERSION: u8 = 0x01;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const HEADER_LEN: usize = 1 + NONCE_LEN;

/// Why a token could not be opened.
///
/// Callers outside the crate only ever see `VaultError::AccessDenied`;
/// the reason is kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Denial {
    /// The bytes are not a token at all: bad encoding, too short, or an
    /// unknown version.
    Malformed,
    /// Well-formed token whose tag did not verify: wrong phrase or
    /// tampered ciphertext.
    AuthenticationFailed,
}

impl Denial {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Denial::Malformed => "malformed token",
            Denial::AuthenticationFailed => "authentication failed",
        }
    }
}

/// Encrypt `plaintext` under `key` and return the encoded token bytes.
pub fn seal(key: &VaultKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut record_key = key.record_key()?;
    let cipher = ChaCha20Poly1305::new_from_slice(&record_key)
        .map_err(|e| VaultError::EncryptionFailed(format!("cipher init: {e}")));
    record_key.zeroize();
    let cipher = cipher?;

    let nonce_bytes = random_nonce_12();
    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: plaintext,
                aad: &[TOKEN_VERSION],
            },
        )
        .map_err(|e| VaultError::EncryptionFailed(format!("encrypt: {e}")))?;

    let mut raw = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    raw.push(TOKEN_VERSION);
    raw.extend_from_slice(&nonce_bytes);
    raw.extend_from_slice(&ciphertext);

    let token = base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE, &raw);
    Ok(token.into_bytes())
}

/// Decrypt a token produced by [`seal`].
///
/// Returns `VaultError::AccessDenied` for any failure to open the token.
pub fn open(key: &VaultKey, token: &[u8]) -> Result<Vec<u8>> {
    open_token(key, token)?.map_err(|_| VaultError::AccessDenied)
}

/// Decrypt a token, keeping the reason for a denial.
///
/// The outer `Result` carries key-handling failures; the inner one carries
/// the token verdict.
pub(crate) fn open_token(
    key: &VaultKey,
    token: &[u8],
) -> Result<std::result::Result<Vec<u8>, Denial>> {
    let raw = match base64::Engine::decode(&base64::engine::general_purpose::URL_SAFE, token) {
        Ok(raw) => raw,
        Err(_) => return Ok(Err(Denial::Malformed)),
    };

    if raw.len() < HEADER_LEN + TAG_LEN || raw[0] != TOKEN_VERSION {
        return Ok(Err(Denial::Malformed));
    }

    let (header, ciphertext) = raw.split_at(HEADER_LEN);
    let nonce = Nonce::from_slice(&header[1..]);

    let mut record_key = key.record_key()?;
    let cipher = ChaCha20Poly1305::new_from_slice(&record_key)
        .map_err(|e| VaultError::DerivationFailed(format!("cipher init: {e}")));
    record_key.zeroize();
    let cipher = cipher?;

    Ok(cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: &[TOKEN_VERSION],
            },
        )
        .map_err(|_| Denial::AuthenticationFailed))
}
