//! Wake-phrase key derivation.
//!
//! A wake phrase is turned into a vault key by hashing it together with a
//! fixed application-wide salt:
//!
//! ```text
//! digest    = SHA-256(utf8(phrase) || PHRASE_SALT)
//! vault key = base64url(digest)                      (44 chars, padded)
//! record key = HKDF-SHA256(digest, RECORD_ENCRYPTION_CONTEXT)  (32 bytes)
//! ```
//!
//! The salt is public and identical for every record, so the same phrase
//! always yields the same key. Nothing derived here is ever written to disk.

use std::fmt;

use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, VaultError};

/// Fixed, non-secret salt appended to every wake phrase before hashing.
/// Changing it makes every existing record unreadable.
pub const PHRASE_SALT: &[u8] = b"ghost-vault/wake-phrase/salt/v1";

/// HKDF info string for the record encryption key. Must remain stable
/// across versions.
const RECORD_ENCRYPTION_CONTEXT: &str = "ghost-vault/record-encryption";

/// Symmetric key derived from a wake phrase.
///
/// Holds the URL-safe base64 encoding of the SHA-256 digest. The value is
/// wiped on drop and never printed by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct VaultKey {
    encoded: String,
}

impl VaultKey {
    /// URL-safe base64 form of the key.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Expand the vault key into the 32-byte ChaCha20-Poly1305 key.
    pub(crate) fn record_key(&self) -> Result<[u8; 32]> {
        let mut digest = base64::Engine::decode(
            &base64::engine::general_purpose::URL_SAFE,
            &self.encoded,
        )
        .map_err(|e| VaultError::DerivationFailed(format!("key encoding: {e}")))?;

        if digest.len() != 32 {
            digest.zeroize();
            return Err(VaultError::DerivationFailed(
                "key must decode to 32 bytes".to_string(),
            ));
        }

        let hk = Hkdf::<Sha256>::new(None, &digest);
        let mut output = [0u8; 32];
        let expanded = hk.expand(RECORD_ENCRYPTION_CONTEXT.as_bytes(), &mut output);
        digest.zeroize();
        expanded.map_err(|e| VaultError::DerivationFailed(format!("HKDF expand failed: {e}")))?;

        Ok(output)
    }
}

impl PartialEq for VaultKey {
    fn eq(&self, other: &Self) -> bool {
        self.encoded == other.encoded
    }
}

impl Eq for VaultKey {}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaultKey(<redacted>)")
    }
}

/// Derive the vault key for a wake phrase.
///
/// # Errors
///
/// Returns `VaultError::InvalidPhrase` if `phrase` is empty.
pub fn derive_key(phrase: &str) -> Result<VaultKey> {
    if phrase.is_empty() {
        return Err(VaultError::InvalidPhrase);
    }

    let mut hasher = Sha256::new();
    hasher.update(phrase.as_bytes());
    hasher.update(PHRASE_SALT);
    let mut digest: [u8; 32] = hasher.finalize().into();

    let encoded = base64::Engine::encode(&base64::engine::general_purpose::URL_SAFE, digest);
    digest.zeroize();

    Ok(VaultKey { encoded })
}
