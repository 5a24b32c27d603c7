//! Error types for Ghost Vault.
//!
//! All errors are strongly typed and returned to the caller; none of them
//! terminate the process. Wake phrases, derived keys and decrypted payloads
//! are never included in error messages.

/// Vault error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The wake phrase was empty.
    #[error("Invalid wake phrase: must not be empty")]
    InvalidPhrase,

    /// No record exists for the memory id.
    #[error("Memory not found: {0}")]
    NotFound(String),

    /// Authenticated decryption failed.
    ///
    /// A wrong wake phrase and a corrupted ciphertext produce this same
    /// variant so that a caller without the phrase cannot tell them apart.
    #[error("Access denied")]
    AccessDenied,

    /// The record decrypted correctly but its contents are not valid JSON
    /// (or not the shape the caller asked for).
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// Whether this error means "no record stored under that id".
    pub fn is_not_found(&self) -> bool {
        matches!(self, VaultError::NotFound(_))
    }

    /// Whether this error is the merged wrong-phrase / tampered-data denial.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, VaultError::AccessDenied)
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, VaultError>;
