//! The Ghost Vault — phrase-gated, per-record encrypted storage.
//!
//! Every record lives in its own file at
//! `{location}/{sha256(memory_id)}.mem`. With encryption enabled the file
//! holds a ChaCha20-Poly1305 token sealed under a key derived from the wake
//! phrase given to that call; the phrase and key are never stored. With
//! encryption disabled the file holds plaintext JSON, which gives no
//! confidentiality and no tamper detection.
//!
//! ```text
//!  Absent ──store──▶ Stored ──store──▶ Stored (last write wins)
//!                      │
//!                      └──delete──▶ Absent
//! ```
//!
//! The vault holds no locks. Concurrent stores to the same memory id race
//! and the last rename wins; readers never see a half-written file.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use zeroize::Zeroize;

use crate::config::VaultConfig;
use crate::crypto::derivation::derive_key;
use crate::crypto::encryption::{open_token, seal, Denial};
use crate::error::{Result, VaultError};
use crate::id::RecordKey;
use crate::storage::{
    list_record_keys, read_record, record_path, remove_record, remove_record_if_unchanged,
    write_atomic,
};

/// Filesystem-backed, phrase-gated record store.
#[derive(Debug, Clone)]
pub struct GhostVault {
    root: PathBuf,
    encryption_enabled: bool,
    purge_malformed: bool,
}

impl GhostVault {
    /// Open (and create if needed) the vault described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Io` if the directory cannot be created.
    pub fn open(config: &VaultConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.location)?;

        if config.encryption_enabled {
            log::info!("vault opened at {}", config.location.display());
        } else {
            log::warn!(
                "vault opened at {} with encryption DISABLED: records are plaintext and unauthenticated",
                config.location.display()
            );
        }

        Ok(Self {
            root: config.location.clone(),
            encryption_enabled: config.encryption_enabled,
            purge_malformed: config.purge_malformed,
        })
    }

    /// Open an encrypted vault at `location` with default settings.
    pub fn new(location: impl Into<PathBuf>) -> Result<Self> {
        Self::open(&VaultConfig::at(location))
    }

    /// Root directory of this vault.
    pub fn location(&self) -> &Path {
        &self.root
    }

    pub fn encryption_enabled(&self) -> bool {
        self.encryption_enabled
    }

    /// Path of the record file for `memory_id`, whether or not it exists.
    pub fn locate(&self, memory_id: &str) -> PathBuf {
        record_path(&self.root, &RecordKey::for_memory(memory_id))
    }

    /// Store `payload` under `memory_id`, sealed with `wake_phrase`.
    ///
    /// Overwrites any existing record for the id.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidPhrase` for an empty phrase,
    /// `VaultError::SerializationError` if the payload cannot be expressed
    /// as JSON, or `VaultError::Io` if the write fails.
    pub fn store<T>(&self, memory_id: &str, payload: &T, wake_phrase: &str) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        if wake_phrase.is_empty() {
            return Err(VaultError::InvalidPhrase);
        }

        // Going through `Value` sorts object keys, so equal payloads
        // serialize to equal bytes.
        let value =
            serde_json::to_value(payload).map_err(|e| VaultError::SerializationError(e.to_string()))?;
        let mut json =
            serde_json::to_vec(&value).map_err(|e| VaultError::SerializationError(e.to_string()))?;

        let key = RecordKey::for_memory(memory_id);
        let path = record_path(&self.root, &key);

        if self.encryption_enabled {
            let sealed = derive_key(wake_phrase).and_then(|vault_key| seal(&vault_key, &json));
            json.zeroize();
            write_atomic(&path, &sealed?)?;
        } else {
            write_atomic(&path, &json)?;
        }

        log::debug!(
            "stored record {} ({})",
            key.short(),
            if self.encryption_enabled { "sealed" } else { "plaintext" }
        );
        Ok(())
    }

    /// Retrieve the payload stored under `memory_id`.
    ///
    /// # Errors
    ///
    /// - `VaultError::NotFound` if no record exists (checked before the
    ///   phrase is looked at).
    /// - `VaultError::InvalidPhrase` for an empty phrase.
    /// - `VaultError::AccessDenied` if the record cannot be opened with this
    ///   phrase, whether because the phrase is wrong or the file is damaged.
    /// - `VaultError::CorruptRecord` if the record opened but is not JSON.
    pub fn retrieve(&self, memory_id: &str, wake_phrase: &str) -> Result<Value> {
        let mut plaintext = self.read_plaintext(memory_id, wake_phrase)?;
        let parsed = serde_json::from_slice(&plaintext);
        plaintext.zeroize();
        parsed.map_err(|e| VaultError::CorruptRecord(format!("invalid JSON payload: {e}")))
    }

    /// Retrieve and deserialize the payload into `T`.
    ///
    /// A payload that does not fit `T` is reported as
    /// `VaultError::CorruptRecord`.
    pub fn retrieve_as<T: DeserializeOwned>(&self, memory_id: &str, wake_phrase: &str) -> Result<T> {
        let value = self.retrieve(memory_id, wake_phrase)?;
        serde_json::from_value(value)
            .map_err(|e| VaultError::CorruptRecord(format!("unexpected payload shape: {e}")))
    }

    /// Delete the record for `memory_id`. No wake phrase is needed.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if there is nothing to delete, or
    /// `VaultError::Io` for other filesystem errors.
    pub fn delete(&self, memory_id: &str) -> Result<()> {
        let key = RecordKey::for_memory(memory_id);

        if remove_record(&record_path(&self.root, &key))? {
            log::debug!("deleted record {}", key.short());
            Ok(())
        } else {
            Err(VaultError::NotFound(memory_id.to_string()))
        }
    }

    /// Whether a record file exists for `memory_id`.
    pub fn contains(&self, memory_id: &str) -> bool {
        self.locate(memory_id).is_file()
    }

    /// Record keys of every record in the vault, in no particular order.
    ///
    /// Memory ids cannot be recovered from the files, so this is the most a
    /// listing can show.
    pub fn record_keys(&self) -> Result<Vec<RecordKey>> {
        list_record_keys(&self.root)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn read_plaintext(&self, memory_id: &str, wake_phrase: &str) -> Result<Vec<u8>> {
        let key = RecordKey::for_memory(memory_id);
        let path = record_path(&self.root, &key);

        let Some(bytes) = read_record(&path)? else {
            log::debug!("record {} not found", key.short());
            return Err(VaultError::NotFound(memory_id.to_string()));
        };

        if !self.encryption_enabled {
            if wake_phrase.is_empty() {
                return Err(VaultError::InvalidPhrase);
            }
            return Ok(bytes);
        }

        let vault_key = derive_key(wake_phrase)?;
        match open_token(&vault_key, &bytes)? {
            Ok(plaintext) => Ok(plaintext),
            Err(denial) => {
                log::debug!("record {} denied: {}", key.short(), denial.as_str());
                if denial == Denial::Malformed && self.purge_malformed {
                    self.purge(&path, &key, &bytes);
                }
                Err(VaultError::AccessDenied)
            }
        }
    }

    /// Remove a record whose bytes are not a token. Plaintext JSON written
    /// with encryption off is a mode mismatch, not damage, and is kept.
    fn purge(&self, path: &Path, key: &RecordKey, observed: &[u8]) {
        if serde_json::from_slice::<Value>(observed).is_ok() {
            log::debug!("record {} is plaintext JSON; not purging", key.short());
            return;
        }
        match remove_record_if_unchanged(path, observed) {
            Ok(true) => log::warn!("removed malformed record {}", key.short()),
            Ok(false) => log::debug!("record {} changed before purge; kept", key.short()),
            Err(e) => log::warn!("could not remove malformed record {}: {e}", key.short()),
        }
    }
}
