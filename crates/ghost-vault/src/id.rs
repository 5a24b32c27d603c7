//! Memory ids and record keys.
//!
//! A memory id is any caller-chosen string. It is never written to disk;
//! only its SHA-256 hex digest, the [`RecordKey`], names the record file.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::crypto::random::random_hex;

/// SHA-256 hex digest of a memory id. Used as the record file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey(pub String);

impl RecordKey {
    /// Hash a memory id into its record key.
    pub fn for_memory(memory_id: &str) -> Self {
        Self(hex::encode(Sha256::digest(memory_id.as_bytes())))
    }

    /// Parse a file stem back into a record key.
    ///
    /// Returns `None` unless `stem` is exactly 64 lowercase hex characters.
    pub fn from_stem(stem: &str) -> Option<Self> {
        let valid = stem.len() == 64
            && stem
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid.then(|| Self(stem.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate a fresh memory id of the form
/// `{prefix}_{YYYYmmddTHHMMSS.ffffff}_{8 hex}`.
///
/// The timestamp is UTC. The random suffix keeps ids unique when several
/// are generated within the same microsecond.
pub fn generate_memory_id(prefix: &str) -> String {
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.6f");
    format!("{prefix}_{stamp}_{}", random_hex::<4>())
}
