//! Ghost Vault — phrase-gated encrypted record store.
//!
//! Maps an opaque memory id to a JSON payload, one file per record. Each
//! record is sealed with ChaCha20-Poly1305 under a key derived from a wake
//! phrase supplied on every call. The phrase and the key are never stored.
//!
//! ```no_run
//! use ghost_vault::GhostVault;
//! use serde_json::json;
//!
//! # fn main() -> ghost_vault::Result<()> {
//! let vault = GhostVault::new("vault_data")?;
//! vault.store("note-1", &json!({"text": "hi"}), "remember the sunflower")?;
//! let payload = vault.retrieve("note-1", "remember the sunflower")?;
//! assert_eq!(payload["text"], "hi");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod id;
pub mod storage;
pub mod vault;

// Re-export primary types
pub use config::{GhostConfig, ModesConfig, VaultConfig};
pub use crypto::{derive_key, VaultKey};
pub use error::{Result, VaultError};
pub use id::{generate_memory_id, RecordKey};
pub use vault::GhostVault;

/// Open JSON payload type accepted and returned by the vault.
pub use serde_json::Value as Payload;
