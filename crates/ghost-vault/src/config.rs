//! Configuration for a vault and its driver.
//!
//! Read from a JSON file (by convention `config/config.json`):
//!
//! ```json
//! {
//!     "vault": {
//!         "location": "vault_data",
//!         "encryption_enabled": true,
//!         "purge_malformed": false
//!     },
//!     "modes": {
//!         "persistent_memory": true,
//!         "debug_mode": false
//!     }
//! }
//! ```
//!
//! Every field is optional; missing fields take the defaults shown above.
//! Unknown top-level sections are ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

/// Conventional location of the config file, relative to the working
/// directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// Default vault directory.
pub const DEFAULT_VAULT_LOCATION: &str = "vault_data";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhostConfig {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub modes: ModesConfig,
}

/// Settings consumed by [`GhostVault::open`](crate::vault::GhostVault::open).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Directory holding the record files. Created if absent.
    #[serde(default = "default_location")]
    pub location: PathBuf,

    /// When false, records are written as plaintext JSON with no
    /// confidentiality and no integrity protection.
    #[serde(default = "default_true")]
    pub encryption_enabled: bool,

    /// Remove record files that are not valid tokens at all. Files that
    /// merely fail authentication, and plaintext JSON records, are always
    /// kept.
    ///
    /// The file is re-read and removed only if it still holds the bytes that
    /// were rejected. A `store` to the same id that renames its record in
    /// after that comparison can still be deleted; leave this off when
    /// writers run concurrently with readers.
    #[serde(default)]
    pub purge_malformed: bool,
}

/// Driver behaviour switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModesConfig {
    /// When false, drivers should not write new records.
    #[serde(default = "default_true")]
    pub persistent_memory: bool,

    #[serde(default)]
    pub debug_mode: bool,
}

fn default_location() -> PathBuf {
    PathBuf::from(DEFAULT_VAULT_LOCATION)
}

fn default_true() -> bool {
    true
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            encryption_enabled: true,
            purge_malformed: false,
        }
    }
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self {
            persistent_memory: true,
            debug_mode: false,
        }
    }
}

impl VaultConfig {
    /// Encrypted vault rooted at `location`, other settings default.
    pub fn at(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }
}

impl GhostConfig {
    /// Parse a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidConfig` if the JSON is malformed or a
    /// field has the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| VaultError::InvalidConfig(e.to_string()))
    }

    /// Load the configuration file at `path`.
    ///
    /// A missing file is not an error: defaults are returned and a warning
    /// is logged.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidConfig` if the file exists but cannot be
    /// parsed, or `VaultError::Io` if it cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("config {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(VaultError::Io(e)),
        };

        let config = Self::from_json_str(&json).map_err(|e| match e {
            VaultError::InvalidConfig(msg) => {
                VaultError::InvalidConfig(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}
