//! Cryptographic primitives for Ghost Vault.
//!
//! This module provides:
//! - Wake-phrase key derivation (salted SHA-256, HKDF-SHA256 expansion)
//! - ChaCha20-Poly1305 record tokens
//! - Cryptographically secure random number generation

pub mod derivation;
pub mod encryption;
pub mod random;

pub use derivation::{derive_key, VaultKey};
pub use encryption::{open, seal};
