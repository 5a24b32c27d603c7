//! Basic Vault — store a memory, try the wrong phrase, read it back, delete it.
//!
//! Run with:
//!   cargo run --example basic_vault -p ghost-vault

use ghost_vault::{derive_key, GhostVault, VaultError};
use serde_json::json;

fn main() {
    let tmp = tempfile::tempdir().expect("temp dir");

    // ── 1. Open a vault ─────────────────────────────────────────────────────
    //
    // The directory is created if missing. No key file is written: every
    // record is sealed under a key derived from the phrase given per call.
    let vault = GhostVault::new(tmp.path().join("vault_data")).expect("open vault");
    println!("Vault opened at {}", vault.location().display());
    println!();

    // ── 2. Store a memory ───────────────────────────────────────────────────
    let memory_id = "user_interaction_ghost_123";
    let payload = json!({
        "interaction_text": "The user expressed joy about the new feature.",
        "secret_flag": true
    });
    vault
        .store(memory_id, &payload, "remember the sunflower")
        .expect("store should succeed");
    println!("Stored '{memory_id}'");
    println!("  File: {}", vault.locate(memory_id).display());
    println!();

    // ── 3. The wrong phrase is denied ───────────────────────────────────────
    match vault.retrieve(memory_id, "forget the moon") {
        Err(VaultError::AccessDenied) => println!("'forget the moon'        -> access denied"),
        other => panic!("expected denial, got {other:?}"),
    }

    // ── 4. The right phrase returns the payload ─────────────────────────────
    let retrieved = vault
        .retrieve(memory_id, "remember the sunflower")
        .expect("retrieve should succeed");
    assert_eq!(retrieved, payload);
    println!("'remember the sunflower' -> {retrieved}");
    println!();

    // ── 5. Keys are deterministic ───────────────────────────────────────────
    let k1 = derive_key("remember the sunflower").expect("derive");
    let k2 = derive_key("remember the sunflower").expect("derive");
    assert_eq!(k1, k2);
    println!("Same phrase => same key: confirmed");
    println!();

    // ── 6. Delete (no phrase needed) ────────────────────────────────────────
    vault.delete(memory_id).expect("delete should succeed");
    println!("Deleted '{memory_id}'");
    match vault.delete(memory_id) {
        Err(VaultError::NotFound(_)) => println!("Second delete          -> not found"),
        other => panic!("expected not found, got {other:?}"),
    }
}
