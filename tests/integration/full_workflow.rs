//! Full workflow integration test.
//!
//! Walks a record through its whole lifecycle: store, denied retrieval with
//! the wrong phrase, retrieval with the right phrase, overwrite under a new
//! phrase, deletion, and a second deletion.

use ghost_vault::{generate_memory_id, GhostConfig, GhostVault, RecordKey, VaultError};
use serde_json::json;

#[test]
fn test_sunflower_scenario() {
    let tmp = tempfile::tempdir().unwrap();
    let vault = GhostVault::new(tmp.path().join("vault_data")).unwrap();

    let memory_id = "user_interaction_ghost_123";
    let payload = json!({
        "interaction_text": "The user shared a memory about a summer field.",
        "secret_flag": true
    });

    vault
        .store(memory_id, &payload, "remember the sunflower")
        .expect("store should succeed");

    // ── Wrong phrase is denied ───────────────────────────────────────────────
    let denied = vault.retrieve(memory_id, "forget the moon");
    assert!(
        matches!(denied, Err(VaultError::AccessDenied)),
        "wrong phrase must be denied, got {denied:?}"
    );

    // ── Right phrase returns the exact payload ───────────────────────────────
    let retrieved = vault
        .retrieve(memory_id, "remember the sunflower")
        .expect("retrieve should succeed");
    assert_eq!(retrieved, payload);
}

#[test]
fn test_full_lifecycle() {
    let tmp = tempfile::tempdir().unwrap();
    let vault = GhostVault::new(tmp.path()).unwrap();
    let id = generate_memory_id("interaction");

    // Absent
    assert!(!vault.contains(&id));
    assert!(vault.retrieve(&id, "p").unwrap_err().is_not_found());

    // Absent → Stored
    vault.store(&id, &json!({"step": 1}), "phrase-a").unwrap();
    assert!(vault.contains(&id));
    assert_eq!(vault.record_keys().unwrap(), vec![RecordKey::for_memory(&id)]);

    // Stored → Stored (overwrite under a new phrase)
    vault.store(&id, &json!({"step": 2}), "phrase-b").unwrap();
    assert_eq!(vault.retrieve(&id, "phrase-b").unwrap(), json!({"step": 2}));
    assert!(vault.retrieve(&id, "phrase-a").unwrap_err().is_access_denied());

    // Stored → Absent
    vault.delete(&id).unwrap();
    assert!(!vault.contains(&id));
    assert!(vault.delete(&id).unwrap_err().is_not_found());
    assert!(vault.record_keys().unwrap().is_empty());
}

#[test]
fn test_vault_from_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = tmp.path().join("config.json");
    let vault_dir = tmp.path().join("memories");
    std::fs::write(
        &config_path,
        serde_json::to_string_pretty(&json!({
            "vault": {"location": vault_dir, "encryption_enabled": true},
            "modes": {"persistent_memory": true, "debug_mode": false}
        }))
        .unwrap(),
    )
    .unwrap();

    let config = GhostConfig::load(&config_path).unwrap();
    let vault = GhostVault::open(&config.vault).unwrap();
    assert!(vault_dir.is_dir());

    vault.store("m", &json!({"ok": true}), "p").unwrap();
    assert_eq!(vault.locate("m").parent().unwrap(), vault_dir.as_path());
}

#[test]
fn test_records_independent_of_each_other() {
    let tmp = tempfile::tempdir().unwrap();
    let vault = GhostVault::new(tmp.path()).unwrap();

    vault.store("alpha", &json!("a"), "phrase-alpha").unwrap();
    vault.store("beta", &json!("b"), "phrase-beta").unwrap();

    // Each record only opens with its own phrase.
    assert_eq!(vault.retrieve("alpha", "phrase-alpha").unwrap(), json!("a"));
    assert_eq!(vault.retrieve("beta", "phrase-beta").unwrap(), json!("b"));
    assert!(vault.retrieve("alpha", "phrase-beta").unwrap_err().is_access_denied());

    // Deleting one leaves the other.
    vault.delete("alpha").unwrap();
    assert_eq!(vault.retrieve("beta", "phrase-beta").unwrap(), json!("b"));
}

#[test]
fn test_reopened_vault_reads_existing_records() {
    let tmp = tempfile::tempdir().unwrap();
    {
        let vault = GhostVault::new(tmp.path()).unwrap();
        vault.store("persist", &json!({"n": 42}), "phrase").unwrap();
    }

    let reopened = GhostVault::new(tmp.path()).unwrap();
    assert_eq!(
        reopened.retrieve("persist", "phrase").unwrap(),
        json!({"n": 42})
    );
}

#[test]
fn test_no_key_material_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let vault = GhostVault::new(tmp.path()).unwrap();
    vault.store("m", &json!(1), "remember the sunflower").unwrap();

    let key = ghost_vault::derive_key("remember the sunflower").unwrap();
    let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "only the record file should exist");

    let raw = std::fs::read_to_string(vault.locate("m")).unwrap();
    assert!(!raw.contains(key.as_str()));
    assert!(!raw.contains("sunflower"));
    assert!(!tmp.path().join(".vault_key").exists());
}
