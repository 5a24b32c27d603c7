//! Resilience tests: corrupted files, wrong phrases, tampered data.

use ghost_vault::{GhostVault, VaultConfig, VaultError};
use serde_json::json;

fn stored_vault(tmp: &tempfile::TempDir) -> GhostVault {
    let vault = GhostVault::new(tmp.path()).unwrap();
    vault
        .store("victim", &json!({"secret": "do not leak"}), "test_phrase")
        .unwrap();
    vault
}

#[test]
fn resilience_flipped_bytes_denied() {
    let tmp = tempfile::tempdir().unwrap();
    let vault = stored_vault(&tmp);
    let path = vault.locate("victim");

    // Replace base64 characters in the middle with other valid ones.
    {
        let mut data = std::fs::read(&path).unwrap();
        for item in data.iter_mut().take(40).skip(30) {
            *item = if *item == b'A' { b'B' } else { b'A' };
        }
        std::fs::write(&path, data).unwrap();
    }

    let result = vault.retrieve("victim", "test_phrase");
    assert!(
        matches!(result, Err(VaultError::AccessDenied)),
        "tampered record must be denied, got {result:?}"
    );
}

#[test]
fn resilience_truncated_file_denied() {
    let tmp = tempfile::tempdir().unwrap();
    let vault = stored_vault(&tmp);
    let path = vault.locate("victim");

    {
        let data = std::fs::read(&path).unwrap();
        let half = data.len() / 2;
        std::fs::write(&path, &data[..half]).unwrap();
    }

    assert!(vault
        .retrieve("victim", "test_phrase")
        .unwrap_err()
        .is_access_denied());
}

#[test]
fn resilience_empty_file_denied() {
    let tmp = tempfile::tempdir().unwrap();
    let vault = GhostVault::new(tmp.path()).unwrap();
    std::fs::write(vault.locate("empty"), b"").unwrap();

    assert!(vault
        .retrieve("empty", "test_phrase")
        .unwrap_err()
        .is_access_denied());
}

#[test]
fn resilience_wrong_phrase_never_leaks() {
    let tmp = tempfile::tempdir().unwrap();
    let vault = stored_vault(&tmp);

    for wrong in ["test_phras", "test_phrase ", "TEST_PHRASE", "x", "test_phrase\n"] {
        match vault.retrieve("victim", wrong) {
            Err(VaultError::AccessDenied) => {}
            other => panic!("phrase {wrong:?} should be denied, got {other:?}"),
        }
    }

    // Still intact afterwards.
    assert_eq!(
        vault.retrieve("victim", "test_phrase").unwrap(),
        json!({"secret": "do not leak"})
    );
}

#[test]
fn resilience_denial_message_is_opaque() {
    let tmp = tempfile::tempdir().unwrap();
    let vault = stored_vault(&tmp);
    let err = vault.retrieve("victim", "wrong").unwrap_err();
    let msg = err.to_string();
    assert!(!msg.contains("do not leak"));
    assert!(!msg.contains("wrong"));
}

#[test]
fn resilience_swapped_records_denied_or_mismatched() {
    // Copying one record's file over another's path is not detected by the
    // AEAD (the id is not bound), but it still needs the right phrase.
    let tmp = tempfile::tempdir().unwrap();
    let vault = GhostVault::new(tmp.path()).unwrap();
    vault.store("a", &json!("A"), "phrase-a").unwrap();
    vault.store("b", &json!("B"), "phrase-b").unwrap();

    std::fs::copy(vault.locate("a"), vault.locate("b")).unwrap();
    assert!(vault.retrieve("b", "phrase-b").unwrap_err().is_access_denied());
}

#[test]
fn resilience_purge_only_removes_malformed() {
    let tmp = tempfile::tempdir().unwrap();
    let vault = GhostVault::open(&VaultConfig {
        location: tmp.path().to_path_buf(),
        encryption_enabled: true,
        purge_malformed: true,
    })
    .unwrap();

    vault.store("kept", &json!(1), "right").unwrap();
    for _ in 0..3 {
        assert!(vault.retrieve("kept", "mistyped").unwrap_err().is_access_denied());
    }
    assert!(vault.contains("kept"), "a mistyped phrase must never delete data");

    std::fs::write(vault.locate("junk"), b"%%% not a token %%%").unwrap();
    assert!(vault.retrieve("junk", "right").unwrap_err().is_access_denied());
    assert!(!vault.contains("junk"));
}

#[test]
fn resilience_purge_spares_record_written_in_plaintext_mode() {
    let tmp = tempfile::tempdir().unwrap();
    let config = |encryption_enabled, purge_malformed| VaultConfig {
        location: tmp.path().to_path_buf(),
        encryption_enabled,
        purge_malformed,
    };
    let plain = GhostVault::open(&config(false, false)).unwrap();
    let sealed = GhostVault::open(&config(true, true)).unwrap();

    plain.store("diary", &json!({"entry": "valid"}), "phrase").unwrap();

    let err = sealed.retrieve("diary", "phrase").unwrap_err();
    assert!(err.is_access_denied());
    assert!(sealed.contains("diary"), "a mode mismatch must not delete data");
    assert_eq!(
        plain.retrieve("diary", "phrase").unwrap(),
        json!({"entry": "valid"})
    );
}

#[test]
fn resilience_unwritable_location_reports_io() {
    let tmp = tempfile::tempdir().unwrap();
    // A regular file where the vault directory should be.
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();

    let result = GhostVault::new(&blocker);
    assert!(matches!(result, Err(VaultError::Io(_))));
}
