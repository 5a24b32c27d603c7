//! Record files — one file per memory, named by record key.
//!
//! ```text
//! {vault_location}/
//! ├── {sha256(memory_id)}.mem       sealed token or plaintext JSON
//! └── .{record_key}.{rand}.tmp      in-flight write, renamed into place
//! ```
//!
//! Writes go through a uniquely named sibling temp file and `rename`, so a
//! reader sees either the previous complete record or the new one.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::crypto::random::random_hex;
use crate::error::Result;
use crate::id::RecordKey;

/// Extension marking a file as a vault record.
pub const RECORD_EXTENSION: &str = "mem";

/// Path of the record file for `key` inside `root`.
pub fn record_path(root: &Path, key: &RecordKey) -> PathBuf {
    root.join(format!("{}.{RECORD_EXTENSION}", key.as_str()))
}

/// Write `data` to `path` atomically using a sibling temporary file.
///
/// The temp file is flushed to disk before the rename and removed if any
/// step fails. The parent directory is synced after the rename so the new
/// directory entry survives a crash.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let tmp_path = temp_path_for(path);

    let written = write_and_sync(&tmp_path, data).and_then(|()| {
        std::fs::rename(&tmp_path, path)?;
        Ok(())
    });

    if written.is_ok() {
        if let Some(parent) = path.parent() {
            sync_dir(parent)?;
        }
    }

    if written.is_err() {
        // Best effort: the temp file may not exist if creation failed.
        let _ = std::fs::remove_file(&tmp_path);
    }

    written
}

/// Read a record file. Returns `Ok(None)` if it does not exist.
pub fn read_record(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Remove a record file. Returns `Ok(false)` if it did not exist.
pub fn remove_record(path: &Path) -> Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Remove a record file only if its contents still equal `expected`.
///
/// Returns `Ok(false)` if the file is gone or has been replaced. A writer
/// that renames a new record in between the comparison and the removal can
/// still lose its write.
pub fn remove_record_if_unchanged(path: &Path, expected: &[u8]) -> Result<bool> {
    match read_record(path)? {
        Some(current) if current == expected => remove_record(path),
        _ => Ok(false),
    }
}

/// Record keys of every record file directly inside `root`.
///
/// Temp files, dotfiles and anything not named `{64 hex}.mem` are skipped.
/// The returned list is not sorted in any particular order.
pub fn list_record_keys(root: &Path) -> Result<Vec<RecordKey>> {
    let mut keys = Vec::new();

    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let name = entry.file_name();
        let name_str = name.to_string_lossy();

        if let Some(key) = name_str
            .strip_suffix(RECORD_EXTENSION)
            .and_then(|s| s.strip_suffix('.'))
            .and_then(RecordKey::from_stem)
        {
            keys.push(key);
        }
    }

    Ok(keys)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn temp_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{stem}.{}.tmp", random_hex::<6>()))
}

fn write_and_sync(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    File::open(dir)?.sync_all()?;
    Ok(())
}

// Directory handles cannot be synced this way outside unix.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
