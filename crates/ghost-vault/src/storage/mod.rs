//! Storage layer for vault records.
//!
//! # Directory layout
//!
//! ```text
//! vault_data/
//! ├── {sha256(memory_id)}.mem
//! └── {sha256(memory_id)}.mem
//! ```
//!
//! No index and no key material live next to the records; the directory
//! listing is the only catalogue.
//!
//! # Modules
//!
//! - [`record_file`] — path derivation, atomic writes, reads, removal and
//!   listing of record files.

pub mod record_file;

pub use record_file::{
    list_record_keys, read_record, record_path, remove_record, remove_record_if_unchanged,
    write_atomic, RECORD_EXTENSION,
};
