//! Library document encoding and legacy schema migration.
//!
//! Libraries written before folders existed stored bare exam entries without
//! a `type` field. Those entries are read as exams.

use serde_json::Value;

use chalkboard_core::LibraryEntry;

use crate::error::StoreError;

/// Decoded library plus what happened to the stored entries on the way.
#[derive(Debug)]
pub struct DecodedLibrary {
    pub entries: Vec<LibraryEntry>,
    /// Entries that used the pre-folder schema.
    pub migrated: usize,
    /// Entries that could not be read and were dropped.
    pub skipped: usize,
}

/// Decode a stored library document.
///
/// Only a document that is not a JSON array fails. Entries that do not
/// match the entry schema are logged and skipped so the rest still load.
pub fn decode_library(raw: &str) -> Result<DecodedLibrary, StoreError> {
    let document: Value = serde_json::from_str(raw)?;
    let Value::Array(items) = document else {
        return Err(StoreError::Corrupt("expected a JSON array of entries".into()));
    };

    let mut decoded = DecodedLibrary {
        entries: Vec::with_capacity(items.len()),
        migrated: 0,
        skipped: 0,
    };
    for (index, mut item) in items.into_iter().enumerate() {
        let mut migrated = false;
        if let Value::Object(fields) = &mut item {
            if is_missing_tag(fields.get("type")) {
                fields.insert("type".into(), Value::String("exam".into()));
                migrated = true;
            }
        }

        match serde_json::from_value::<LibraryEntry>(item) {
            Ok(entry) => {
                decoded.entries.push(entry);
                decoded.migrated += usize::from(migrated);
            }
            Err(e) => {
                tracing::warn!(index, "skipping unreadable library entry: {e}");
                decoded.skipped += 1;
            }
        }
    }
    Ok(decoded)
}

/// Encode the library for storage.
pub fn encode_library(entries: &[LibraryEntry]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(entries)?)
}

// A null, empty or false tag counts as missing.
fn is_missing_tag(tag: Option<&Value>) -> bool {
    match tag {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}
