//! Question bank import.
//!
//! Parses an uploaded bank, validates its shape and turns it into a library
//! entry. Banks larger than the chunk size are split into parts grouped under
//! a folder.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ImportError;
use crate::model::{ExamData, ExamEntry, FolderEntry, InputMode, LibraryEntry, QuestionItem};

/// Default number of questions per exam part.
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// How oversized banks are split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionPolicy {
    chunk_size: NonZeroUsize,
}

impl PartitionPolicy {
    /// Returns `None` for a chunk size of zero.
    pub fn new(chunk_size: usize) -> Option<Self> {
        NonZeroUsize::new(chunk_size).map(|chunk_size| Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size.get()
    }
}

impl Default for PartitionPolicy {
    fn default() -> Self {
        Self {
            chunk_size: NonZeroUsize::new(DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// Generate a library id: milliseconds since the epoch plus a random suffix.
pub fn generate_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..9])
}

/// Derive a display name from an uploaded file name (`bank.json` -> `bank`).
pub fn bank_name_from_file(file_name: &str) -> String {
    file_name.replacen(".json", "", 1)
}

/// Cut the text down to the span between the first `{` and the last `}`.
///
/// Exports are often wrapped in a header or footer line; those are dropped.
/// Text without a brace pair is returned unchanged.
pub fn extract_document(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start <= end => &raw[start..=end],
        _ => raw,
    }
}

/// Parse a bank document into [`ExamData`].
pub fn parse_bank(raw: &str) -> Result<ExamData, ImportError> {
    let document: Value = serde_json::from_str(extract_document(raw))?;
    let Value::Object(mut fields) = document else {
        return Err(ImportError::NotAnObject);
    };

    let items = match fields.get_mut("items") {
        Some(Value::Array(items)) => std::mem::take(items),
        _ => return Err(ImportError::MissingItems),
    };

    let items = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<QuestionItem>(item)
                .map_err(|source| ImportError::InvalidItem { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Remaining fields go to `extra` untouched, whatever their type.
    let mut data: ExamData = serde_json::from_value(Value::Object(fields))?;
    data.items = items;
    Ok(data)
}

/// Turn parsed exam data into a library entry, splitting it if it holds more
/// than `policy.chunk_size()` questions.
pub fn partition(data: ExamData, name: &str, policy: PartitionPolicy) -> LibraryEntry {
    let chunk_size = policy.chunk_size();
    let now = Utc::now().timestamp_millis();

    if data.items.len() <= chunk_size {
        tracing::debug!(name, items = data.items.len(), "importing as a single exam");
        return LibraryEntry::Exam(ExamEntry {
            id: generate_id(),
            name: name.to_string(),
            date_added: now,
            data,
        });
    }

    let total_parts = data.items.len().div_ceil(chunk_size);
    tracing::debug!(
        name,
        items = data.items.len(),
        parts = total_parts,
        "splitting bank into parts"
    );

    let ExamData { items, extra } = data;
    let children = items
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, chunk)| ExamEntry {
            id: generate_id(),
            name: format!("{name} - Part {}/{total_parts}", index + 1),
            date_added: now,
            data: ExamData {
                items: chunk.to_vec(),
                extra: extra.clone(),
            },
        })
        .collect();

    LibraryEntry::Folder(FolderEntry {
        id: generate_id(),
        name: name.to_string(),
        date_added: now,
        children,
    })
}

/// Parse a bank and turn it into a library entry.
pub fn import_bank(
    raw: &str,
    name: &str,
    policy: PartitionPolicy,
) -> Result<LibraryEntry, ImportError> {
    let data = parse_bank(raw)?;
    Ok(partition(data, name, policy))
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub item_id: Option<i64>,
    /// Warning message.
    pub message: String,
}

/// Check a bank for issues that do not block import but make questions
/// impossible to answer correctly.
pub fn validate_bank(data: &ExamData) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for item in &data.items {
        if !seen_ids.insert(item.id) {
            warnings.push(ValidationWarning {
                item_id: Some(item.id),
                message: format!("duplicate question ID: {}", item.id),
            });
        }
    }

    for item in &data.items {
        let key = item.correct_answer.as_deref().unwrap_or_default();
        if key.is_empty() {
            warnings.push(ValidationWarning {
                item_id: Some(item.id),
                message: "no correct answer provided".into(),
            });
            continue;
        }

        if item.input_mode() == InputMode::Choice && !item.options.is_empty() {
            for answer in key {
                if !item.options.iter().any(|option| option.text == *answer) {
                    warnings.push(ValidationWarning {
                        item_id: Some(item.id),
                        message: format!("correct answer {answer:?} is not one of the options"),
                    });
                }
            }
        }
    }

    if data.items.is_empty() {
        warnings.push(ValidationWarning {
            item_id: None,
            message: "bank contains no questions".into(),
        });
    }

    warnings
}
