//! The `chalkboard import` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use chalkboard_core::import::bank_name_from_file;
use chalkboard_core::LibraryEntry;

use super::{open_library, report_persistence, GlobalOpts};

pub fn execute(opts: &GlobalOpts, file: PathBuf, name: Option<String>) -> Result<()> {
    let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read question bank: {}", file.display()))?;

    let name = name.unwrap_or_else(|| {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        bank_name_from_file(&file_name)
    });

    let mut library = open_library(opts)?;
    let outcome = library.import(&raw, &name).with_context(|| {
        format!(
            "failed to import {}. Ensure it is a valid JSON question bank",
            file.display()
        )
    })?;

    match &outcome.entry {
        LibraryEntry::Exam(exam) => {
            println!(
                "Imported \"{}\" ({} questions) as {}",
                exam.name,
                exam.data.items.len(),
                exam.id
            );
        }
        LibraryEntry::Folder(folder) => {
            println!(
                "Imported \"{}\" as folder {} with {} parts:",
                folder.name,
                folder.id,
                folder.children.len()
            );
            for child in &folder.children {
                println!(
                    "  {}  {} ({} questions)",
                    child.id,
                    child.name,
                    child.data.items.len()
                );
            }
        }
    }

    report_persistence(outcome.persistence);
    Ok(())
}
