//! The `chalkboard list` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use chalkboard_core::{ExamEntry, LibraryEntry};

use super::{open_library, GlobalOpts};

pub fn execute(opts: &GlobalOpts) -> Result<()> {
    let library = open_library(opts)?;

    if library.is_empty() {
        println!("Library is empty. Import a bank with `chalkboard import <FILE>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Added", "Questions"]);

    for entry in library.entries() {
        let added = entry
            .added_at()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        match entry {
            LibraryEntry::Exam(exam) => {
                table.add_row(vec![
                    Cell::new(&exam.id),
                    Cell::new(&exam.name),
                    Cell::new(added),
                    Cell::new(exam.data.items.len()),
                ]);
            }
            LibraryEntry::Folder(folder) => {
                table.add_row(vec![
                    Cell::new(&folder.id),
                    Cell::new(format!("{} ({} parts)", folder.name, folder.children.len())),
                    Cell::new(added),
                    Cell::new(entry.question_count()),
                ]);
                for child in &folder.children {
                    table.add_row(child_row(child));
                }
            }
        }
    }

    println!("{table}");
    Ok(())
}

fn child_row(child: &ExamEntry) -> Vec<Cell> {
    vec![
        Cell::new(format!("  {}", child.id)),
        Cell::new(format!("  {}", child.name)),
        Cell::new(""),
        Cell::new(child.data.items.len()),
    ]
}
