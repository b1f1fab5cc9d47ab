//! The `chalkboard validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use chalkboard_core::import::{parse_bank, validate_bank};

pub fn execute(file: PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read question bank: {}", file.display()))?;
    let data = parse_bank(&raw)
        .with_context(|| format!("failed to parse question bank: {}", file.display()))?;

    println!("Bank: {} ({} questions)", file.display(), data.items.len());
    if !data.source().is_empty() {
        println!("Source: {}", data.source());
    }

    let warnings = validate_bank(&data);
    for w in &warnings {
        let prefix = w
            .item_id
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Bank is valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
