//! The `chalkboard delete` and `chalkboard clear` commands.

use anyhow::{bail, Result};

use super::{confirm, open_library, report_persistence, GlobalOpts};

pub fn execute(opts: &GlobalOpts, id: String, folder: Option<String>, yes: bool) -> Result<()> {
    let mut library = open_library(opts)?;

    match folder {
        Some(folder_id) => {
            let Some(chalkboard_core::LibraryEntry::Folder(entry)) = library.entry(&folder_id)
            else {
                bail!("no folder with id {folder_id}");
            };
            let Some(part) = entry.children.iter().find(|c| c.id == id) else {
                bail!("folder {folder_id} has no part with id {id}");
            };
            let prompt = format!("Delete part \"{}\"?", part.name);
            if !yes && !ask(&prompt)? {
                println!("Aborted.");
                return Ok(());
            }

            let Some(removal) = library.delete_child(&folder_id, &id) else {
                bail!("folder {folder_id} has no part with id {id}");
            };
            println!("Deleted part {id}.");
            if removal.folder_removed {
                println!("Folder {folder_id} is now empty and was removed.");
            }
            report_persistence(removal.persistence);
        }
        None => {
            let Some(entry) = library.entry(&id) else {
                bail!("no library entry with id {id}");
            };
            let prompt = format!("Delete \"{}\"?", entry.name());
            if !yes && !ask(&prompt)? {
                println!("Aborted.");
                return Ok(());
            }

            let Some(persistence) = library.delete_entry(&id) else {
                bail!("no library entry with id {id}");
            };
            println!("Deleted {id}.");
            report_persistence(persistence);
        }
    }

    Ok(())
}

pub fn clear(opts: &GlobalOpts, yes: bool) -> Result<()> {
    let mut library = open_library(opts)?;

    if !yes && !ask("Clear the whole library?")? {
        println!("Aborted.");
        return Ok(());
    }

    let removed = library.entries().len();
    let persistence = library.clear();
    println!("Library cleared ({removed} entries removed).");
    report_persistence(persistence);
    Ok(())
}

fn ask(prompt: &str) -> Result<bool> {
    let stdin = std::io::stdin();
    confirm(prompt, &mut stdin.lock(), &mut std::io::stdout())
}
