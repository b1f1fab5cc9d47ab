//! Subcommand implementations and the helpers they share.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use chalkboard_store::{load_config_from, Library, Persistence};

pub mod delete;
pub mod grade;
pub mod import;
pub mod init;
pub mod list;
pub mod quiz;
pub mod validate;

/// Options accepted by every subcommand.
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

/// Load the configuration and open the library it points at.
pub fn open_library(opts: &GlobalOpts) -> Result<Library> {
    let mut config = load_config_from(opts.config.as_deref())?;
    if let Some(dir) = &opts.data_dir {
        config.data_dir = dir.clone();
    }
    config.open_library()
}

/// Ask a yes/no question. Anything but `y`/`yes` (including end of input)
/// counts as no.
pub fn confirm(prompt: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    write!(out, "{prompt} [y/N] ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(out)?;
        return Ok(false);
    }
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Tell the user when a change could not be written to storage.
pub fn report_persistence(persistence: Persistence) {
    if persistence.is_degraded() {
        eprintln!(
            "Warning: the library could not be saved (storage full or unavailable). \
             This change only lasts until chalkboard exits."
        );
    }
}
