//! Configuration loading and library construction.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use chalkboard_core::import::DEFAULT_CHUNK_SIZE;
use chalkboard_core::PartitionPolicy;

use crate::backend::FileStore;
use crate::library::{Library, DEFAULT_STORAGE_KEY};

/// Top-level chalkboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChalkboardConfig {
    /// Directory holding the library slot.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Name of the storage slot.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Banks with more questions than this are split into parts.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Maximum size of the stored library in bytes (0 = unlimited).
    #[serde(default = "default_quota")]
    pub storage_quota_bytes: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./.chalkboard")
}
fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}
fn default_quota() -> u64 {
    5 * 1024 * 1024
}

impl Default for ChalkboardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            chunk_size: default_chunk_size(),
            storage_quota_bytes: default_quota(),
        }
    }
}

impl ChalkboardConfig {
    /// The partition policy for imports.
    pub fn partition_policy(&self) -> Result<PartitionPolicy> {
        PartitionPolicy::new(self.chunk_size)
            .ok_or_else(|| anyhow::anyhow!("chunk_size must be at least 1"))
    }

    /// Slot capacity, `None` if unlimited.
    pub fn quota(&self) -> Option<u64> {
        (self.storage_quota_bytes > 0).then_some(self.storage_quota_bytes)
    }

    /// Open the file-backed library this configuration describes.
    pub fn open_library(&self) -> Result<Library> {
        let policy = self.partition_policy()?;
        let store = FileStore::new(&self.data_dir).with_quota(self.quota());
        tracing::debug!(dir = %self.data_dir.display(), key = %self.storage_key, "opening library");
        Ok(Library::open(Box::new(store), &self.storage_key, policy))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Apply `CHALKBOARD_*` overrides using `lookup` to read variables.
fn apply_env_overrides(
    config: &mut ChalkboardConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(dir) = lookup("CHALKBOARD_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(size) = lookup("CHALKBOARD_CHUNK_SIZE") {
        config.chunk_size = size
            .trim()
            .parse()
            .with_context(|| format!("invalid CHALKBOARD_CHUNK_SIZE: {size}"))?;
    }
    Ok(())
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `chalkboard.toml` in the current directory
/// 2. `~/.config/chalkboard/config.toml`
///
/// Environment variable overrides: `CHALKBOARD_DATA_DIR`, `CHALKBOARD_CHUNK_SIZE`.
pub fn load_config() -> Result<ChalkboardConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ChalkboardConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("chalkboard.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ChalkboardConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ChalkboardConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));
    config.partition_policy()?;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("chalkboard"))
}
