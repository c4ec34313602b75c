//! Configuration file loading and data folder resolution

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Data folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. Environment variable
/// 3. OS-dependent compiled default
pub fn resolve_data_folder(cli_arg: Option<&Path>, env_var_name: &str) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    default_data_folder()
}

/// OS-dependent default data folder
pub fn default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/ridematch (or /var/lib/ridematch for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("ridematch"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/ridematch"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("ridematch"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/ridematch"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("ridematch"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\ridematch"))
    } else {
        PathBuf::from("./ridematch_data")
    }
}

/// Parse a TOML configuration file
pub fn load_toml_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))
}

/// Parse a TOML configuration file, falling back to defaults when absent
///
/// A missing file is not fatal: a warning is logged and the default value is
/// returned so the service can still start. A file that exists but does not
/// parse is an error.
pub fn load_toml_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };

    if !path.exists() {
        warn!("Config file {} not found, using defaults", path.display());
        return Ok(T::default());
    }

    load_toml_file(path)
}
