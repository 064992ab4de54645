// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "defi.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the explicit config file, or `defi.toml` in `work_dir` if it exists.
///
/// An explicit path must exist; the implicit one is optional and yields the
/// default configuration when missing.
pub fn load_optional(explicit: Option<&Path>, work_dir: &Path) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config file");
        return load_and_validate(path);
    }

    let implicit = default_config_path(work_dir);
    if implicit.is_file() {
        debug!(path = %implicit.display(), "loading default config file");
        return load_and_validate(&implicit);
    }
    Ok(ConfigFile::default())
}

/// `defi.toml` inside `work_dir`.
pub fn default_config_path(work_dir: &Path) -> PathBuf {
    work_dir.join(DEFAULT_CONFIG_FILE)
}
