// src/config/mod.rs

//! Configuration loading and validation for defi.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate values and build the language table (`validate.rs`).
//! - Merge CLI arguments over the file into an [`AppConfig`].

pub mod loader;
pub mod model;
pub mod validate;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::cli::CliArgs;
use crate::errors::{DefiError, Result};
use crate::exec::language::LanguageTable;
use crate::fs::FileSystem;
use crate::watch::{resolve, WatchSpec, DEFAULT_POLL_INTERVAL};

pub use loader::{load_and_validate, load_from_path, load_optional, DEFAULT_CONFIG_FILE};
pub use model::{ConfigFile, ConfigSection, LanguageConfig, RawConfigFile};

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub spec: WatchSpec,
    pub interval: Duration,
    pub once: bool,
    pub compile_flags: Vec<String>,
    pub case_timeout: Option<Duration>,
    pub languages: LanguageTable,
}

impl AppConfig {
    /// Build from CLI arguments, reading the config file from disk.
    pub fn from_args(args: &CliArgs, work_dir: &Path, fs: &dyn FileSystem) -> Result<Self> {
        let file = load_optional(args.config.as_deref().map(Path::new), work_dir)?;
        Self::merge(args, file, fs)
    }

    /// Merge CLI arguments over an already validated config file.
    ///
    /// CLI values take precedence; non-empty `--compile-flag`s replace the
    /// file's `compile_flags` entirely.
    pub fn merge(args: &CliArgs, file: ConfigFile, fs: &dyn FileSystem) -> Result<Self> {
        let interval = match validate::validate_seconds("--interval", args.interval)? {
            Some(d) => d,
            None => file.interval.unwrap_or(DEFAULT_POLL_INTERVAL),
        };
        let case_timeout = validate::validate_seconds("--case-timeout", args.case_timeout)?.or(file.case_timeout);
        let compile_flags = if args.compile_flags.is_empty() {
            file.compile_flags
        } else {
            args.compile_flags.clone()
        };

        let spec = WatchSpec::parse(&args.target, fs)?;
        debug!(?spec, ?interval, ?case_timeout, "configuration resolved");

        Ok(Self {
            spec,
            interval,
            once: args.once,
            compile_flags,
            case_timeout,
            languages: file.languages,
        })
    }

    /// Resolve the file to run first.
    ///
    /// Nothing matching is an error in single-shot mode and `None` otherwise;
    /// the watcher will pick up the first file that appears.
    pub fn initial_path(&self, fs: &dyn FileSystem) -> Result<Option<PathBuf>> {
        let resolved = resolve(&self.spec, &self.languages, fs)?;
        match resolved {
            Some(target) => Ok(Some(target.path)),
            None if self.once => Err(DefiError::NoMatchingFiles(self.spec.display_base())),
            None => Ok(None),
        }
    }
}
