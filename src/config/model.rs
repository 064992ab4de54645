// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::language::LanguageTable;

/// Raw top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// interval = 1
/// compile_flags = ["-O2"]
/// case_timeout = 5
///
/// [language.".c"]
/// compiler = "cc"
/// flags = ["-std=c11"]
/// label = "C"
/// ```
///
/// All sections are optional. Use [`ConfigFile`] (via `TryFrom`) for the
/// validated form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Extra or replacement languages from `[language."<ext>"]`.
    ///
    /// Keys are extensions including the leading dot (e.g. `".c"`).
    #[serde(default)]
    pub language: BTreeMap<String, LanguageConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// Polling interval in seconds.
    #[serde(default)]
    pub interval: Option<u64>,

    /// Flags replacing every language's default flags when non-empty.
    #[serde(default)]
    pub compile_flags: Vec<String>,

    /// Per-case timeout in seconds; unbounded when absent.
    #[serde(default)]
    pub case_timeout: Option<u64>,
}

/// `[language."<ext>"]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageConfig {
    /// Compiler executable, looked up in `PATH` unless it contains a separator.
    pub compiler: String,

    /// Default flags, placed before the source path.
    #[serde(default)]
    pub flags: Vec<String>,

    /// Display label; defaults to the extension without its dot.
    #[serde(default)]
    pub label: Option<String>,
}

/// Validated configuration file.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub interval: Option<Duration>,
    pub compile_flags: Vec<String>,
    pub case_timeout: Option<Duration>,
    /// Built-in table extended with the file's `[language]` entries.
    pub languages: LanguageTable,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            interval: None,
            compile_flags: Vec::new(),
            case_timeout: None,
            languages: LanguageTable::default(),
        }
    }
}
