// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, LanguageConfig, RawConfigFile};
use crate::errors::{DefiError, Result};
use crate::exec::language::{Language, LanguageTable};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DefiError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let interval = validate_seconds("[config].interval", raw.config.interval)?;
        let case_timeout = validate_seconds("[config].case_timeout", raw.config.case_timeout)?;
        let languages = build_language_table(&raw)?;

        Ok(ConfigFile {
            interval,
            compile_flags: raw.config.compile_flags,
            case_timeout,
            languages,
        })
    }
}

/// Seconds must be >= 1 when given.
pub(crate) fn validate_seconds(name: &str, value: Option<u64>) -> Result<Option<Duration>> {
    match value {
        Some(0) => Err(DefiError::ConfigError(format!("{name} must be >= 1 (got 0)"))),
        Some(secs) => Ok(Some(Duration::from_secs(secs))),
        None => Ok(None),
    }
}

fn build_language_table(raw: &RawConfigFile) -> Result<LanguageTable> {
    let mut table = LanguageTable::default();
    for (ext, lang) in raw.language.iter() {
        validate_language(ext, lang)?;
        let label = lang
            .label
            .clone()
            .unwrap_or_else(|| ext.trim_start_matches('.').to_string());
        table.insert(
            ext.clone(),
            Language {
                compiler: lang.compiler.trim().to_string(),
                default_flags: lang.flags.clone(),
                label,
            },
        );
    }
    Ok(table)
}

fn validate_language(ext: &str, lang: &LanguageConfig) -> Result<()> {
    if !ext.starts_with('.') || ext.len() < 2 {
        return Err(DefiError::ConfigError(format!(
            "language key '{ext}' must be an extension starting with '.' (e.g. \".cpp\")"
        )));
    }
    if lang.compiler.trim().is_empty() {
        return Err(DefiError::ConfigError(format!(
            "language '{ext}' must name a non-empty `compiler`"
        )));
    }
    Ok(())
}
