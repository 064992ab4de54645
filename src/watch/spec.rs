// src/watch/spec.rs

use std::path::{Path, PathBuf};

use crate::errors::{DefiError, Result};
use crate::fs::FileSystem;
use crate::watch::patterns::{has_glob, NamePattern};

/// What to watch: a single file, or a directory with an optional file-name
/// pattern. Built once from user input and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSpec {
    File {
        path: PathBuf,
    },
    Directory {
        dir: PathBuf,
        /// Without a pattern, eligibility is decided by the language table.
        pattern: Option<NamePattern>,
    },
}

impl WatchSpec {
    /// Interpret a CLI path or pattern argument.
    ///
    /// - Empty input means the current directory.
    /// - Input containing glob characters is split into parent dir + pattern.
    /// - Otherwise the path is stat'ed to decide between file and directory.
    pub fn parse(input: &str, fs: &dyn FileSystem) -> Result<Self> {
        let input = if input.trim().is_empty() { "." } else { input };
        let path = PathBuf::from(input);

        if has_glob(input) {
            let dir = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            };
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| DefiError::ConfigError(format!("invalid watch pattern {input:?}")))?;
            let pattern = NamePattern::new(name)?;
            return Ok(WatchSpec::Directory {
                dir,
                pattern: Some(pattern),
            });
        }

        if fs.is_dir(&path) {
            return Ok(WatchSpec::Directory { dir: path, pattern: None });
        }

        if fs.is_file(&path) {
            return Ok(WatchSpec::File { path });
        }

        Err(DefiError::ConfigError(format!(
            "cannot access {input:?}: no such file or directory"
        )))
    }

    pub fn single_file(path: impl Into<PathBuf>) -> Self {
        WatchSpec::File { path: path.into() }
    }

    pub fn directory(dir: impl Into<PathBuf>, pattern: Option<NamePattern>) -> Self {
        WatchSpec::Directory {
            dir: dir.into(),
            pattern,
        }
    }

    /// Human-readable description of what is being watched.
    pub fn display_base(&self) -> String {
        match self {
            WatchSpec::File { path } => path.display().to_string(),
            WatchSpec::Directory {
                dir,
                pattern: Some(p),
            } => dir.join(p.as_str()).display().to_string(),
            WatchSpec::Directory { dir, pattern: None } => dir.display().to_string(),
        }
    }

    /// Directory that holds the candidate files.
    pub fn dir(&self) -> &Path {
        match self {
            WatchSpec::File { path } => path.parent().unwrap_or(Path::new(".")),
            WatchSpec::Directory { dir, .. } => dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn glob_input_becomes_directory_with_pattern() {
        let fs = MockFileSystem::new();
        let spec = WatchSpec::parse("src/*.cpp", &fs).unwrap();
        match &spec {
            WatchSpec::Directory { dir, pattern } => {
                assert_eq!(dir, Path::new("src"));
                assert_eq!(pattern.as_ref().unwrap().as_str(), "*.cpp");
            }
            other => panic!("unexpected spec {other:?}"),
        }
        assert_eq!(spec.display_base(), "src/*.cpp");
    }

    #[test]
    fn bare_glob_uses_current_directory() {
        let fs = MockFileSystem::new();
        let spec = WatchSpec::parse("*.cpp", &fs).unwrap();
        assert_eq!(spec.dir(), Path::new("."));
    }

    #[test]
    fn empty_input_means_current_directory() {
        let fs = MockFileSystem::new();
        let spec = WatchSpec::parse("", &fs).unwrap();
        assert_eq!(spec, WatchSpec::directory(".", None));
    }

    #[test]
    fn existing_file_and_dir_are_distinguished() {
        let fs = MockFileSystem::new();
        fs.add_file("work/a.cpp", "");
        assert_eq!(
            WatchSpec::parse("work/a.cpp", &fs).unwrap(),
            WatchSpec::single_file("work/a.cpp")
        );
        assert_eq!(
            WatchSpec::parse("work", &fs).unwrap(),
            WatchSpec::directory("work", None)
        );
    }

    #[test]
    fn missing_path_is_a_config_error() {
        let fs = MockFileSystem::new();
        let err = WatchSpec::parse("nope.cpp", &fs).unwrap_err();
        assert!(matches!(err, DefiError::ConfigError(_)));
    }
}
