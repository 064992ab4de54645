// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
///
/// The resolver, the prompt parser and the clean phase go through this trait
/// so they can be exercised against [`mock::MockFileSystem`] in tests.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Last modification time, or `None` if the path does not exist.
    fn modified(&self, path: &Path) -> Result<Option<SystemTime>>;

    /// Return the regular files directly inside a directory (non-recursive).
    /// Returns full paths.
    fn list_files(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Remove a file. Returns `false` if it did not exist.
    fn remove_if_exists(&self, path: &Path) -> Result<bool>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn modified(&self, path: &Path) -> Result<Option<SystemTime>> {
        match fs::metadata(path) {
            Ok(meta) => {
                let time = meta
                    .modified()
                    .with_context(|| format!("reading mtime of {:?}", path))?;
                Ok(Some(time))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("stat {:?}", path)),
        }
    }

    fn list_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            let file_type = entry
                .file_type()
                .with_context(|| format!("reading file type of {:?}", entry.path()))?;
            if file_type.is_dir() {
                continue;
            }
            entries.push(entry.path());
        }
        Ok(entries)
    }

    fn remove_if_exists(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("unable to delete {:?}", path)),
        }
    }
}
