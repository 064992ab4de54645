// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { content: Vec<u8>, modified: SystemTime },
    Dir(Vec<String>), // List of child names
}

/// In-memory filesystem with controllable modification times.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    /// Add (or replace) a file whose mtime is `secs` seconds after the epoch.
    pub fn add_file_at(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>, secs: u64) {
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
        let path = path.as_ref().to_path_buf();
        let mut files = self.files.lock().unwrap();
        files.insert(
            path.clone(),
            MockEntry::File {
                content: content.into(),
                modified,
            },
        );
        self.link_into_parent(&mut files, &path);
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.add_file_at(path, content, 0);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut files = self.files.lock().unwrap();
        self.ensure_dir_entry(&mut files, path.as_ref());
    }

    /// Bump a file's mtime without changing its content.
    pub fn touch(&self, path: impl AsRef<Path>, secs: u64) {
        let mut files = self.files.lock().unwrap();
        if let Some(MockEntry::File { modified, .. }) = files.get_mut(path.as_ref()) {
            *modified = SystemTime::UNIX_EPOCH + Duration::from_secs(secs);
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.files.lock().unwrap();
        files.remove(path);
        let parent = parent_of(path);
        if let (Some(MockEntry::Dir(children)), Some(name)) = (
            files.get_mut(&parent),
            path.file_name().and_then(|n| n.to_str()),
        ) {
            children.retain(|c| c != name);
        }
    }

    fn link_into_parent(&self, files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let parent = parent_of(path);
        if parent == path {
            return;
        }
        self.ensure_dir_entry(files, &parent);
        if let Some(MockEntry::Dir(children)) = files.get_mut(&parent) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if !children.contains(&name.to_string()) {
                    children.push(name.to_string());
                }
            }
        }
    }

    fn ensure_dir_entry(&self, files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if !files.contains_key(path) {
            files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
            self.link_into_parent(files, path);
        }
    }
}

fn parent_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::File { content, .. }) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(files.get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(files.get(path), Some(MockEntry::Dir(_)))
    }

    fn modified(&self, path: &Path) -> Result<Option<SystemTime>> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::File { modified, .. }) => Ok(Some(*modified)),
            Some(MockEntry::Dir(_)) => Ok(Some(SystemTime::UNIX_EPOCH)),
            None => Ok(None),
        }
    }

    fn list_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::Dir(children)) => Ok(children
                .iter()
                .map(|name| if path == Path::new(".") { PathBuf::from(name) } else { path.join(name) })
                .filter(|child| matches!(files.get(child), Some(MockEntry::File { .. })))
                .collect()),
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn remove_if_exists(&self, path: &Path) -> Result<bool> {
        if !self.is_file(path) {
            return Ok(false);
        }
        self.remove(path);
        Ok(true)
    }
}
