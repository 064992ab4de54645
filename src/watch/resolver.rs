// src/watch/resolver.rs

//! Target resolution: "which file is current right now?"
//!
//! Pure function of filesystem state at call time. Nothing is cached; every
//! call re-lists and re-stats.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Result;
use tracing::trace;

use crate::exec::language::LanguageTable;
use crate::fs::FileSystem;
use crate::watch::spec::WatchSpec;

/// A concrete file and its modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Resolve `spec` to the currently relevant file.
///
/// - `Ok(Some(_))`: a file qualifies.
/// - `Ok(None)`: nothing qualifies (missing file, or no matching entry).
/// - `Err(_)`: listing or stat failed for another reason.
///
/// In directory mode the newest eligible entry wins. Entries are visited in
/// lexicographic name order and only a strictly newer mtime replaces the
/// current pick, so timestamp ties go to the smallest name.
pub fn resolve(
    spec: &WatchSpec,
    languages: &LanguageTable,
    fs: &dyn FileSystem,
) -> Result<Option<ResolvedTarget>> {
    match spec {
        WatchSpec::File { path } => Ok(fs.modified(path)?.map(|modified| ResolvedTarget {
            path: path.clone(),
            modified,
        })),
        WatchSpec::Directory { dir, pattern } => {
            let mut entries = fs.list_files(dir)?;
            entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

            let mut latest: Option<ResolvedTarget> = None;
            for path in entries {
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let eligible = match pattern {
                    Some(p) => p.matches(name),
                    None => languages.supports(Path::new(name)),
                };
                if !eligible {
                    continue;
                }

                // The entry may vanish between listing and stat.
                let Some(modified) = fs.modified(&path)? else {
                    continue;
                };
                trace!(path = %path.display(), ?modified, "candidate");

                let newer = latest.as_ref().is_none_or(|cur| modified > cur.modified);
                if newer {
                    latest = Some(ResolvedTarget { path, modified });
                }
            }

            Ok(latest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::watch::patterns::NamePattern;

    fn languages() -> LanguageTable {
        LanguageTable::default()
    }

    #[test]
    fn single_file_resolves_with_its_mtime() {
        let fs = MockFileSystem::new();
        fs.add_file_at("a.cpp", "", 42);
        let got = resolve(&WatchSpec::single_file("a.cpp"), &languages(), &fs)
            .unwrap()
            .unwrap();
        assert_eq!(got.path, PathBuf::from("a.cpp"));
        assert_eq!(got.modified, SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(42));
    }

    #[test]
    fn missing_single_file_is_not_found() {
        let fs = MockFileSystem::new();
        let got = resolve(&WatchSpec::single_file("a.cpp"), &languages(), &fs).unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn directory_without_pattern_only_considers_supported_extensions() {
        let fs = MockFileSystem::new();
        fs.add_file_at("w/old.cpp", "", 10);
        fs.add_file_at("w/new.cpp", "", 20);
        fs.add_file_at("w/notes.txt", "", 99);
        fs.add_dir("w/sub.cpp");

        let got = resolve(&WatchSpec::directory("w", None), &languages(), &fs)
            .unwrap()
            .unwrap();
        assert_eq!(got.path, PathBuf::from("w/new.cpp"));
    }

    #[test]
    fn directory_with_pattern_uses_glob() {
        let fs = MockFileSystem::new();
        fs.add_file_at("w/day1.cpp", "", 10);
        fs.add_file_at("w/scratch.cpp", "", 50);
        fs.add_file_at("w/day2.txt", "", 60);

        let spec = WatchSpec::directory("w", Some(NamePattern::new("day*").unwrap()));
        let got = resolve(&spec, &languages(), &fs).unwrap().unwrap();
        assert_eq!(got.path, PathBuf::from("w/day2.txt"));
    }

    #[test]
    fn ties_resolve_to_smallest_name() {
        let fs = MockFileSystem::new();
        fs.add_file_at("w/b.cpp", "", 10);
        fs.add_file_at("w/c.cpp", "", 10);
        fs.add_file_at("w/a.cpp", "", 10);

        for _ in 0..3 {
            let got = resolve(&WatchSpec::directory("w", None), &languages(), &fs)
                .unwrap()
                .unwrap();
            assert_eq!(got.path, PathBuf::from("w/a.cpp"));
        }
    }

    #[test]
    fn empty_directory_is_not_found() {
        let fs = MockFileSystem::new();
        fs.add_dir("w");
        fs.add_file_at("w/readme.md", "", 1);
        let got = resolve(&WatchSpec::directory("w", None), &languages(), &fs).unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let fs = MockFileSystem::new();
        assert!(resolve(&WatchSpec::directory("nope", None), &languages(), &fs).is_err());
    }
}
