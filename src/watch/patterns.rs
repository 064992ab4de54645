// src/watch/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};

/// Characters that turn a watch argument into a directory + pattern pair.
const GLOB_CHARS: &[char] = &['*', '?', '['];

/// Returns true if `input` contains shell-glob metacharacters.
pub fn has_glob(input: &str) -> bool {
    input.contains(GLOB_CHARS)
}

/// Compiled shell-glob pattern matched against bare file names
/// (e.g. `"*.cpp"`, `"day??.cpp"`).
#[derive(Clone)]
pub struct NamePattern {
    raw: String,
    matcher: GlobMatcher,
}

impl fmt::Debug for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamePattern")
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for NamePattern {}

impl NamePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern: {pattern}"))?
            .compile_matcher();
        Ok(Self {
            raw: pattern.to_string(),
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if the file name (no directory part) matches.
    pub fn matches(&self, file_name: &str) -> bool {
        self.matcher.is_match(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_glob_metacharacters() {
        assert!(has_glob("*.cpp"));
        assert!(has_glob("src/day?.cpp"));
        assert!(has_glob("src/[ab].cpp"));
        assert!(!has_glob("src/main.cpp"));
        assert!(!has_glob("."));
    }

    #[test]
    fn matches_file_names() {
        let pat = NamePattern::new("day*.cpp").unwrap();
        assert!(pat.matches("day01.cpp"));
        assert!(pat.matches("day.cpp"));
        assert!(!pat.matches("night01.cpp"));
        assert!(!pat.matches("day01.cpp.bak"));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(NamePattern::new("[abc").is_err());
    }
}
