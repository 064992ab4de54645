// src/exec/language.rs

//! Supported-language table: source extension -> compiler + default flags.

use std::collections::BTreeMap;
use std::path::Path;

/// How to compile one kind of source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub compiler: String,
    pub default_flags: Vec<String>,
    pub label: String,
}

impl Language {
    pub fn new(compiler: &str, default_flags: &[&str], label: &str) -> Self {
        Self {
            compiler: compiler.to_string(),
            default_flags: default_flags.iter().map(|s| s.to_string()).collect(),
            label: label.to_string(),
        }
    }
}

/// Extension-keyed language table. Keys include the leading dot (`".cpp"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTable {
    entries: BTreeMap<String, Language>,
}

impl Default for LanguageTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(".cpp".to_string(), Language::new("c++", &["-std=c++11"], "C++"));
        Self { entries }
    }
}

impl LanguageTable {
    /// Add or replace the entry for `ext`.
    pub fn insert(&mut self, ext: impl Into<String>, language: Language) {
        self.entries.insert(ext.into(), language);
    }

    pub fn get(&self, ext: &str) -> Option<&Language> {
        self.entries.get(ext)
    }

    pub fn for_path(&self, path: &Path) -> Option<&Language> {
        extension_of(path).and_then(|ext| self.get(&ext))
    }

    pub fn supports(&self, path: &Path) -> bool {
        self.for_path(path).is_some()
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }
}

/// File extension with its leading dot, e.g. `".cpp"`.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_knows_cpp_only() {
        let table = LanguageTable::default();
        let cpp = table.for_path(Path::new("src/main.cpp")).unwrap();
        assert_eq!(cpp.compiler, "c++");
        assert_eq!(cpp.default_flags, vec!["-std=c++11".to_string()]);
        assert!(!table.supports(Path::new("notes.txt")));
        assert!(!table.supports(Path::new("Makefile")));
        assert_eq!(table.extensions().collect::<Vec<_>>(), vec![".cpp"]);
    }
}
