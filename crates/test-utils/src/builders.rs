use std::fs;
use std::path::{Path, PathBuf};

use defi::config::{ConfigFile, ConfigSection, LanguageConfig, RawConfigFile};

/// Builder for the text of a source file carrying a prompt block.
///
/// The block is wrapped in a shell no-op (`: '...'`) so the same file is a
/// valid `/bin/sh` script for the fake compiler below.
pub struct PromptSourceBuilder {
    cases: Vec<(Vec<String>, Vec<String>)>,
    body: String,
}

impl PromptSourceBuilder {
    pub fn new() -> Self {
        Self {
            cases: Vec::new(),
            body: String::new(),
        }
    }

    pub fn case(mut self, inputs: &[&str], outputs: &[&str]) -> Self {
        self.cases.push((
            inputs.iter().map(|s| s.to_string()).collect(),
            outputs.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Program text appended after the prompt block.
    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Only the `/*defiprompt ... */` block.
    pub fn block(&self) -> String {
        let mut out = String::from("/*defiprompt\n");
        for (i, (inputs, outputs)) in self.cases.iter().enumerate() {
            if i > 0 {
                out.push_str("-*-\n");
            }
            out.push_str("INPUTS:\n");
            for line in inputs {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str("OUTPUT:\n");
            for line in outputs {
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str("*/\n");
        out
    }

    /// Shell script: `#!/bin/sh`, the block inside `: '...'`, then the body.
    pub fn shell_script(&self) -> String {
        format!("#!/bin/sh\n: '\n{}'\n{}\n", self.block(), self.body)
    }
}

impl Default for PromptSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write an executable "compiler" that copies its source to the `-o` target.
///
/// Invoked as `<script> <source> -o <output>`, i.e. without extra flags.
#[cfg(unix)]
pub fn write_fake_compiler(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-cc");
    fs::write(&path, "#!/bin/sh\ncp \"$1\" \"$3\" && chmod +x \"$3\"\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Write an executable "compiler" that always fails.
#[cfg(unix)]
pub fn write_failing_compiler(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("broken-cc");
    fs::write(&path, "#!/bin/sh\necho 'syntax error' >&2\nexit 1\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Write an executable "compiler" that succeeds without producing a binary.
#[cfg(unix)]
pub fn write_silent_compiler(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("silent-cc");
    fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                language: Default::default(),
            },
        }
    }

    /// Register `ext` (with leading dot) compiled by `compiler` without flags.
    pub fn with_language(mut self, ext: &str, compiler: &Path) -> Self {
        self.config.language.insert(
            ext.to_string(),
            LanguageConfig {
                compiler: compiler.display().to_string(),
                flags: Vec::new(),
                label: None,
            },
        );
        self
    }

    pub fn with_case_timeout(mut self, secs: u64) -> Self {
        self.config.config.case_timeout = Some(secs);
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
