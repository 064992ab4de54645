// src/exec/toolchain.rs

//! Compiler discovery, build cleanup and compilation.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::{debug, info};

use crate::fs::FileSystem;

/// Fixed name of the compiled program under test.
pub const BINARY_NAME: &str = "defitestprogram";
/// Alternate name some toolchains produce on Windows.
pub const BINARY_NAME_WIN: &str = "defitestprogram.exe";

/// Where the compiled binary lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    work_dir: PathBuf,
}

impl BuildLayout {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn binary(&self) -> PathBuf {
        self.work_dir.join(BINARY_NAME)
    }

    pub fn binary_alt(&self) -> PathBuf {
        self.work_dir.join(BINARY_NAME_WIN)
    }
}

/// Locate `program` on `PATH` (or directly, if it contains a path separator).
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .flat_map(|dir| {
            let plain = dir.join(program);
            let exe = dir.join(format!("{program}.exe"));
            [plain, exe]
        })
        .find(|p| is_executable(p))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Remove any previously produced binary. Absence is not an error.
pub fn remove_existing_binaries(fs: &dyn FileSystem, layout: &BuildLayout) -> Result<()> {
    for path in [layout.binary(), layout.binary_alt()] {
        if fs.remove_if_exists(&path)? {
            debug!(path = %path.display(), "removed previous binary");
        }
    }
    Ok(())
}

/// Compile `source` into the layout's binary.
///
/// Compiler diagnostics go straight to the inherited stdout/stderr.
pub async fn compile_source(
    source: &Path,
    compiler: &str,
    flags: &[String],
    layout: &BuildLayout,
) -> Result<()> {
    let output = layout.binary();
    info!(
        source = %source.display(),
        compiler,
        ?flags,
        "compiling"
    );

    let status = Command::new(compiler)
        .args(flags)
        .arg(source)
        .arg("-o")
        .arg(&output)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("spawning compiler '{compiler}'"))?;

    if !status.success() {
        bail!("compilation failed: {status}");
    }

    Ok(())
}
