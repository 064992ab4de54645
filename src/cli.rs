// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `defi`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "defi",
    version,
    about = "Recompile a single-file program on change and check it against its embedded test cases.",
    long_about = None
)]
pub struct CliArgs {
    /// File, directory, or glob pattern to watch (e.g. `src/*.cpp`).
    #[arg(value_name = "TARGET", default_value = ".")]
    pub target: String,

    /// Polling interval in seconds.
    ///
    /// Default: 1, or `interval` from the config file.
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Run the tests once for the current file and exit.
    #[arg(long)]
    pub once: bool,

    /// Compiler flag replacing the language defaults (repeatable).
    #[arg(long = "compile-flag", value_name = "FLAG", allow_hyphen_values = true)]
    pub compile_flags: Vec<String>,

    /// Kill a test case after this many seconds. Unbounded when omitted.
    #[arg(long, value_name = "SECS")]
    pub case_timeout: Option<u64>,

    /// Path to a config file (TOML).
    ///
    /// Default: `defi.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DEFI_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// Arguments for `target` with every option at its default.
    pub fn for_target(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            interval: None,
            once: false,
            compile_flags: Vec::new(),
            case_timeout: None,
            config: None,
            log_level: None,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
