// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`language`] maps source extensions to compilers and default flags.
//! - [`toolchain`] finds compilers, cleans the previous binary and compiles.
//! - [`case_runner`] runs the compiled program once per prompt case using
//!   `tokio::process::Command`.
//! - [`compare`] checks captured output against the expected lines.

pub mod case_runner;
pub mod compare;
pub mod language;
pub mod toolchain;

pub use case_runner::run_case;
pub use compare::compare_outputs;
pub use language::{Language, LanguageTable};
pub use toolchain::{compile_source, find_in_path, remove_existing_binaries, BuildLayout};
