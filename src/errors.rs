// src/errors.rs

//! Crate-wide error types.
//!
//! - [`DefiError`] covers startup and configuration failures (fatal before the
//!   controller loop starts).
//! - [`RunError`] and friends describe failures inside a single workflow run.
//!   They are `Clone` so they can travel inside progress events and be kept in
//!   the controller state.

use std::time::Duration;

use thiserror::Error;

use crate::workflow::Phase;

#[derive(Error, Debug)]
pub enum DefiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("no matching files found for {0}")]
    NoMatchingFiles(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors produced while extracting prompt cases from a source file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("unterminated defiprompt block")]
    Unterminated,

    #[error("OUTPUT encountered before INPUTS")]
    OutputBeforeInputs,

    #[error("incomplete prompt case detected")]
    IncompleteCase,

    #[error("no test cases found")]
    NoCases,
}

/// Mismatch between expected and captured output lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("expected {expected} output lines, got {actual}")]
    LineCount { expected: usize, actual: usize },

    #[error("expected output {expected:?}, got {actual:?} (line {line})")]
    Line {
        line: usize,
        expected: String,
        actual: String,
    },
}

/// Failure of a single test case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaseError {
    /// The binary could not be started or its pipes could not be set up.
    #[error("start failed: {0}")]
    Spawn(String),

    #[error("failed to write input: {0}")]
    WriteInput(String),

    #[error("failed to read stdout: {0}")]
    ReadOutput(String),

    #[error("execution failed: {0}")]
    Exit(String),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error(transparent)]
    Mismatch(#[from] CompareError),
}

impl CaseError {
    /// Whether the program under test was actually launched.
    pub fn started(&self) -> bool {
        !matches!(self, CaseError::Spawn(_))
    }
}

/// Summary error of a workflow run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("{phase}: {message}")]
    Phase { phase: Phase, message: String },

    #[error("case {index}: {source}")]
    Case { index: usize, source: CaseError },

    /// The run stopped before producing a summary (task panic or a dropped
    /// progress channel).
    #[error("run aborted: {0}")]
    Aborted(String),
}

impl RunError {
    /// 1-based index of the failing case, if this is a case error.
    pub fn case_index(&self) -> Option<usize> {
        match self {
            RunError::Case { index, .. } => Some(*index),
            RunError::Phase { .. } | RunError::Aborted(_) => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DefiError>;
