// src/workflow/mod.rs

//! Compile / execute / compare workflow for one resolved source file.
//!
//! A run goes through the [`Phase`]s in order, then executes every prompt
//! case sequentially. Progress is streamed as [`WorkflowEvent`]s over an mpsc
//! channel; the final event of every run is [`WorkflowEvent::Finished`].
//!
//! The controller does not call the orchestrator directly: it goes through a
//! [`WorkflowBackend`] so tests can substitute a scripted backend.

use crate::errors::{CaseError, RunError};
use crate::prompt::PromptCase;
use crate::types::TestStatus;

pub mod backend;
pub mod orchestrator;
pub mod phase;

pub use backend::{RealWorkflowBackend, WorkflowBackend};
pub use orchestrator::{run_workflow, WorkflowRequest};
pub use phase::Phase;

/// Per-case progress report. `current` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseUpdate {
    pub current: usize,
    pub total: usize,
    /// Passed cases so far, including this one if it just passed.
    pub passed: usize,
    pub status: TestStatus,
    pub compile_success: bool,
    pub assertion_success: bool,
    /// Captured stdout; empty while running or when execution failed.
    pub actual: Vec<String>,
    pub error: Option<CaseError>,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub passed: usize,
    pub total: usize,
    /// A phase error, or the first case error by index.
    pub error: Option<RunError>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Events emitted by a workflow run, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    PhaseStarted {
        phase: Phase,
        index: usize,
        total: usize,
    },
    PhaseCompleted {
        phase: Phase,
        index: usize,
        total: usize,
        success: bool,
    },
    TestsInitialized {
        total: usize,
        cases: Vec<PromptCase>,
    },
    CaseStatus(CaseUpdate),
    Finished(RunSummary),
}
