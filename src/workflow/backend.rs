// src/workflow/backend.rs

//! Pluggable workflow backend abstraction.
//!
//! The controller talks to a `WorkflowBackend` instead of spawning the
//! orchestrator itself. This makes it easy to swap in a scripted backend in
//! tests while keeping the production pipeline in [`super::orchestrator`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::errors::RunError;
use crate::exec::{BuildLayout, LanguageTable};
use crate::fs::FileSystem;

use super::orchestrator::{run_workflow, WorkflowRequest};
use super::{RunSummary, WorkflowEvent};

/// Capacity of the per-run progress channel.
pub const RUN_CHANNEL_CAPACITY: usize = 64;

/// Trait abstracting how a run is started.
///
/// Implementations start the run as an independent unit of work and return
/// the receiving end of its progress channel. The last event sent must be
/// [`WorkflowEvent::Finished`], after which the sender is dropped.
pub trait WorkflowBackend: Send {
    fn start_run(&mut self, source: &Path) -> mpsc::Receiver<WorkflowEvent>;
}

/// Production backend: spawns [`run_workflow`] on the Tokio runtime.
#[derive(Debug, Clone)]
pub struct RealWorkflowBackend {
    fs: Arc<dyn FileSystem>,
    compile_flags: Vec<String>,
    languages: LanguageTable,
    layout: BuildLayout,
    case_timeout: Option<Duration>,
}

impl RealWorkflowBackend {
    pub fn new(fs: Arc<dyn FileSystem>, languages: LanguageTable, layout: BuildLayout) -> Self {
        Self {
            fs,
            compile_flags: Vec::new(),
            languages,
            layout,
            case_timeout: None,
        }
    }

    pub fn with_compile_flags(mut self, flags: Vec<String>) -> Self {
        self.compile_flags = flags;
        self
    }

    pub fn with_case_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.case_timeout = timeout;
        self
    }

    fn request_for(&self, source: &Path) -> WorkflowRequest {
        WorkflowRequest {
            source: PathBuf::from(source),
            compile_flags: self.compile_flags.clone(),
            languages: self.languages.clone(),
            layout: self.layout.clone(),
            case_timeout: self.case_timeout,
        }
    }
}

impl WorkflowBackend for RealWorkflowBackend {
    fn start_run(&mut self, source: &Path) -> mpsc::Receiver<WorkflowEvent> {
        let (tx, rx) = mpsc::channel(RUN_CHANNEL_CAPACITY);
        let request = self.request_for(source);
        let fs = Arc::clone(&self.fs);

        tokio::spawn(async move {
            let progress = tx.clone();
            let worker = tokio::spawn(async move { run_workflow(&request, fs, &progress).await });
            let summary = match worker.await {
                Ok(summary) => summary,
                Err(err) => {
                    error!(error = %err, "workflow task failed");
                    RunSummary {
                        passed: 0,
                        total: 0,
                        error: Some(RunError::Aborted(err.to_string())),
                    }
                }
            };
            if tx.send(WorkflowEvent::Finished(summary)).await.is_err() {
                debug!("controller dropped before run finished");
            }
            // `tx` dropped here: the controller sees the channel close.
        });

        rx
    }
}
