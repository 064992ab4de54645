// src/workflow/orchestrator.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{CaseError, RunError};
use crate::exec::language::{Language, LanguageTable};
use crate::exec::{compare_outputs, compile_source, find_in_path, remove_existing_binaries, run_case, BuildLayout};
use crate::fs::FileSystem;
use crate::prompt::{PromptCase, PromptParser};
use crate::types::TestStatus;

use super::{CaseUpdate, Phase, RunSummary, WorkflowEvent};

/// Everything a single run needs.
#[derive(Debug, Clone)]
pub struct WorkflowRequest {
    pub source: PathBuf,
    /// Replaces the language's default flags when non-empty.
    pub compile_flags: Vec<String>,
    pub languages: LanguageTable,
    pub layout: BuildLayout,
    pub case_timeout: Option<Duration>,
}

/// Run the full pipeline for `request.source`, streaming progress to `tx`.
///
/// Does not send [`WorkflowEvent::Finished`]; the caller does that with the
/// returned summary.
pub async fn run_workflow(
    request: &WorkflowRequest,
    fs: Arc<dyn FileSystem>,
    tx: &mpsc::Sender<WorkflowEvent>,
) -> RunSummary {
    let mut run = Run {
        request,
        fs,
        tx,
        language: None,
        cases: Vec::new(),
    };
    run.execute().await
}

struct Run<'a> {
    request: &'a WorkflowRequest,
    fs: Arc<dyn FileSystem>,
    tx: &'a mpsc::Sender<WorkflowEvent>,
    language: Option<Language>,
    cases: Vec<PromptCase>,
}

impl Run<'_> {
    async fn emit(&self, event: WorkflowEvent) {
        if self.tx.send(event).await.is_err() {
            debug!("workflow event receiver dropped");
        }
    }

    async fn execute(&mut self) -> RunSummary {
        let total_phases = Phase::ALL.len();
        info!(source = %self.request.source.display(), "workflow started");

        for (i, phase) in Phase::ALL.into_iter().enumerate() {
            let index = i + 1;
            self.emit(WorkflowEvent::PhaseStarted {
                phase,
                index,
                total: total_phases,
            })
            .await;

            let result = self.run_phase(phase).await;

            self.emit(WorkflowEvent::PhaseCompleted {
                phase,
                index,
                total: total_phases,
                success: result.is_ok(),
            })
            .await;

            if let Err(err) = result {
                let message = format!("{err:#}");
                warn!(%phase, error = %message, "phase failed");
                return RunSummary {
                    passed: 0,
                    total: self.cases.len(),
                    error: Some(RunError::Phase { phase, message }),
                };
            }
        }

        self.execute_cases().await
    }

    async fn run_phase(&mut self, phase: Phase) -> Result<()> {
        match phase {
            Phase::Validate => self.validate(),
            Phase::Clean => remove_existing_binaries(self.fs.as_ref(), &self.request.layout),
            Phase::Compile => self.compile().await,
            Phase::ParsePrompts => {
                let cases = PromptParser::new(&self.request.source).parse(self.fs.as_ref())?;
                self.cases = cases;
                Ok(())
            }
        }
    }

    fn validate(&mut self) -> Result<()> {
        let source = &self.request.source;
        if !self.fs.exists(source) {
            return Err(anyhow!("failed to access {:?}: no such file", source));
        }
        if self.fs.is_dir(source) {
            return Err(anyhow!("{:?} is a directory, expected a file", source));
        }

        let language = self
            .request
            .languages
            .for_path(source)
            .ok_or_else(|| {
                let ext = source.extension().map(|e| e.to_string_lossy().into_owned()).unwrap_or_default();
                let supported: Vec<&str> = self.request.languages.extensions().collect();
                anyhow!("unsupported file extension \".{ext}\" (supported: {})", supported.join(", "))
            })?
            .clone();

        if find_in_path(&language.compiler).is_none() {
            return Err(anyhow!(
                "required compiler \"{}\" not found in PATH",
                language.compiler
            ));
        }

        self.language = Some(language);
        Ok(())
    }

    async fn compile(&self) -> Result<()> {
        let language = self
            .language
            .as_ref()
            .ok_or_else(|| anyhow!("no language resolved for source"))?;
        let flags = if self.request.compile_flags.is_empty() {
            &language.default_flags
        } else {
            &self.request.compile_flags
        };
        compile_source(&self.request.source, &language.compiler, flags, &self.request.layout).await
    }

    async fn execute_cases(&mut self) -> RunSummary {
        let total = self.cases.len();
        let cases = std::mem::take(&mut self.cases);
        self.emit(WorkflowEvent::TestsInitialized {
            total,
            cases: cases.clone(),
        })
        .await;

        let binary = self.request.layout.binary();
        let mut passed = 0;
        let mut first_error: Option<RunError> = None;

        for (idx, case) in cases.iter().enumerate() {
            let current = idx + 1;
            self.emit(WorkflowEvent::CaseStatus(CaseUpdate {
                current,
                total,
                passed,
                status: TestStatus::Running,
                compile_success: false,
                assertion_success: false,
                actual: Vec::new(),
                error: None,
            }))
            .await;

            let outcome = match run_case(&binary, case, self.request.case_timeout).await {
                Ok(actual) => match compare_outputs(&case.outputs, &actual) {
                    Ok(()) => Ok(actual),
                    Err(mismatch) => Err((CaseError::from(mismatch), actual)),
                },
                Err(err) => Err((err, Vec::new())),
            };

            let update = match outcome {
                Ok(actual) => {
                    passed += 1;
                    debug!(case = current, "case passed");
                    CaseUpdate {
                        current,
                        total,
                        passed,
                        status: TestStatus::Passed,
                        compile_success: true,
                        assertion_success: true,
                        actual,
                        error: None,
                    }
                }
                Err((err, actual)) => {
                    info!(case = current, error = %err, "case failed");
                    if first_error.is_none() {
                        first_error = Some(RunError::Case {
                            index: current,
                            source: err.clone(),
                        });
                    }
                    CaseUpdate {
                        current,
                        total,
                        passed,
                        status: TestStatus::Failed,
                        compile_success: err.started(),
                        assertion_success: false,
                        actual,
                        error: Some(err),
                    }
                }
            };
            self.emit(WorkflowEvent::CaseStatus(update)).await;
        }

        info!(passed, total, "workflow finished");
        RunSummary {
            passed,
            total,
            error: first_error,
        }
    }
}
