// src/engine/state.rs

//! Controller-owned run/watch state.
//!
//! Fields are only visible inside `engine`; everything outside (renderers,
//! `main`) reads through the accessors below. Writes happen exclusively in
//! [`super::event_handlers`] while the core applies an event.

use std::path::{Path, PathBuf};

use crate::errors::{CaseError, RunError};
use crate::prompt::PromptCase;
use crate::types::TestStatus;
use crate::workflow::{Phase, RunSummary};

use super::render::{footer_filename, format_display_path, language_label_for_path};

/// Placeholder for absent file name / language.
pub const NONE_LABEL: &str = "-";

/// Per-case row exposed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseView {
    pub name: String,
    pub status: TestStatus,
    pub compile_ok: bool,
    pub assertion_ok: bool,
    pub inputs: Vec<String>,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub error: Option<CaseError>,
}

impl CaseView {
    pub(super) fn pending(index: usize, case: Option<&PromptCase>) -> Self {
        Self {
            name: format!("Case {}", index + 1),
            status: TestStatus::Pending,
            compile_ok: false,
            assertion_ok: false,
            inputs: case.map(|c| c.inputs.clone()).unwrap_or_default(),
            expected: case.map(|c| c.outputs.clone()).unwrap_or_default(),
            actual: Vec::new(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseProgress {
    pub phase: Phase,
    pub index: usize,
    pub total: usize,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct RunState {
    pub(super) active_path: Option<PathBuf>,
    pub(super) display_path: String,
    pub(super) file_name: String,
    pub(super) language: String,

    pub(super) run_active: bool,
    pub(super) run_finished: bool,
    /// Single pending run request; a newer request overwrites it.
    pub(super) queued: Option<PathBuf>,
    pub(super) runs_started: usize,

    pub(super) watch_has_file: bool,
    pub(super) watcher_error: Option<String>,

    pub(super) phase: Option<PhaseProgress>,
    pub(super) tests_total: usize,
    pub(super) tests_passed: usize,
    pub(super) current_case: usize,

    pub(super) summary: Option<RunSummary>,
    pub(super) cases: Vec<CaseView>,
    pub(super) selected: Option<usize>,

    pub(super) status: String,
    pub(super) spinning: bool,
}

impl RunState {
    pub(super) fn new() -> Self {
        Self {
            active_path: None,
            display_path: String::new(),
            file_name: NONE_LABEL.to_string(),
            language: NONE_LABEL.to_string(),
            run_active: false,
            run_finished: false,
            queued: None,
            runs_started: 0,
            watch_has_file: false,
            watcher_error: None,
            phase: None,
            tests_total: 0,
            tests_passed: 0,
            current_case: 0,
            summary: None,
            cases: Vec::new(),
            selected: None,
            status: String::new(),
            spinning: false,
        }
    }

    pub(super) fn show_file(&mut self, path: &Path) {
        self.active_path = Some(path.to_path_buf());
        self.display_path = format_display_path(path);
        self.file_name = footer_filename(path);
        self.language = language_label_for_path(path);
    }

    pub(super) fn clear_file(&mut self) {
        self.active_path = None;
        self.display_path.clear();
        self.file_name = NONE_LABEL.to_string();
        self.language = NONE_LABEL.to_string();
    }

    pub(super) fn set_status(&mut self, status: impl Into<String>, spinning: bool) {
        self.status = status.into();
        self.spinning = spinning;
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.active_path.as_deref()
    }

    pub fn display_path(&self) -> &str {
        &self.display_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn language_label(&self) -> &str {
        &self.language
    }

    pub fn is_run_active(&self) -> bool {
        self.run_active
    }

    pub fn is_run_finished(&self) -> bool {
        self.run_finished
    }

    pub fn queued_path(&self) -> Option<&Path> {
        self.queued.as_deref()
    }

    /// Number of runs started since the controller was created.
    pub fn runs_started(&self) -> usize {
        self.runs_started
    }

    pub fn watch_has_file(&self) -> bool {
        self.watch_has_file
    }

    pub fn watcher_error(&self) -> Option<&str> {
        self.watcher_error.as_deref()
    }

    pub fn phase(&self) -> Option<PhaseProgress> {
        self.phase
    }

    pub fn tests_total(&self) -> usize {
        self.tests_total
    }

    pub fn tests_passed(&self) -> usize {
        self.tests_passed
    }

    /// 1-based index of the case most recently reported, 0 if none.
    pub fn current_case(&self) -> usize {
        self.current_case
    }

    /// Summary of the most recently completed run.
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    pub fn last_error(&self) -> Option<&RunError> {
        self.summary.as_ref().and_then(|s| s.error.as_ref())
    }

    pub fn cases(&self) -> &[CaseView] {
        &self.cases
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_case(&self) -> Option<&CaseView> {
        self.selected.and_then(|i| self.cases.get(i))
    }

    /// Free-text status line; `"Idle"` when nothing has been reported.
    pub fn status(&self) -> &str {
        if self.status.is_empty() { "Idle" } else { &self.status }
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }
}
