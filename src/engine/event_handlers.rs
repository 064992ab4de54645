// src/engine/event_handlers.rs

//! Event handling logic for the controller core.
//!
//! Every function here receives the state mutably and returns the commands
//! the IO shell must execute. None of them perform IO.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::engine::state::{CaseView, PhaseProgress, RunState};
use crate::engine::ControllerOptions;
use crate::engine::render::shorten;
use crate::errors::RunError;
use crate::types::{SelectionMove, TestStatus};
use crate::watch::WatchEvent;
use crate::workflow::{CaseUpdate, RunSummary, WorkflowEvent};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Start a workflow run for this file.
    StartRun(PathBuf),
    /// Request that the process exits (used for `--once` after the run).
    RequestExit,
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    pub fn none() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }

    fn with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    fn exit() -> Self {
        Self {
            commands: vec![CoreCommand::RequestExit],
            keep_running: false,
        }
    }
}

fn waiting_status(options: &ControllerOptions) -> (&'static str, bool) {
    if options.once {
        ("Waiting for file...", false)
    } else {
        ("Waiting for matching files...", true)
    }
}

fn ready_status(options: &ControllerOptions) -> (&'static str, bool) {
    if options.once {
        ("Ready to run", false)
    } else {
        ("Listening for changes...", true)
    }
}

/// Handle a run request.
///
/// - Idle: the request becomes the active run and per-run state is reset.
/// - Run active: the path becomes the single queued request, replacing any
///   earlier one. No second run is ever started concurrently.
pub fn handle_run_request(state: &mut RunState, path: PathBuf) -> Vec<CoreCommand> {
    if state.run_active {
        if let Some(previous) = state.queued.replace(path.clone()) {
            if previous != path {
                debug!(dropped = %previous.display(), queued = %path.display(), "superseding queued run");
            }
        } else {
            debug!(queued = %path.display(), "run active; queueing request");
        }
        return Vec::new();
    }

    info!(path = %path.display(), "starting run");
    state.run_active = true;
    state.run_finished = false;
    state.runs_started += 1;
    state.queued = None;
    state.summary = None;
    state.phase = None;
    state.tests_total = 0;
    state.tests_passed = 0;
    state.current_case = 0;
    state.cases.clear();
    state.show_file(&path);
    state.watch_has_file = true;
    state.set_status("Preparing run...", false);

    vec![CoreCommand::StartRun(path)]
}

/// Handle a watcher event.
///
/// `ignore_initial` suppresses the first `initial` change event when the
/// initial run was already requested at startup; it is cleared once consumed.
pub fn handle_watch_event(
    state: &mut RunState,
    options: &ControllerOptions,
    ignore_initial: &mut bool,
    event: WatchEvent,
) -> CoreStep {
    match event {
        WatchEvent::Changed { path, initial, .. } => {
            state.watch_has_file = true;
            state.watcher_error = None;

            if !state.run_active {
                state.show_file(&path);
                let (status, spinning) = ready_status(options);
                state.set_status(status, spinning);
            }

            if initial && *ignore_initial {
                *ignore_initial = false;
                debug!(path = %path.display(), "initial watch event matches startup run; not re-running");
                return CoreStep::none();
            }

            CoreStep::with(handle_run_request(state, path))
        }
        WatchEvent::Idle => {
            state.watch_has_file = false;
            if !state.run_active {
                state.clear_file();
                let (status, spinning) = waiting_status(options);
                state.set_status(status, spinning);
            }
            CoreStep::none()
        }
        WatchEvent::Error(err) => {
            state.set_status(format!("Watcher error: {}", shorten(&err, 40)), false);
            state.watcher_error = Some(err);
            CoreStep::none()
        }
    }
}

/// Handle a workflow progress or completion event.
pub fn handle_workflow_event(
    state: &mut RunState,
    options: &ControllerOptions,
    event: WorkflowEvent,
) -> CoreStep {
    match event {
        WorkflowEvent::PhaseStarted { phase, index, total } => {
            state.phase = Some(PhaseProgress {
                phase,
                index,
                total,
                completed: false,
            });
            state.set_status(phase.display_name(), false);
            CoreStep::none()
        }
        WorkflowEvent::PhaseCompleted {
            phase,
            index,
            total,
            success,
        } => {
            state.phase = Some(PhaseProgress {
                phase,
                index,
                total,
                completed: success,
            });
            CoreStep::none()
        }
        WorkflowEvent::TestsInitialized { total, cases } => {
            state.tests_total = total;
            state.tests_passed = 0;
            state.cases = (0..total).map(|i| CaseView::pending(i, cases.get(i))).collect();
            if state.selected.is_some_and(|i| i >= total) {
                state.selected = None;
            }
            let status = if total == 0 { "No test cases found" } else { "Running tests..." };
            state.set_status(status, false);
            CoreStep::none()
        }
        WorkflowEvent::CaseStatus(update) => {
            apply_case_update(state, update);
            CoreStep::none()
        }
        WorkflowEvent::Finished(summary) => handle_run_finished(state, options, summary),
    }
}

fn apply_case_update(state: &mut RunState, update: CaseUpdate) {
    state.current_case = update.current;
    state.tests_total = update.total;
    state.tests_passed = update.passed;

    let status = match (&update.status, &update.error) {
        (TestStatus::Failed, Some(err)) => format!("failed: {}", shorten(&err.to_string(), 60)),
        (s, _) => s.to_string(),
    };
    state.set_status(format!("Case {}/{} {}", update.current, update.total, status), false);

    let Some(case) = update.current.checked_sub(1).and_then(|i| state.cases.get_mut(i)) else {
        return;
    };
    case.status = update.status;
    if update.status.is_terminal() {
        case.compile_ok = update.compile_success;
        case.assertion_ok = update.assertion_success;
        case.actual = update.actual;
        case.error = update.error;
    } else {
        case.compile_ok = false;
        case.assertion_ok = false;
    }
}

fn handle_run_finished(state: &mut RunState, options: &ControllerOptions, summary: RunSummary) -> CoreStep {
    info!(
        passed = summary.passed,
        total = summary.total,
        error = ?summary.error.as_ref().map(|e| e.to_string()),
        "run finished"
    );

    state.run_active = false;
    state.run_finished = true;
    match &summary.error {
        Some(err) => state.set_status(shorten(&err.to_string(), 60), false),
        None if !options.once => state.set_status("Listening for file changes...", true),
        None => state.spinning = false,
    }
    state.summary = Some(summary);

    if options.once {
        return CoreStep::exit();
    }

    match state.queued.take() {
        Some(path) => CoreStep::with(handle_run_request(state, path)),
        None => CoreStep::none(),
    }
}

/// The active run's progress channel closed without a `Finished` event.
///
/// The run is finalized with an aborted summary so the controller does not
/// stay busy forever and a queued request can still start.
pub fn handle_run_channel_closed(state: &mut RunState, options: &ControllerOptions) -> CoreStep {
    if !state.run_active {
        debug!("run channel closed after the run finished");
        return CoreStep::none();
    }
    warn!("run ended without reporting a result");
    let summary = RunSummary {
        passed: state.tests_passed,
        total: state.tests_total,
        error: Some(RunError::Aborted("run ended without reporting a result".to_string())),
    };
    handle_run_finished(state, options, summary)
}

/// Move the case selection. `Down` from no selection selects the first case.
pub fn handle_selection(state: &mut RunState, movement: SelectionMove) -> CoreStep {
    let len = state.cases.len();
    state.selected = match (movement, state.selected) {
        (SelectionMove::Clear, _) => None,
        (SelectionMove::Up, Some(i)) if i > 0 => Some(i - 1),
        (SelectionMove::Up, current) => current,
        (SelectionMove::Down, None) if len > 0 => Some(0),
        (SelectionMove::Down, Some(i)) if i + 1 < len => Some(i + 1),
        (SelectionMove::Down, current) => current,
    };
    CoreStep::none()
}
