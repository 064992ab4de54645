// src/engine/core.rs

//! Pure controller state machine.
//!
//! This module contains a synchronous, deterministic core that consumes
//! [`ControllerEvent`]s and produces:
//! - an updated [`RunState`]
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Controller`) is responsible for reading
//! events from channels, starting workflow runs and handling shutdown. The
//! core is unit tested without any Tokio, channels, filesystem, or processes.

use std::path::PathBuf;

use crate::engine::event_handlers::{
    handle_run_channel_closed, handle_run_request, handle_selection, handle_watch_event, handle_workflow_event,
    CoreStep,
};
use crate::engine::state::RunState;
use crate::engine::{ControllerEvent, ControllerOptions};

#[derive(Debug)]
pub struct ControllerCore {
    state: RunState,
    options: ControllerOptions,
    initial_path: Option<PathBuf>,
    /// Set when the initial run is requested explicitly, so the watcher's
    /// first change event does not trigger a duplicate run.
    ignore_initial_watch: bool,
}

impl ControllerCore {
    pub fn new(options: ControllerOptions, initial_path: Option<PathBuf>) -> Self {
        let mut state = RunState::new();
        let ignore_initial_watch = initial_path.is_some() && !options.once;

        match &initial_path {
            Some(path) => {
                state.show_file(path);
                state.watch_has_file = true;
                if options.once {
                    state.set_status("Ready to run", false);
                } else {
                    state.set_status("Listening for changes...", true);
                }
            }
            None if options.once => state.set_status("Waiting for file...", false),
            None => state.set_status("Waiting for matching files...", true),
        }

        Self {
            state,
            options,
            initial_path,
            ignore_initial_watch,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn options(&self) -> ControllerOptions {
        self.options
    }

    /// Consume the core and return the final state.
    pub fn into_state(self) -> RunState {
        self.state
    }

    /// Commands to execute before the first event: the explicit initial run.
    pub fn start(&mut self) -> CoreStep {
        match self.initial_path.take() {
            Some(path) => CoreStep {
                commands: handle_run_request(&mut self.state, path),
                keep_running: true,
            },
            None => CoreStep::none(),
        }
    }

    /// Apply a single event, updating state and returning commands for the
    /// IO shell. This is the only place `RunState` is mutated.
    pub fn step(&mut self, event: ControllerEvent) -> CoreStep {
        match event {
            ControllerEvent::Watch(ev) => handle_watch_event(
                &mut self.state,
                &self.options,
                &mut self.ignore_initial_watch,
                ev,
            ),
            ControllerEvent::Workflow(ev) => handle_workflow_event(&mut self.state, &self.options, ev),
            ControllerEvent::RunChannelClosed => handle_run_channel_closed(&mut self.state, &self.options),
            ControllerEvent::RunRequested(path) => CoreStep {
                commands: handle_run_request(&mut self.state, path),
                keep_running: true,
            },
            ControllerEvent::Select(movement) => handle_selection(&mut self.state, movement),
            ControllerEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::SystemTime;

    use super::*;
    use crate::engine::CoreCommand;
    use crate::errors::{CaseError, CompareError, RunError};
    use crate::prompt::PromptCase;
    use crate::types::{SelectionMove, TestStatus};
    use crate::watch::WatchEvent;
    use crate::workflow::{CaseUpdate, Phase, RunSummary, WorkflowEvent};

    fn changed(path: &str, initial: bool) -> ControllerEvent {
        ControllerEvent::Watch(WatchEvent::Changed {
            path: PathBuf::from(path),
            modified: SystemTime::UNIX_EPOCH,
            initial,
        })
    }

    fn finished(passed: usize, total: usize, error: Option<RunError>) -> ControllerEvent {
        ControllerEvent::Workflow(WorkflowEvent::Finished(RunSummary { passed, total, error }))
    }

    fn start(path: &str) -> Vec<CoreCommand> {
        vec![CoreCommand::StartRun(PathBuf::from(path))]
    }

    fn continuous() -> ControllerOptions {
        ControllerOptions { once: false }
    }

    #[test]
    fn initial_path_runs_once_and_first_watch_event_is_suppressed() {
        let mut core = ControllerCore::new(continuous(), Some(PathBuf::from("a.cpp")));
        assert_eq!(core.start().commands, start("a.cpp"));
        assert!(core.state().is_run_active());

        let step = core.step(changed("a.cpp", true));
        assert!(step.commands.is_empty());
        assert_eq!(core.state().queued_path(), None);
    }

    #[test]
    fn without_initial_path_the_first_change_triggers_a_run() {
        let mut core = ControllerCore::new(continuous(), None);
        assert!(core.start().commands.is_empty());
        assert_eq!(core.state().status(), "Waiting for matching files...");
        assert!(core.state().is_spinning());

        let step = core.step(changed("a.cpp", true));
        assert_eq!(step.commands, start("a.cpp"));
        assert_eq!(core.state().file_name(), "a.cpp");
        assert_eq!(core.state().display_path(), "a.cpp");
        assert_eq!(core.state().language_label(), "C++");
    }

    #[test]
    fn queued_requests_supersede_each_other() {
        let mut core = ControllerCore::new(continuous(), Some(PathBuf::from("a.cpp")));
        core.start();
        core.step(changed("a.cpp", true));

        assert!(core.step(changed("b.cpp", false)).commands.is_empty());
        assert!(core.step(changed("c.cpp", false)).commands.is_empty());
        assert!(core.step(ControllerEvent::RunRequested(PathBuf::from("d.cpp"))).commands.is_empty());
        assert_eq!(core.state().queued_path(), Some(Path::new("d.cpp")));
        assert_eq!(core.state().runs_started(), 1);

        let step = core.step(finished(1, 1, None));
        assert_eq!(step.commands, start("d.cpp"));
        assert!(step.keep_running);
        assert_eq!(core.state().queued_path(), None);
        assert_eq!(core.state().runs_started(), 2);

        // b.cpp and c.cpp were dropped, nothing else is pending.
        let step = core.step(finished(1, 1, None));
        assert!(step.commands.is_empty());
        assert!(!core.state().is_run_active());
    }

    #[test]
    fn once_mode_exits_after_first_run_even_with_queued_request() {
        let mut core = ControllerCore::new(ControllerOptions { once: true }, Some(PathBuf::from("a.cpp")));
        assert_eq!(core.start().commands, start("a.cpp"));
        core.step(ControllerEvent::RunRequested(PathBuf::from("b.cpp")));

        let step = core.step(finished(0, 1, None));
        assert_eq!(step.commands, vec![CoreCommand::RequestExit]);
        assert!(!step.keep_running);
        assert!(!core.state().is_spinning());
    }

    #[test]
    fn idle_clears_file_info_only_when_not_running() {
        let mut core = ControllerCore::new(continuous(), None);
        core.step(changed("a.cpp", true));
        core.step(ControllerEvent::Watch(WatchEvent::Idle));
        assert!(!core.state().watch_has_file());
        assert_eq!(core.state().file_name(), "a.cpp");

        core.step(finished(1, 1, None));
        core.step(ControllerEvent::Watch(WatchEvent::Idle));
        assert_eq!(core.state().file_name(), "-");
        assert_eq!(core.state().language_label(), "-");
        assert_eq!(core.state().active_path(), None);
        assert_eq!(core.state().status(), "Waiting for matching files...");
    }

    #[test]
    fn watcher_error_is_recorded_without_stopping_the_run() {
        let mut core = ControllerCore::new(continuous(), Some(PathBuf::from("a.cpp")));
        core.start();
        let step = core.step(ControllerEvent::Watch(WatchEvent::Error("permission denied".into())));
        assert!(step.commands.is_empty());
        assert!(step.keep_running);
        assert!(core.state().is_run_active());
        assert_eq!(core.state().watcher_error(), Some("permission denied"));
        assert_eq!(core.state().status(), "Watcher error: permission denied");

        core.step(changed("a.cpp", false));
        assert_eq!(core.state().watcher_error(), None);
    }

    #[test]
    fn progress_events_update_cases_and_counters() {
        let mut core = ControllerCore::new(continuous(), Some(PathBuf::from("a.cpp")));
        core.start();

        core.step(ControllerEvent::Workflow(WorkflowEvent::PhaseStarted {
            phase: Phase::Compile,
            index: 3,
            total: 4,
        }));
        assert_eq!(core.state().status(), Phase::Compile.display_name());

        let cases = vec![
            PromptCase {
                inputs: vec!["1".into()],
                outputs: vec!["1".into()],
            },
            PromptCase {
                inputs: vec!["2".into()],
                outputs: vec!["4".into()],
            },
        ];
        core.step(ControllerEvent::Workflow(WorkflowEvent::TestsInitialized { total: 2, cases }));
        assert_eq!(core.state().cases().len(), 2);
        assert_eq!(core.state().cases()[1].status, TestStatus::Pending);
        assert_eq!(core.state().cases()[1].expected, vec!["4".to_string()]);

        core.step(ControllerEvent::Workflow(WorkflowEvent::CaseStatus(CaseUpdate {
            current: 1,
            total: 2,
            passed: 1,
            status: TestStatus::Passed,
            compile_success: true,
            assertion_success: true,
            actual: vec!["1".into()],
            error: None,
        })));
        let mismatch = CaseError::Mismatch(CompareError::Line {
            line: 1,
            expected: "4".into(),
            actual: "5".into(),
        });
        core.step(ControllerEvent::Workflow(WorkflowEvent::CaseStatus(CaseUpdate {
            current: 2,
            total: 2,
            passed: 1,
            status: TestStatus::Failed,
            compile_success: true,
            assertion_success: false,
            actual: vec!["5".into()],
            error: Some(mismatch.clone()),
        })));

        let state = core.state();
        assert_eq!(state.tests_passed(), 1);
        assert_eq!(state.current_case(), 2);
        assert!(state.cases()[0].assertion_ok);
        assert_eq!(state.cases()[1].actual, vec!["5".to_string()]);
        assert!(state.status().starts_with("Case 2/2 failed: "));

        let error = RunError::Case { index: 2, source: mismatch };
        core.step(finished(1, 2, Some(error.clone())));
        assert_eq!(core.state().last_error(), Some(&error));
        assert!(core.state().is_run_finished());
    }

    #[test]
    fn new_run_resets_per_run_state() {
        let mut core = ControllerCore::new(continuous(), Some(PathBuf::from("a.cpp")));
        core.start();
        core.step(ControllerEvent::Workflow(WorkflowEvent::TestsInitialized {
            total: 1,
            cases: vec![PromptCase::default()],
        }));
        core.step(finished(0, 1, None));

        let step = core.step(changed("b.cpp", false));
        assert_eq!(step.commands, start("b.cpp"));
        let state = core.state();
        assert!(state.cases().is_empty());
        assert_eq!(state.summary(), None);
        assert_eq!(state.tests_total(), 0);
        assert_eq!(state.status(), "Preparing run...");
    }

    #[test]
    fn selection_moves_within_bounds() {
        let mut core = ControllerCore::new(continuous(), None);
        core.step(ControllerEvent::Select(SelectionMove::Down));
        assert_eq!(core.state().selected_index(), None);

        core.step(changed("a.cpp", true));
        core.step(ControllerEvent::Workflow(WorkflowEvent::TestsInitialized {
            total: 2,
            cases: vec![PromptCase::default(), PromptCase::default()],
        }));
        core.step(ControllerEvent::Select(SelectionMove::Up));
        assert_eq!(core.state().selected_index(), None);
        core.step(ControllerEvent::Select(SelectionMove::Down));
        core.step(ControllerEvent::Select(SelectionMove::Down));
        core.step(ControllerEvent::Select(SelectionMove::Down));
        assert_eq!(core.state().selected_index(), Some(1));
        assert_eq!(core.state().selected_case().map(|c| c.name.as_str()), Some("Case 2"));
        core.step(ControllerEvent::Select(SelectionMove::Up));
        assert_eq!(core.state().selected_index(), Some(0));
        core.step(ControllerEvent::Select(SelectionMove::Clear));
        assert_eq!(core.state().selected_index(), None);
    }

    #[test]
    fn closed_run_channel_aborts_the_run_and_starts_the_queued_one() {
        let mut core = ControllerCore::new(continuous(), Some(PathBuf::from("a.cpp")));
        core.start();
        core.step(changed("a.cpp", true));
        core.step(changed("b.cpp", false));
        assert_eq!(core.state().queued_path(), Some(Path::new("b.cpp")));

        let step = core.step(ControllerEvent::RunChannelClosed);
        assert_eq!(step.commands, start("b.cpp"));
        assert!(core.state().is_run_active());
        assert_eq!(core.state().queued_path(), None);

        core.step(ControllerEvent::RunChannelClosed);
        assert!(!core.state().is_run_active());
        assert!(matches!(core.state().last_error(), Some(RunError::Aborted(_))));
        assert_eq!(core.state().last_error().and_then(RunError::case_index), None);

        // A late close after the run was finalized changes nothing.
        let step = core.step(ControllerEvent::RunChannelClosed);
        assert!(step.commands.is_empty());
        assert!(!core.state().is_run_active());
    }

    #[test]
    fn closed_run_channel_after_finished_is_ignored() {
        let mut core = ControllerCore::new(ControllerOptions { once: true }, Some(PathBuf::from("a.cpp")));
        core.start();
        core.step(finished(1, 1, None));
        let step = core.step(ControllerEvent::RunChannelClosed);
        assert_eq!(step, CoreStep::none());
        assert_eq!(core.state().last_error(), None);
    }

    #[test]
    fn shutdown_stops_the_loop() {
        let mut core = ControllerCore::new(continuous(), None);
        assert!(!core.step(ControllerEvent::ShutdownRequested).keep_running);
    }
}
