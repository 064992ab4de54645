use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use defi::workflow::backend::{WorkflowBackend, RUN_CHANNEL_CAPACITY};
use defi::workflow::{Phase, RunSummary, WorkflowEvent};

/// A fake workflow backend that:
/// - records which files a run was started for
/// - emits the phase events of a successful run
/// - in gated mode, waits for [`FakeBackendHandle::release`] before
///   reporting `Finished`, so tests can queue requests while a run is active
/// - in abandoning mode, drops its sender after the first phase event and
///   never reports `Finished`
pub struct FakeWorkflowBackend {
    shared: Arc<Shared>,
    mode: Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Immediate,
    Gated,
    Abandoning,
}

#[derive(Default)]
struct Shared {
    started: Mutex<Vec<PathBuf>>,
    gate: Notify,
}

/// Test-side view of a [`FakeWorkflowBackend`].
#[derive(Clone)]
pub struct FakeBackendHandle {
    shared: Arc<Shared>,
}

impl FakeWorkflowBackend {
    /// Runs finish as soon as they start.
    pub fn immediate() -> (Self, FakeBackendHandle) {
        Self::build(Mode::Immediate)
    }

    /// Runs finish only when released.
    pub fn gated() -> (Self, FakeBackendHandle) {
        Self::build(Mode::Gated)
    }

    /// Runs close their channel without a summary, like a crashed worker.
    pub fn abandoning() -> (Self, FakeBackendHandle) {
        Self::build(Mode::Abandoning)
    }

    fn build(mode: Mode) -> (Self, FakeBackendHandle) {
        let shared = Arc::new(Shared::default());
        (
            Self {
                shared: Arc::clone(&shared),
                mode,
            },
            FakeBackendHandle { shared },
        )
    }
}

impl WorkflowBackend for FakeWorkflowBackend {
    fn start_run(&mut self, source: &Path) -> mpsc::Receiver<WorkflowEvent> {
        {
            let mut guard = self.shared.started.lock().unwrap();
            guard.push(source.to_path_buf());
        }

        let (tx, rx) = mpsc::channel(RUN_CHANNEL_CAPACITY);
        let shared = Arc::clone(&self.shared);
        let mode = self.mode;

        tokio::spawn(async move {
            let total = Phase::ALL.len();
            if mode == Mode::Abandoning {
                let _ = tx
                    .send(WorkflowEvent::PhaseStarted {
                        phase: Phase::Validate,
                        index: 1,
                        total,
                    })
                    .await;
                return;
            }

            for (i, phase) in Phase::ALL.into_iter().enumerate() {
                let _ = tx
                    .send(WorkflowEvent::PhaseStarted {
                        phase,
                        index: i + 1,
                        total,
                    })
                    .await;
                let _ = tx
                    .send(WorkflowEvent::PhaseCompleted {
                        phase,
                        index: i + 1,
                        total,
                        success: true,
                    })
                    .await;
            }

            if mode == Mode::Gated {
                shared.gate.notified().await;
            }

            let _ = tx
                .send(WorkflowEvent::Finished(RunSummary {
                    passed: 1,
                    total: 1,
                    error: None,
                }))
                .await;
        });

        rx
    }
}

impl FakeBackendHandle {
    /// Paths runs were started for, in order.
    pub fn started(&self) -> Vec<PathBuf> {
        self.shared.started.lock().unwrap().clone()
    }

    /// Let the active gated run finish.
    pub fn release(&self) {
        self.shared.gate.notify_one();
    }

    /// Wait until at least `n` runs have been started.
    pub async fn wait_for_runs(&self, n: usize) {
        loop {
            if self.started().len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}
