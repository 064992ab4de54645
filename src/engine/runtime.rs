// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::watch::WatchEvent;
use crate::workflow::backend::WorkflowBackend;
use crate::workflow::WorkflowEvent;

use super::core::ControllerCore;
use super::render::Renderer;
use super::state::RunState;
use super::{ControllerEvent, CoreCommand};

/// Drives the controller core in response to watcher, workflow and control
/// events, and delegates runs to a `WorkflowBackend`.
///
/// This is a pure IO shell around `ControllerCore`, which contains all the
/// controller semantics. This struct handles async IO: reading events from
/// channels, starting runs and invoking the renderer after every event.
pub struct Controller<B: WorkflowBackend, R: Renderer> {
    core: ControllerCore,
    watch_rx: Option<mpsc::Receiver<WatchEvent>>,
    run_rx: Option<mpsc::Receiver<WorkflowEvent>>,
    control_rx: Option<mpsc::Receiver<ControllerEvent>>,
    backend: B,
    renderer: R,
}

impl<B: WorkflowBackend, R: Renderer> fmt::Debug for Controller<B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("core", &self.core)
            .field("run_active", &self.run_rx.is_some())
            .finish_non_exhaustive()
    }
}

/// Which source produced the next item; `None` means that source closed.
enum Incoming {
    Run(Option<WorkflowEvent>),
    Watch(Option<WatchEvent>),
    Control(Option<ControllerEvent>),
}

/// Receive from an optional channel; pending forever when absent.
async fn recv_or_pending<T>(rx: &mut Option<mpsc::Receiver<T>>) -> Option<T> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

impl<B: WorkflowBackend, R: Renderer> Controller<B, R> {
    pub fn new(core: ControllerCore, backend: B, renderer: R) -> Self {
        Self {
            core,
            watch_rx: None,
            run_rx: None,
            control_rx: None,
            backend,
            renderer,
        }
    }

    /// Attach the watcher's event stream.
    pub fn with_watch_events(mut self, rx: mpsc::Receiver<WatchEvent>) -> Self {
        self.watch_rx = Some(rx);
        self
    }

    /// Attach a channel for explicit run requests, selection and shutdown.
    pub fn with_control(mut self, rx: mpsc::Receiver<ControllerEvent>) -> Self {
        self.control_rx = Some(rx);
        self
    }

    /// Main event loop.
    ///
    /// - Executes the startup commands (initial run).
    /// - Consumes events from the watch, run and control channels.
    /// - Feeds them into the core and executes the commands it returns.
    ///
    /// Returns the final state once the core requests exit or every event
    /// source is closed.
    pub async fn run(mut self) -> Result<RunState> {
        info!("defi controller started");

        let step = self.core.start();
        for command in step.commands {
            self.execute_command(command);
        }
        self.renderer.render(self.core.state());

        loop {
            if self.watch_rx.is_none() && self.run_rx.is_none() && self.control_rx.is_none() {
                info!("all event sources closed; exiting");
                break;
            }

            let incoming = tokio::select! {
                ev = recv_or_pending(&mut self.run_rx) => Incoming::Run(ev),
                ev = recv_or_pending(&mut self.watch_rx) => Incoming::Watch(ev),
                ev = recv_or_pending(&mut self.control_rx) => Incoming::Control(ev),
            };

            let event = match incoming {
                Incoming::Run(Some(ev)) => ControllerEvent::Workflow(ev),
                Incoming::Watch(Some(ev)) => ControllerEvent::Watch(ev),
                Incoming::Control(Some(ev)) => ev,
                Incoming::Run(None) => {
                    debug!("run channel closed");
                    self.run_rx = None;
                    ControllerEvent::RunChannelClosed
                }
                Incoming::Watch(None) => {
                    info!("watch channel closed");
                    self.watch_rx = None;
                    continue;
                }
                Incoming::Control(None) => {
                    debug!("control channel closed");
                    self.control_rx = None;
                    continue;
                }
            };

            debug!(?event, "controller received event");

            let step = self.core.step(event);
            for command in step.commands {
                self.execute_command(command);
            }
            self.renderer.render(self.core.state());

            if !step.keep_running {
                info!("core requested exit; stopping controller");
                break;
            }
        }

        info!("controller exiting");
        Ok(self.core.into_state())
    }

    /// Execute a single command from the core.
    fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::StartRun(path) => {
                debug!(path = %path.display(), "dispatching run to backend");
                // The core only starts a run once the previous one has been
                // finalized, so the old receiver is no longer needed.
                self.run_rx = Some(self.backend.start_run(&path));
            }
            CoreCommand::RequestExit => {
                info!("core issued RequestExit command");
            }
        }
    }
}
