// src/engine/mod.rs

//! Controller for defi.
//!
//! This module owns the single [`RunState`] and reacts to:
//! - watcher events (current file changed / went away / resolution failed)
//! - workflow progress events of the active run
//! - explicit run requests, selection moves and shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell that
//! reads the channels and starts runs is implemented in [`runtime`].

use std::path::PathBuf;

use crate::types::SelectionMove;
use crate::watch::WatchEvent;
use crate::workflow::WorkflowEvent;

/// Options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerOptions {
    /// Run once and exit when that run completes (`--once`).
    pub once: bool,
}

/// Events flowing into the controller, tagged by source.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    Watch(WatchEvent),
    Workflow(WorkflowEvent),
    /// The active run's progress channel closed.
    RunChannelClosed,
    /// Explicit request to run `path`.
    RunRequested(PathBuf),
    Select(SelectionMove),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod render;
pub mod runtime;
pub mod state;

pub use core::ControllerCore;
pub use event_handlers::{CoreCommand, CoreStep};
pub use render::{LineRenderer, NullRenderer, Renderer};
pub use runtime::Controller;
pub use state::{CaseView, PhaseProgress, RunState};
