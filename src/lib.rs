// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod prompt;
pub mod types;
pub mod watch;
pub mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::AppConfig;
use crate::engine::{Controller, ControllerCore, ControllerEvent, ControllerOptions, LineRenderer, RunState};
use crate::exec::BuildLayout;
use crate::fs::{FileSystem, RealFileSystem};
use crate::workflow::backend::RealWorkflowBackend;

/// Capacity of the watcher and control channels.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and initial target resolution
/// - the polling watcher (disabled in --once mode)
/// - the workflow backend and controller
/// - Ctrl-C handling
///
/// Returns the process exit code.
pub async fn run(args: CliArgs) -> Result<i32> {
    let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let cfg = AppConfig::from_args(&args, &work_dir, fs.as_ref())?;
    let initial = cfg.initial_path(fs.as_ref())?;
    info!(spec = %cfg.spec.display_base(), initial = ?initial, once = cfg.once, "starting defi");

    let backend = RealWorkflowBackend::new(Arc::clone(&fs), cfg.languages.clone(), BuildLayout::new(&work_dir))
        .with_compile_flags(cfg.compile_flags.clone())
        .with_case_timeout(cfg.case_timeout);

    let options = ControllerOptions { once: cfg.once };
    let core = ControllerCore::new(options, initial);

    // Ctrl-C → graceful shutdown.
    let (control_tx, control_rx) = mpsc::channel::<ControllerEvent>(EVENT_CHANNEL_CAPACITY);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = control_tx.send(ControllerEvent::ShutdownRequested).await;
    });

    let mut controller = Controller::new(core, backend, LineRenderer::new(std::io::stdout())).with_control(control_rx);

    // Optional file watcher (disabled in --once mode).
    let watcher = if !cfg.once {
        let (watch_tx, watch_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        controller = controller.with_watch_events(watch_rx);
        Some(crate::watch::spawn_watcher(
            cfg.spec.clone(),
            cfg.languages.clone(),
            cfg.interval,
            Arc::clone(&fs),
            watch_tx,
        ))
    } else {
        None
    };

    let state = controller.run().await?;

    if let Some(handle) = watcher {
        handle.abort();
    }

    Ok(report_summary(&state, cfg.once))
}

/// Print the final summary and compute the exit code.
///
/// Continuous mode only stops on interrupt and always exits 0. Single-shot
/// mode exits 1 when the run reported an error.
fn report_summary(state: &RunState, once: bool) -> i32 {
    let Some(summary) = state.summary() else {
        debug!("no run completed before exit");
        return 0;
    };

    println!("Tests passed: {}/{}", summary.passed, summary.total);
    if let Some(err) = &summary.error {
        eprintln!("Error: {err}");
    }

    if once && !summary.is_success() { 1 } else { 0 }
}
