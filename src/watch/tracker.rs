// src/watch/tracker.rs

//! Per-tick de-duplication of resolution outcomes.
//!
//! Pure state: no timers, no channels. The watcher task feeds one resolution
//! result per tick and forwards whatever event comes back.

use std::path::PathBuf;
use std::time::SystemTime;

use crate::watch::resolver::ResolvedTarget;

/// Events emitted by the watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A new current file, or the current file was modified.
    Changed {
        path: PathBuf,
        modified: SystemTime,
        /// True for the first successful resolution since the watcher started.
        initial: bool,
    },
    /// Nothing matches any more.
    Idle,
    /// Resolution failed; repeated every tick while it persists.
    Error(String),
}

#[derive(Debug)]
pub struct WatchTracker {
    first_tick: bool,
    resolved_once: bool,
    had_file: bool,
    last: Option<ResolvedTarget>,
}

impl Default for WatchTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchTracker {
    pub fn new() -> Self {
        Self {
            first_tick: true,
            resolved_once: false,
            had_file: false,
            last: None,
        }
    }

    /// Feed one tick's resolution outcome; returns the event to emit, if any.
    pub fn observe(&mut self, outcome: anyhow::Result<Option<ResolvedTarget>>) -> Option<WatchEvent> {
        let first_tick = std::mem::replace(&mut self.first_tick, false);

        match outcome {
            Ok(Some(target)) => {
                self.had_file = true;
                let changed = match &self.last {
                    None => true,
                    Some(last) => last.path != target.path || target.modified > last.modified,
                };
                if !(first_tick || changed) {
                    return None;
                }
                let initial = !self.resolved_once;
                self.resolved_once = true;
                self.last = Some(target.clone());
                Some(WatchEvent::Changed {
                    path: target.path,
                    modified: target.modified,
                    initial,
                })
            }
            Ok(None) => {
                let emit = self.had_file || first_tick;
                self.had_file = false;
                emit.then_some(WatchEvent::Idle)
            }
            Err(err) => Some(WatchEvent::Error(format!("{err:#}"))),
        }
    }
}
