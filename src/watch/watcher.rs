// src/watch/watcher.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::exec::language::LanguageTable;
use crate::fs::FileSystem;
use crate::watch::resolver::resolve;
use crate::watch::spec::WatchSpec;
use crate::watch::tracker::{WatchEvent, WatchTracker};

/// Poll interval used when none (or zero) is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Smallest accepted poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Handle for the polling watcher task.
///
/// The task stops on its own once the receiving side of its channel is
/// dropped; the handle only lets callers await or abort it.
pub struct WatcherHandle {
    task: JoinHandle<()>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("finished", &self.task.is_finished())
            .finish()
    }
}

impl WatcherHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn abort(&self) {
        self.task.abort();
    }

    /// Wait for the watcher loop to exit.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

pub fn effective_interval(interval: Duration) -> Duration {
    if interval.is_zero() {
        DEFAULT_POLL_INTERVAL
    } else {
        interval.max(MIN_POLL_INTERVAL)
    }
}

/// Spawn the polling watcher.
///
/// Every `interval` the target is resolved and the outcome is run through a
/// [`WatchTracker`]; resulting events are sent to `tx`. The first tick fires
/// immediately. The loop ends when `tx` is closed by the consumer.
pub fn spawn_watcher(
    spec: WatchSpec,
    languages: LanguageTable,
    interval: Duration,
    fs: Arc<dyn FileSystem>,
    tx: mpsc::Sender<WatchEvent>,
) -> WatcherHandle {
    let interval = effective_interval(interval);
    let spec = Arc::new(spec);
    let languages = Arc::new(languages);

    let task = tokio::spawn(async move {
        info!(target_spec = %spec.display_base(), ?interval, "watcher started");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut tracker = WatchTracker::new();

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tx.closed() => break,
            }

            let outcome = {
                let spec = Arc::clone(&spec);
                let languages = Arc::clone(&languages);
                let fs = Arc::clone(&fs);
                tokio::task::spawn_blocking(move || resolve(&spec, &languages, fs.as_ref()))
                    .await
                    .unwrap_or_else(|join_err| Err(anyhow::anyhow!("resolver task failed: {join_err}")))
            };

            let Some(event) = tracker.observe(outcome) else {
                continue;
            };

            match &event {
                WatchEvent::Error(err) => warn!(error = %err, "target resolution failed"),
                other => debug!(event = ?other, "watch event"),
            }

            if tx.send(event).await.is_err() {
                break;
            }
        }

        debug!("watcher loop finished (channel closed)");
    });

    WatcherHandle { task }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_clamped() {
        assert_eq!(effective_interval(Duration::ZERO), DEFAULT_POLL_INTERVAL);
        assert_eq!(effective_interval(Duration::from_nanos(1)), MIN_POLL_INTERVAL);
        assert_eq!(effective_interval(Duration::from_secs(3)), Duration::from_secs(3));
    }
}
