// tests/watcher_polling.rs

use defi_test_utils::{init_tracing, with_timeout};

use std::error::Error;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::mpsc;

use defi::exec::LanguageTable;
use defi::fs::RealFileSystem;
use defi::watch::{spawn_watcher, WatchEvent, WatchSpec};

type TestResult = Result<(), Box<dyn Error>>;

const INTERVAL: Duration = Duration::from_millis(20);

fn write_with_mtime(path: &Path, secs_ago: u64) -> std::io::Result<()> {
    fs::write(path, "int main() {}\n")?;
    let when = SystemTime::now() - Duration::from_secs(secs_ago);
    File::options().write(true).open(path)?.set_modified(when)
}

#[tokio::test]
async fn reports_newest_file_then_idle() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let a = dir.path().join("a.cpp");
    write_with_mtime(&a, 60)?;
    write_with_mtime(&dir.path().join("notes.txt"), 0)?;

    let (tx, mut rx) = mpsc::channel(16);
    let spec = WatchSpec::directory(dir.path(), None);
    let handle = spawn_watcher(spec, LanguageTable::default(), INTERVAL, Arc::new(RealFileSystem), tx);

    match with_timeout(rx.recv()).await {
        Some(WatchEvent::Changed { path, initial, .. }) => {
            assert_eq!(path, a);
            assert!(initial);
        }
        other => panic!("expected initial change, got {other:?}"),
    }

    let b = dir.path().join("b.cpp");
    write_with_mtime(&b, 30)?;
    match with_timeout(rx.recv()).await {
        Some(WatchEvent::Changed { path, initial, .. }) => {
            assert_eq!(path, b);
            assert!(!initial);
        }
        other => panic!("expected change to b.cpp, got {other:?}"),
    }

    fs::remove_file(&a)?;
    fs::remove_file(&b)?;
    assert_eq!(with_timeout(rx.recv()).await, Some(WatchEvent::Idle));

    // Idle is reported once; the next event is the file coming back.
    write_with_mtime(&a, 0)?;
    match with_timeout(rx.recv()).await {
        Some(WatchEvent::Changed { path, initial, .. }) => {
            assert_eq!(path, a);
            assert!(!initial);
        }
        other => panic!("expected change after idle, got {other:?}"),
    }

    drop(rx);
    with_timeout(handle.join()).await;
    Ok(())
}

#[tokio::test]
async fn unchanged_file_is_reported_once() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let a = dir.path().join("solo.cpp");
    write_with_mtime(&a, 10)?;

    let (tx, mut rx) = mpsc::channel(16);
    let handle = spawn_watcher(
        WatchSpec::single_file(&a),
        LanguageTable::default(),
        INTERVAL,
        Arc::new(RealFileSystem),
        tx,
    );

    assert!(matches!(with_timeout(rx.recv()).await, Some(WatchEvent::Changed { .. })));
    tokio::time::sleep(INTERVAL * 5).await;
    assert!(rx.try_recv().is_err());

    // Bumping the mtime is a change even with identical content.
    File::options().write(true).open(&a)?.set_modified(SystemTime::now())?;
    match with_timeout(rx.recv()).await {
        Some(WatchEvent::Changed { path, initial, .. }) => {
            assert_eq!(path, a);
            assert!(!initial);
        }
        other => panic!("expected change, got {other:?}"),
    }

    handle.abort();
    Ok(())
}
