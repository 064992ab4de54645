// src/exec/case_runner.rs

//! Runs the compiled program once for a single prompt case.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::CaseError;
use crate::prompt::PromptCase;

/// Launch `binary`, feed the case inputs on stdin and capture stdout lines.
///
/// Input lines are written newline-terminated and stdin is closed afterwards.
/// Stdout is drained concurrently until end-of-stream; trailing `\r` is
/// stripped from each line. Stderr is inherited.
///
/// With `timeout = None` the call waits for the program indefinitely.
pub async fn run_case(
    binary: &Path,
    case: &PromptCase,
    timeout: Option<Duration>,
) -> Result<Vec<String>, CaseError> {
    let mut child = Command::new(binary)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| CaseError::Spawn(e.to_string()))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| CaseError::Spawn("failed to obtain stdin".to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| CaseError::Spawn("failed to obtain stdout".to_string()))?;

    let write_inputs = async move {
        for line in &case.inputs {
            stdin.write_all(line.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
        }
        stdin.flush().await?;
        // Dropping stdin closes the pipe and signals end-of-input.
        Ok::<(), std::io::Error>(())
    };

    let read_outputs = async move {
        let mut lines = BufReader::new(stdout).lines();
        let mut outputs = Vec::new();
        while let Some(line) = lines.next_line().await? {
            outputs.push(line.trim_end_matches('\r').to_string());
        }
        Ok::<Vec<String>, std::io::Error>(outputs)
    };

    let exchange = async {
        let (written, read) = tokio::join!(write_inputs, read_outputs);
        let status = child.wait().await;
        (written, read, status)
    };

    let (written, read, status) = match timeout {
        None => exchange.await,
        Some(limit) => {
            let result = tokio::time::timeout(limit, exchange).await;
            match result {
                Ok(done) => done,
                Err(_) => {
                    warn!(binary = %binary.display(), ?limit, "test case timed out; killing process");
                    if let Err(e) = child.kill().await {
                        debug!(error = %e, "failed to kill timed out process");
                    }
                    return Err(CaseError::TimedOut(limit));
                }
            }
        }
    };

    written.map_err(|e| CaseError::WriteInput(e.to_string()))?;
    let outputs = read.map_err(|e| CaseError::ReadOutput(e.to_string()))?;
    let status = status.map_err(|e| CaseError::Exit(e.to_string()))?;

    if !status.success() {
        return Err(CaseError::Exit(status.to_string()));
    }

    debug!(lines = outputs.len(), "captured program output");
    Ok(outputs)
}
