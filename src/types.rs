// src/types.rs

use std::fmt;

/// Status of a single test case.
///
/// The orchestrator only ever reports `Running`, `Passed` and `Failed`;
/// `Pending` is the controller's placeholder for cases that have been parsed
/// but not started yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Pending,
    Running,
    Passed,
    Failed,
}

impl TestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TestStatus::Passed | TestStatus::Failed)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestStatus::Pending => "pending",
            TestStatus::Running => "running",
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Movement of the case selection used by detail views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMove {
    Up,
    Down,
    Clear,
}
