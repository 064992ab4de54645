// src/workflow/phase.rs

use std::fmt;

/// Ordered steps that precede test execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Validate,
    Clean,
    Compile,
    ParsePrompts,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 4] = [
        Phase::Validate,
        Phase::Clean,
        Phase::Compile,
        Phase::ParsePrompts,
    ];

    /// Label shown while the phase is running.
    pub fn display_name(self) -> &'static str {
        match self {
            Phase::Validate => "🔍 Validating source",
            Phase::Clean => "🧹 Cleaning previous build",
            Phase::Compile => "🛠️ Compiling",
            Phase::ParsePrompts => "📝 Parsing prompts",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Validate => "validation",
            Phase::Clean => "clean",
            Phase::Compile => "compile",
            Phase::ParsePrompts => "parse prompts",
        };
        f.write_str(s)
    }
}
