// src/engine/render.rs

//! Rendering boundary.
//!
//! Renderers only read [`RunState`]; they are invoked by the controller after
//! every applied event. [`LineRenderer`] is the plain line-oriented renderer
//! used by the binary.

use std::io::{self, Write};
use std::path::{Component, Path};

use crate::types::TestStatus;

use super::state::{RunState, NONE_LABEL};

/// Read-only consumer of controller state.
pub trait Renderer: Send {
    fn render(&mut self, state: &RunState);
}

/// Renderer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _state: &RunState) {}
}

/// Prints status changes and the result of each finished case as lines.
pub struct LineRenderer<W: Write + Send = io::Stdout> {
    out: W,
    last_status: String,
    last_file: String,
    reported: Vec<bool>,
}

impl<W: Write + Send> LineRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_status: String::new(),
            last_file: String::new(),
            reported: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, state: &RunState) -> io::Result<()> {
        if state.display_path() != self.last_file {
            self.last_file = state.display_path().to_string();
            if !self.last_file.is_empty() {
                writeln!(self.out, "[{}] {}", state.language_label(), self.last_file)?;
            }
        }

        // A new run resets the case list; forget what was printed for the old one.
        if state.cases().len() != self.reported.len()
            || state.cases().iter().all(|c| c.status == TestStatus::Pending)
        {
            self.reported = vec![false; state.cases().len()];
        }

        for (i, case) in state.cases().iter().enumerate() {
            if !case.status.is_terminal() || self.reported[i] {
                continue;
            }
            self.reported[i] = true;
            let mark = if case.status == TestStatus::Passed { "PASS" } else { "FAIL" };
            match &case.error {
                Some(err) => writeln!(self.out, "  {mark} {}: {}", case.name, shorten(&err.to_string(), 80))?,
                None => writeln!(self.out, "  {mark} {}", case.name)?,
            }
        }

        if state.status() != self.last_status {
            self.last_status = state.status().to_string();
            writeln!(self.out, "{}", self.last_status)?;
        }
        self.out.flush()
    }
}

impl<W: Write + Send> Renderer for LineRenderer<W> {
    fn render(&mut self, state: &RunState) {
        // Output errors (closed pipe) must not stop the controller.
        let _ = self.write_frame(state);
    }
}

/// Path relative to the current directory when possible.
pub fn format_display_path(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        return String::new();
    }
    let stripped = path.strip_prefix(".").unwrap_or(path);
    if stripped.as_os_str().is_empty() {
        return ".".to_string();
    }
    stripped.display().to_string()
}

/// Base name of `path`, or `-` when it has none.
pub fn footer_filename(path: &Path) -> String {
    match path.components().next_back() {
        Some(Component::Normal(name)) => name.to_string_lossy().into_owned(),
        _ => NONE_LABEL.to_string(),
    }
}

/// Human-readable language label derived from the file extension.
pub fn language_label_for_path(path: &Path) -> String {
    let Some(ext) = path.extension() else {
        return NONE_LABEL.to_string();
    };
    let ext = ext.to_string_lossy().to_lowercase();
    let label = match ext.as_str() {
        "cpp" | "cc" | "cxx" | "hpp" | "hh" => "C++",
        "c" => "C",
        "go" => "Go",
        "py" => "Python",
        "rs" => "Rust",
        "java" => "Java",
        "js" => "JavaScript",
        "ts" => "TypeScript",
        "kt" => "Kotlin",
        "swift" => "Swift",
        "" => NONE_LABEL,
        _ => return ext,
    };
    label.to_string()
}

/// Truncate to at most `max` characters, ending in `...` when cut.
pub fn shorten(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let mut out: String = s.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::engine::{ControllerCore, ControllerEvent, ControllerOptions};
    use crate::prompt::PromptCase;
    use crate::workflow::{CaseUpdate, RunSummary, WorkflowEvent};

    #[test]
    fn shorten_counts_characters() {
        assert_eq!(shorten("hello", 10), "hello");
        assert_eq!(shorten("hello world", 8), "hello...");
        assert_eq!(shorten("héllo wörld", 6), "hél...");
        assert_eq!(shorten("hello", 2), "he");
        assert_eq!(shorten("hello", 0), "");
    }

    #[test]
    fn labels_by_extension() {
        assert_eq!(language_label_for_path(Path::new("a.cpp")), "C++");
        assert_eq!(language_label_for_path(Path::new("dir/a.HH")), "C++");
        assert_eq!(language_label_for_path(Path::new("a.py")), "Python");
        assert_eq!(language_label_for_path(Path::new("a.zig")), "zig");
        assert_eq!(language_label_for_path(Path::new("Makefile")), "-");
    }

    #[test]
    fn footer_and_display_paths() {
        assert_eq!(footer_filename(Path::new("src/main.cpp")), "main.cpp");
        assert_eq!(footer_filename(Path::new(".")), "-");
        assert_eq!(footer_filename(Path::new("/")), "-");
        assert_eq!(format_display_path(Path::new("./src/a.cpp")), "src/a.cpp");
        assert_eq!(format_display_path(Path::new("src/a.cpp")), "src/a.cpp");
        assert_eq!(format_display_path(Path::new(".")), ".");
        assert_eq!(format_display_path(Path::new("")), "");
    }

    #[test]
    fn line_renderer_reports_each_case_once() {
        let mut core = ControllerCore::new(ControllerOptions { once: true }, Some(PathBuf::from("a.cpp")));
        let mut renderer = LineRenderer::new(Vec::new());
        core.start();
        renderer.render(core.state());

        core.step(ControllerEvent::Workflow(WorkflowEvent::TestsInitialized {
            total: 1,
            cases: vec![PromptCase::default()],
        }));
        renderer.render(core.state());
        core.step(ControllerEvent::Workflow(WorkflowEvent::CaseStatus(CaseUpdate {
            current: 1,
            total: 1,
            passed: 1,
            status: TestStatus::Passed,
            compile_success: true,
            assertion_success: true,
            actual: Vec::new(),
            error: None,
        })));
        renderer.render(core.state());
        core.step(ControllerEvent::Workflow(WorkflowEvent::Finished(RunSummary {
            passed: 1,
            total: 1,
            error: None,
        })));
        renderer.render(core.state());
        renderer.render(core.state());

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.starts_with("[C++] a.cpp\n"));
        assert_eq!(text.matches("PASS Case 1").count(), 1);
        assert_eq!(text.matches("Running tests...").count(), 1);
    }

    #[test]
    fn line_renderer_header_shows_path_relative_to_cwd() {
        let core = ControllerCore::new(ControllerOptions { once: false }, Some(PathBuf::from("./src/a.cpp")));
        let mut renderer = LineRenderer::new(Vec::new());
        renderer.render(core.state());

        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text, "[C++] src/a.cpp\nListening for changes...\n");
    }
}
