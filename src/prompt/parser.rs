// src/prompt/parser.rs

use std::path::PathBuf;

use tracing::debug;

use crate::errors::ParseError;
use crate::fs::FileSystem;

/// Token opening a prompt block.
pub const BLOCK_START: &str = "/*defiprompt";
/// Token closing a prompt block.
pub const BLOCK_END: &str = "*/";
/// Line separating two consecutive cases inside a block.
pub const CASE_SEPARATOR: &str = "-*-";

/// A single parsed prompt: the lines fed to stdin and the expected stdout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptCase {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Extracts prompt cases from a source file.
#[derive(Debug, Clone)]
pub struct PromptParser {
    path: PathBuf,
}

impl PromptParser {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the file and return every case from every prompt block.
    ///
    /// A file without cases is an error ([`ParseError::NoCases`]).
    pub fn parse(&self, fs: &dyn FileSystem) -> Result<Vec<PromptCase>, ParseError> {
        let content = fs.read_to_string(&self.path).map_err(|e| ParseError::Read {
            path: self.path.display().to_string(),
            message: format!("{e:#}"),
        })?;

        let cases = parse_prompt_content(&content)?;
        if cases.is_empty() {
            return Err(ParseError::NoCases);
        }

        debug!(path = %self.path.display(), cases = cases.len(), "parsed prompt cases");
        Ok(cases)
    }
}

/// Scan `content` for prompt blocks and concatenate their cases in file order.
pub fn parse_prompt_content(content: &str) -> Result<Vec<PromptCase>, ParseError> {
    let mut cases = Vec::new();
    let mut rest = content;

    while let Some(start) = rest.find(BLOCK_START) {
        let after_marker = &rest[start + BLOCK_START.len()..];
        let end = after_marker.find(BLOCK_END).ok_or(ParseError::Unterminated)?;

        cases.extend(parse_prompt_block(&after_marker[..end])?);
        rest = &after_marker[end + BLOCK_END.len()..];
    }

    Ok(cases)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Inputs,
    Outputs,
}

/// Line-oriented state machine over the body of one block.
#[derive(Debug)]
struct BlockParser {
    cases: Vec<PromptCase>,
    current: Option<PromptCase>,
    section: Section,
}

impl BlockParser {
    fn new() -> Self {
        Self {
            cases: Vec::new(),
            current: None,
            section: Section::None,
        }
    }

    fn flush(&mut self) -> Result<(), ParseError> {
        self.section = Section::None;
        let Some(case) = self.current.take() else {
            return Ok(());
        };
        if case.inputs.is_empty() || case.outputs.is_empty() {
            return Err(ParseError::IncompleteCase);
        }
        self.cases.push(case);
        Ok(())
    }

    fn feed(&mut self, raw: &str) -> Result<(), ParseError> {
        let line = raw.trim();
        match line {
            "" => {}
            "INPUTS" | "INPUTS:" => {
                self.flush()?;
                self.current = Some(PromptCase::default());
                self.section = Section::Inputs;
            }
            "OUTPUT" | "OUTPUT:" => {
                if self.current.is_none() {
                    return Err(ParseError::OutputBeforeInputs);
                }
                self.section = Section::Outputs;
            }
            CASE_SEPARATOR => self.flush()?,
            _ => {
                if let Some(case) = self.current.as_mut() {
                    match self.section {
                        Section::Inputs => case.inputs.push(line.to_string()),
                        Section::Outputs => case.outputs.push(line.to_string()),
                        Section::None => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<PromptCase>, ParseError> {
        self.flush()?;
        Ok(self.cases)
    }
}

fn parse_prompt_block(block: &str) -> Result<Vec<PromptCase>, ParseError> {
    let mut parser = BlockParser::new();
    for line in block.lines() {
        parser.feed(line)?;
    }
    parser.finish()
}
