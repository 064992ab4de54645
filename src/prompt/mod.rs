// src/prompt/mod.rs

//! Embedded test-case extraction.
//!
//! Test cases live inside `/*defiprompt ... */` comment blocks of the source
//! file under test:
//!
//! ```text
//! /*defiprompt
//! INPUTS:
//! 3
//! 1 2 3
//! OUTPUT:
//! 6
//! -*-
//! INPUTS:
//! ...
//! */
//! ```

pub mod parser;

pub use parser::{parse_prompt_content, PromptCase, PromptParser, BLOCK_END, BLOCK_START, CASE_SEPARATOR};
