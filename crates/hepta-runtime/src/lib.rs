//! Tape machine for executing decoded programs.
//!
//! This module provides the execution environment, including:
//! - A byte-cell tape that grows to the right
//! - Loop pairing before the first step
//! - Step and tape-size limits

pub mod tape;
pub mod interpreter;

pub use tape::Tape;
pub use interpreter::{Execution, Interpreter};

use hepta_core::{InterpreterConfig, Result};
use hepta_ir::Instruction;

/// Run `instructions` with default limits
pub fn run(instructions: &[Instruction], input: &[u8]) -> Result<Vec<u8>> {
    Interpreter::new(InterpreterConfig::default())
        .run(instructions, input)
        .map(|execution| execution.output)
}
