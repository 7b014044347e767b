//! Intermediate representation and encoding layer for Heptachord notation.
//!
//! This crate maps between the seven-glyph notation and tape-machine instructions:
//! - Catalog: every operation and its interchangeable patterns
//! - Validation: the no-triple-repetition rule and loop structure
//! - Decoder: greedy longest-match translation of notation
//! - Generator: candidate rotation that keeps emitted text valid
//! - Optimize: run-length collapsing of instruction streams

pub mod instruction;
pub mod program;
pub mod catalog;
pub mod validation;
pub mod decoder;
pub mod generator;
pub mod optimize;

pub use instruction::Instruction;
pub use program::Program;
pub use catalog::{Catalog, Operation, Pattern};
pub use validation::{loop_table, validate_program, RepetitionValidator};
pub use decoder::{Decoded, Decoder, Token};
pub use generator::{ForcedFlush, Generated, Generator};
pub use optimize::{collapse, collapse_runs, expand, Run};

use hepta_core::{GeneratorConfig, Result};

/// Decode notation with the built-in catalog and default validator
pub fn decode(source: &str) -> Result<Program> {
    Decoder::new(Catalog::standard(), RepetitionValidator::default()).decode(source)
}

/// Generate notation with the built-in catalog and default settings
pub fn generate(instructions: &[Instruction]) -> String {
    Generator::new(
        Catalog::standard(),
        RepetitionValidator::default(),
        GeneratorConfig::default(),
    )
    .generate(instructions)
    .source()
}
