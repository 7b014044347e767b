//! Error types for the compiler and interpreter.

use crate::types::{Bracket, Violation};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog invariant violated: {0}")]
    CatalogInvariant(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(Violation),

    #[error("Unbalanced structure: unmatched {kind} at instruction {index}")]
    UnbalancedStructure { index: usize, kind: Bracket },

    #[error("Pointer underflow: instruction {instruction} moves left of cell 0")]
    PointerUnderflow { instruction: usize },

    #[error("Step limit exceeded: {limit} steps")]
    StepLimitExceeded { limit: u64 },

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Unrepresentable instruction: {0}")]
    Unrepresentable(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
