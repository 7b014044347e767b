//! Configuration types for compilation and execution.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Repetition validator parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Largest number of consecutive identical copies allowed (a run of one more is a violation)
    pub max_consecutive_repeats: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_consecutive_repeats: 2,
        }
    }
}

/// How the generator picks the trailing halt pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltSelection {
    /// Always the first halt pattern in catalog order
    First,
    /// A pattern drawn from a generator seeded with this value
    Seeded(u64),
}

/// Generator parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub halt: HaltSelection,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            halt: HaltSelection::First,
        }
    }
}

/// Interpreter execution limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Maximum instructions executed per run (`None` is unlimited)
    pub max_steps: Option<u64>,
    /// Maximum number of tape cells
    pub max_tape_cells: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_steps: Some(10_000_000),
            max_tape_cells: 1 << 20, // 1 MiB
        }
    }
}

/// Top-level configuration, loadable from a JSON file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeptaConfig {
    pub validator: ValidatorConfig,
    pub generator: GeneratorConfig,
    pub interpreter: InterpreterConfig,
}

impl HeptaConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: HeptaConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject settings no component can honor
    pub fn validate(&self) -> Result<()> {
        if self.validator.max_consecutive_repeats == 0 {
            return Err(Error::Config(
                "validator.max_consecutive_repeats must be at least 1".to_string(),
            ));
        }
        if self.interpreter.max_tape_cells == 0 {
            return Err(Error::Config(
                "interpreter.max_tape_cells must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
