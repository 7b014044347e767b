//! Flat instruction programs.

use crate::instruction::Instruction;
use crate::optimize::{collapse, Run};
use hepta_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// A program in instruction form.
///
/// Loops are matching `LoopStart`/`LoopEnd` markers in the flat sequence; the
/// interpreter pairs them before it runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instructions(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn push(&mut self, inst: Instruction) {
        self.instructions.push(inst);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Run-length form of this program
    pub fn collapse(&self) -> Vec<Run> {
        collapse(&self.instructions)
    }

    /// Parse classic tape-language source. Characters other than the eight codes are comments.
    pub fn from_classic(source: &str) -> Self {
        Self {
            instructions: source
                .chars()
                .filter_map(Instruction::from_classic_code)
                .collect(),
        }
    }

    /// Render as classic codes, expanding the cell macros.
    pub fn to_classic(&self) -> Result<String> {
        let mut out = String::with_capacity(self.instructions.len());
        for (idx, inst) in self.instructions.iter().enumerate() {
            if let Some(code) = inst.classic_code() {
                out.push(code);
            } else if let Some(parts) = inst.decomposition() {
                out.extend(parts.iter().filter_map(|p| p.classic_code()));
            } else {
                return Err(Error::Unrepresentable(format!(
                    "'{}' at instruction {} has no classic code",
                    inst.mnemonic(),
                    idx
                )));
            }
        }
        Ok(out)
    }

    /// Serialize the program to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize a program from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::with_instructions(instructions)
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self::with_instructions(iter.into_iter().collect())
    }
}
