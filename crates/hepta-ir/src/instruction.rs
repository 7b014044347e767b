//! Instruction set of the tape machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A tape-machine primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    Right,
    Left,
    Increment,
    Decrement,
    Output,
    Input,
    OutputNum,
    LoopStart,
    LoopEnd,
    AddCells,  // cell += next; next = 0
    SubCells,  // cell -= next; next = 0
}

impl Instruction {
    pub const ALL: [Instruction; 11] = [
        Instruction::Right,
        Instruction::Left,
        Instruction::Increment,
        Instruction::Decrement,
        Instruction::Output,
        Instruction::Input,
        Instruction::OutputNum,
        Instruction::LoopStart,
        Instruction::LoopEnd,
        Instruction::AddCells,
        Instruction::SubCells,
    ];

    /// Dense index, usable for per-instruction counters
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns true if adjacent copies may be merged into one run
    pub fn is_collapsible(&self) -> bool {
        matches!(
            self,
            Instruction::Right | Instruction::Left | Instruction::Increment | Instruction::Decrement
        )
    }

    /// Returns true if this instruction is a loop bracket
    pub fn is_bracket(&self) -> bool {
        matches!(self, Instruction::LoopStart | Instruction::LoopEnd)
    }

    /// Single-character code in the classic eight-symbol tape language.
    ///
    /// Macros and `OutputNum` have no code of their own.
    pub fn classic_code(&self) -> Option<char> {
        match self {
            Instruction::Right => Some('>'),
            Instruction::Left => Some('<'),
            Instruction::Increment => Some('+'),
            Instruction::Decrement => Some('-'),
            Instruction::Output => Some('.'),
            Instruction::Input => Some(','),
            Instruction::LoopStart => Some('['),
            Instruction::LoopEnd => Some(']'),
            Instruction::OutputNum | Instruction::AddCells | Instruction::SubCells => None,
        }
    }

    pub fn from_classic_code(c: char) -> Option<Instruction> {
        match c {
            '>' => Some(Instruction::Right),
            '<' => Some(Instruction::Left),
            '+' => Some(Instruction::Increment),
            '-' => Some(Instruction::Decrement),
            '.' => Some(Instruction::Output),
            ',' => Some(Instruction::Input),
            '[' => Some(Instruction::LoopStart),
            ']' => Some(Instruction::LoopEnd),
            _ => None,
        }
    }

    /// Expansion of a macro into classic primitives
    pub fn decomposition(&self) -> Option<&'static [Instruction]> {
        use Instruction::*;
        match self {
            AddCells => Some(&[Right, LoopStart, Decrement, Left, Increment, Right, LoopEnd, Left]),
            SubCells => Some(&[Right, LoopStart, Decrement, Left, Decrement, Right, LoopEnd, Left]),
            _ => None,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Right => "right",
            Instruction::Left => "left",
            Instruction::Increment => "inc",
            Instruction::Decrement => "dec",
            Instruction::Output => "out",
            Instruction::Input => "in",
            Instruction::OutputNum => "outnum",
            Instruction::LoopStart => "loop",
            Instruction::LoopEnd => "end",
            Instruction::AddCells => "addcells",
            Instruction::SubCells => "subcells",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.classic_code() {
            Some(code) => write!(f, "{}", code),
            None => write!(f, "{}", self.mnemonic()),
        }
    }
}
