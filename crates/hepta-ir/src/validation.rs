//! Validation for notation text and instruction programs.
//!
//! The repetition rule forbids any substring, of any length, from appearing
//! more than `max_consecutive_repeats` times in a row once whitespace is
//! removed. Single characters are simply the length-1 case of the same scan.

use crate::instruction::Instruction;
use hepta_core::{Bracket, Error, Result, ValidatorConfig, Violation};

/// Scanner for runs of consecutive identical windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepetitionValidator {
    max_consecutive_repeats: usize,
}

impl Default for RepetitionValidator {
    fn default() -> Self {
        Self::new(2)
    }
}

impl RepetitionValidator {
    /// A limit of zero is raised to one: no text could satisfy it.
    pub fn new(max_consecutive_repeats: usize) -> Self {
        Self {
            max_consecutive_repeats: max_consecutive_repeats.max(1),
        }
    }

    pub fn from_config(config: &ValidatorConfig) -> Self {
        Self::new(config.max_consecutive_repeats)
    }

    pub fn max_consecutive_repeats(&self) -> usize {
        self.max_consecutive_repeats
    }

    pub fn is_valid(&self, text: &str) -> bool {
        self.check(text).is_ok()
    }

    /// Scan `text` and report the first violation.
    ///
    /// Lengths are scanned shortest first and start indices ascending, so the
    /// reported violation is deterministic.
    pub fn check(&self, text: &str) -> std::result::Result<(), Violation> {
        let flat = flatten(text);
        match self.find_violation(&flat) {
            Some(v) => Err(v),
            None => Ok(()),
        }
    }

    /// Like [`check`](Self::check), over already flattened characters.
    pub fn find_violation(&self, s: &[char]) -> Option<Violation> {
        self.find_violation_ending_after(s, 0)
    }

    /// Report only runs whose last required copy ends at or after `from`.
    ///
    /// When `s[..from]` is already valid, any violation in `s` must end in the
    /// suffix, so this answers the same question as [`find_violation`](Self::find_violation)
    /// while skipping windows that lie wholly inside the prefix.
    pub fn find_violation_ending_after(&self, s: &[char], from: usize) -> Option<Violation> {
        let copies = self.max_consecutive_repeats + 1;
        let n = s.len();

        for len in 1..=n / copies {
            let span = copies * len;
            let first = (from + 1).saturating_sub(span);
            for start in first..=n - span {
                if let Some(v) = self.run_at(s, start, len) {
                    return Some(v);
                }
            }
        }

        None
    }

    fn run_at(&self, s: &[char], start: usize, len: usize) -> Option<Violation> {
        let copies = self.max_consecutive_repeats + 1;
        let n = s.len();
        let window = &s[start..start + len];
        let repeated = (1..copies).all(|k| {
            let at = start + k * len;
            &s[at..at + len] == window
        });
        if !repeated {
            return None;
        }

        let mut repeats = copies;
        while start + (repeats + 1) * len <= n
            && &s[start + repeats * len..start + (repeats + 1) * len] == window
        {
            repeats += 1;
        }

        Some(Violation {
            pattern: window.iter().collect(),
            length: len,
            repeats,
            index: start,
        })
    }
}

/// Drop all whitespace, newlines included
pub fn flatten(text: &str) -> Vec<char> {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Pair every loop bracket with its partner.
///
/// The returned table holds, at each bracket's index, the index of the
/// matching bracket; other slots are zero. Unmatched brackets fail before
/// anything executes.
pub fn loop_table(instructions: &[Instruction]) -> Result<Vec<usize>> {
    let mut table = vec![0; instructions.len()];
    let mut open = Vec::new();

    for (idx, inst) in instructions.iter().enumerate() {
        match inst {
            Instruction::LoopStart => open.push(idx),
            Instruction::LoopEnd => {
                let start = open.pop().ok_or(Error::UnbalancedStructure {
                    index: idx,
                    kind: Bracket::Close,
                })?;
                table[start] = idx;
                table[idx] = start;
            }
            _ => {}
        }
    }

    if let Some(&idx) = open.last() {
        return Err(Error::UnbalancedStructure {
            index: idx,
            kind: Bracket::Open,
        });
    }

    Ok(table)
}

/// Validate that a program is structurally well-formed
pub fn validate_program(instructions: &[Instruction]) -> Result<()> {
    loop_table(instructions).map(|_| ())
}
