//! Peephole run-length pass.

use crate::instruction::Instruction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An instruction repeated `count` times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub instruction: Instruction,
    pub count: usize,
}

impl Run {
    pub fn single(instruction: Instruction) -> Self {
        Self {
            instruction,
            count: 1,
        }
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "{}", self.instruction)
        } else {
            write!(f, "{}x{}", self.instruction, self.count)
        }
    }
}

/// Merge adjacent identical moves and cell updates into runs.
///
/// Everything else passes through as a run of one.
pub fn collapse(instructions: &[Instruction]) -> Vec<Run> {
    let runs: Vec<Run> = instructions.iter().copied().map(Run::single).collect();
    collapse_runs(&runs)
}

/// Re-collapse a run-length form; applying it twice changes nothing.
pub fn collapse_runs(runs: &[Run]) -> Vec<Run> {
    let mut out: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        match out.last_mut() {
            Some(last)
                if last.instruction == run.instruction && run.instruction.is_collapsible() =>
            {
                last.count += run.count;
            }
            _ => out.push(*run),
        }
    }
    out
}

/// Expand runs back into single instructions
pub fn expand(runs: &[Run]) -> Vec<Instruction> {
    runs.iter()
        .flat_map(|run| std::iter::repeat(run.instruction).take(run.count))
        .collect()
}

/// Compact listing, one run per space-separated item
pub fn listing(runs: &[Run]) -> String {
    runs.iter()
        .map(|run| run.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use Instruction::*;

    #[test]
    fn test_collapse_merges_moves_and_updates() {
        let runs = collapse(&[Increment, Increment, Increment, Right, Right, Decrement, Left]);
        assert_eq!(
            runs,
            vec![
                Run { instruction: Increment, count: 3 },
                Run { instruction: Right, count: 2 },
                Run::single(Decrement),
                Run::single(Left),
            ]
        );
    }

    #[test]
    fn test_collapse_keeps_other_instructions_apart() {
        let runs = collapse(&[
            Output, Output, LoopStart, LoopStart, LoopEnd, LoopEnd, AddCells, AddCells,
        ]);
        assert_eq!(runs.len(), 8);
        assert!(runs.iter().all(|r| r.count == 1));
    }

    #[test]
    fn test_listing() {
        let runs = collapse(&[Increment, Increment, LoopStart, Decrement, LoopEnd, OutputNum]);
        assert_eq!(listing(&runs), "+x2 [ - ] outnum");
    }

    #[test]
    fn test_empty() {
        assert!(collapse(&[]).is_empty());
        assert!(expand(&[]).is_empty());
    }

    fn instruction() -> impl Strategy<Value = Instruction> {
        prop::sample::select(Instruction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_collapse_is_idempotent(program in prop::collection::vec(instruction(), 0..80)) {
            let once = collapse(&program);
            prop_assert_eq!(collapse_runs(&once), once.clone());
            prop_assert_eq!(collapse(&expand(&once)), once);
        }

        #[test]
        fn prop_expand_inverts_collapse(program in prop::collection::vec(instruction(), 0..80)) {
            prop_assert_eq!(expand(&collapse(&program)), program);
        }
    }
}
