//! Tape interpreter.

use crate::tape::Tape;
use hepta_core::{Error, InterpreterConfig, Result};
use hepta_ir::{loop_table, Instruction, Run};

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct Execution {
    pub output: Vec<u8>,
    /// Runs executed (one per instruction when running uncollapsed code)
    pub steps: u64,
    pub tape: Tape,
    counts: [u64; Instruction::ALL.len()],
}

impl Execution {
    /// How many times `inst` was executed, counting each copy inside a run
    pub fn executed(&self, inst: Instruction) -> u64 {
        self.counts[inst.index()]
    }

    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

pub struct Interpreter {
    config: InterpreterConfig,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Execute `instructions` on a fresh tape, reading from `input`.
    ///
    /// Input past the end reads as zero. Loop brackets are paired before the
    /// first instruction runs.
    pub fn run(&self, instructions: &[Instruction], input: &[u8]) -> Result<Execution> {
        self.run_with_tape(instructions, input, Tape::new(self.config.max_tape_cells))
    }

    /// Execute on a caller-prepared tape
    pub fn run_with_tape(
        &self,
        instructions: &[Instruction],
        input: &[u8],
        tape: Tape,
    ) -> Result<Execution> {
        let runs: Vec<Run> = instructions.iter().copied().map(Run::single).collect();
        self.execute(&runs, input, tape)
    }

    /// Execute the run-length form directly; each run costs one step.
    ///
    /// Error indices refer to positions in `runs`.
    pub fn run_runs(&self, runs: &[Run], input: &[u8]) -> Result<Execution> {
        self.execute(runs, input, Tape::new(self.config.max_tape_cells))
    }

    fn execute(&self, runs: &[Run], input: &[u8], mut tape: Tape) -> Result<Execution> {
        let kinds: Vec<Instruction> = runs.iter().map(|r| r.instruction).collect();
        let jumps = loop_table(&kinds)?;

        let mut input = input.iter().copied();
        let mut output = Vec::new();
        let mut counts = [0u64; Instruction::ALL.len()];
        let mut steps: u64 = 0;
        let mut pc = 0;

        while pc < runs.len() {
            if let Some(limit) = self.config.max_steps {
                if steps >= limit {
                    return Err(Error::StepLimitExceeded { limit });
                }
            }
            steps += 1;

            let Run { instruction, count } = runs[pc];
            counts[instruction.index()] += count as u64;

            match instruction {
                Instruction::Right => tape.move_right(count)?,
                Instruction::Left => {
                    if !tape.move_left(count) {
                        return Err(Error::PointerUnderflow { instruction: pc });
                    }
                }
                Instruction::Increment => tape.add(count),
                Instruction::Decrement => tape.sub(count),
                Instruction::Output => {
                    for _ in 0..count {
                        output.push(tape.get());
                    }
                }
                Instruction::Input => {
                    for _ in 0..count {
                        tape.set(input.next().unwrap_or(0));
                    }
                }
                Instruction::OutputNum => {
                    for _ in 0..count {
                        output.extend_from_slice(tape.get().to_string().as_bytes());
                    }
                }
                Instruction::LoopStart => {
                    if tape.get() == 0 {
                        pc = jumps[pc];
                    }
                }
                Instruction::LoopEnd => {
                    if tape.get() != 0 {
                        pc = jumps[pc];
                    }
                }
                Instruction::AddCells => {
                    for _ in 0..count {
                        tape.merge_next(false);
                    }
                }
                Instruction::SubCells => {
                    for _ in 0..count {
                        tape.merge_next(true);
                    }
                }
            }

            pc += 1;
        }

        tracing::debug!(steps, output_bytes = output.len(), "execution finished");

        Ok(Execution {
            output,
            steps,
            tape,
            counts,
        })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(InterpreterConfig::default())
    }
}
