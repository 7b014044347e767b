//! Decoder from notation text to instructions.

use crate::catalog::{Catalog, Operation};
use crate::program::Program;
use crate::validation::RepetitionValidator;
use hepta_core::{Error, Result};
use tracing::debug;

/// A pattern consumed during decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Zero-based line number
    pub line: usize,
    /// Zero-based character column within the line
    pub column: usize,
    pub pattern: String,
    pub operation: Operation,
}

/// Decoding result with the match trace
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub program: Program,
    pub tokens: Vec<Token>,
    /// Characters dropped because no pattern started there
    pub skipped: usize,
}

pub struct Decoder<'c> {
    catalog: &'c Catalog,
    validator: RepetitionValidator,
}

impl<'c> Decoder<'c> {
    pub fn new(catalog: &'c Catalog, validator: RepetitionValidator) -> Self {
        Self { catalog, validator }
    }

    pub fn decode(&self, source: &str) -> Result<Program> {
        Ok(self.decode_with_trace(source)?.program)
    }

    /// Validate the whole source, then translate it line by line.
    ///
    /// At each position the longest catalog pattern wins. A position where no
    /// pattern starts is skipped one character at a time; this is not an error.
    pub fn decode_with_trace(&self, source: &str) -> Result<Decoded> {
        self.validator.check(source).map_err(Error::InvalidEncoding)?;

        let mut decoded = Decoded::default();
        let max_len = self.catalog.max_pattern_len();

        for (line_no, line) in source.lines().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            let mut cursor = 0;

            while cursor < chars.len() {
                let longest = max_len.min(chars.len() - cursor);
                let matched = (1..=longest).rev().find_map(|len| {
                    let candidate: String = chars[cursor..cursor + len].iter().collect();
                    self.catalog.lookup(&candidate).map(|entry| (len, entry))
                });

                match matched {
                    Some((len, entry)) => {
                        if let Some(inst) = entry.operation.instruction() {
                            decoded.program.push(inst);
                        }
                        decoded.tokens.push(Token {
                            line: line_no,
                            column: cursor,
                            pattern: entry.pattern.as_str().to_string(),
                            operation: entry.operation,
                        });
                        cursor += len;
                    }
                    None => {
                        decoded.skipped += 1;
                        cursor += 1;
                    }
                }
            }
        }

        debug!(
            instructions = decoded.program.len(),
            tokens = decoded.tokens.len(),
            skipped = decoded.skipped,
            "decoded source"
        );

        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TableRow;
    use crate::instruction::Instruction::*;

    fn decoder() -> Decoder<'static> {
        Decoder::new(Catalog::standard(), RepetitionValidator::default())
    }

    #[test]
    fn test_decode_simple() {
        let program = decoder().decode("CCBDDABAD\nG").unwrap();
        assert_eq!(program.instructions, vec![Increment, Right, Output]);
    }

    #[test]
    fn test_halt_compiles_to_nothing() {
        let decoded = decoder().decode_with_trace("FBDGD").unwrap();
        assert_eq!(decoded.program.instructions, vec![Increment]);
        assert_eq!(decoded.tokens.len(), 2);
        assert_eq!(decoded.tokens[1].operation, Operation::Halt);
    }

    #[test]
    fn test_lines_are_independent() {
        // "C" + "A" would be MoveRight if the lines were joined.
        let decoded = decoder().decode_with_trace("FBC\nAEA").unwrap();
        assert_eq!(decoded.program.instructions, vec![Increment, Decrement]);
        assert_eq!(decoded.skipped, 1);
        assert_eq!(decoded.tokens[1].line, 1);
        assert_eq!(decoded.tokens[1].column, 0);
    }

    #[test]
    fn test_skip_on_miss() {
        let decoded = decoder().decode_with_trace("xxFB FB").unwrap();
        assert_eq!(decoded.program.instructions, vec![Increment, Increment]);
        assert_eq!(decoded.skipped, 3);
        assert_eq!(decoded.tokens[0].column, 2);
    }

    #[test]
    fn test_repetition_rejected_before_translation() {
        let err = decoder().decode("FBAAAFB").unwrap_err();
        match err {
            Error::InvalidEncoding(v) => {
                assert_eq!(v.pattern, "A");
                assert_eq!(v.length, 1);
                assert_eq!(v.repeats, 3);
                assert_eq!(v.index, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_repetition_across_lines_rejected() {
        let err = decoder().decode("FB\nFB\nFB").unwrap_err();
        assert!(matches!(err, Error::InvalidEncoding(_)));
    }

    #[test]
    fn test_longest_match_wins() {
        static OVERLAPPING: &[TableRow<'static>] = &[
            (Operation::MoveRight, &[("C", ""), ("CC", ""), ("CCDB", "")]),
            (Operation::MoveLeft, &[("DFE", ""), ("DC", ""), ("ADC", "")]),
            (Operation::Increment, &[("CCB", ""), ("FB", ""), ("EC", "")]),
            (Operation::Decrement, &[("AEA", ""), ("BC", ""), ("EAA", "")]),
            (Operation::OutputChar, &[("BAD", ""), ("EDAAD", ""), ("DBABB", "")]),
            (Operation::InputChar, &[("EBD", ""), ("BAE", ""), ("DAF", "")]),
            (Operation::OutputNum, &[("BDD", ""), ("FAAB", ""), ("BBFE", "")]),
            (Operation::LoopStart, &[("EFA", ""), ("EAF", ""), ("BFCE", "")]),
            (Operation::LoopEnd, &[("BDAF", ""), ("FDCF", ""), ("BACFE", "")]),
            (Operation::Halt, &[("G", ""), ("DGD", ""), ("AGCGA", "")]),
            (Operation::AddCells, &[("ACFFD", ""), ("CDBA", ""), ("ACA", "")]),
            (Operation::SubCells, &[("DAEB", ""), ("CCDAA", ""), ("CFDA", "")]),
        ];
        let catalog = Catalog::from_table(OVERLAPPING).unwrap();
        let decoder = Decoder::new(&catalog, RepetitionValidator::default());

        // CCB beats CC + B; CCDB beats CC + DB and C + CDBA.
        assert_eq!(decoder.decode("CCB").unwrap().instructions, vec![Increment]);
        assert_eq!(decoder.decode("CCDBA").unwrap().instructions, vec![Right]);
        assert_eq!(decoder.decode("CCDC").unwrap().instructions, vec![Right, Left]);
        assert_eq!(decoder.decode("CDBA").unwrap().instructions, vec![AddCells]);
    }

    #[test]
    fn test_empty_source() {
        let decoded = decoder().decode_with_trace("").unwrap();
        assert!(decoded.program.is_empty());
        assert_eq!(decoded.skipped, 0);
    }
}
