//! Operation catalog: the single source of truth for pattern meanings.
//!
//! Every operation owns an ordered list of patterns. Decoding looks a pattern up
//! by its whole glyph sequence; encoding walks an operation's patterns in the
//! declared order. Meaning never attaches to individual glyphs.

use crate::instruction::Instruction;
use hepta_core::{Error, Glyph, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Fewest distinct patterns an operation may have
pub const MIN_PATTERNS_PER_OPERATION: usize = 3;

/// Longest pattern the catalog accepts
pub const MAX_PATTERN_LEN: usize = 5;

/// A named source-level action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    MoveRight,
    MoveLeft,
    Increment,
    Decrement,
    OutputChar,
    InputChar,
    OutputNum,
    LoopStart,
    LoopEnd,
    Halt,
    AddCells,
    SubCells,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::MoveRight,
        Operation::MoveLeft,
        Operation::Increment,
        Operation::Decrement,
        Operation::OutputChar,
        Operation::InputChar,
        Operation::OutputNum,
        Operation::LoopStart,
        Operation::LoopEnd,
        Operation::Halt,
        Operation::AddCells,
        Operation::SubCells,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// The instruction this operation compiles to; `Halt` compiles to nothing
    pub fn instruction(&self) -> Option<Instruction> {
        match self {
            Operation::MoveRight => Some(Instruction::Right),
            Operation::MoveLeft => Some(Instruction::Left),
            Operation::Increment => Some(Instruction::Increment),
            Operation::Decrement => Some(Instruction::Decrement),
            Operation::OutputChar => Some(Instruction::Output),
            Operation::InputChar => Some(Instruction::Input),
            Operation::OutputNum => Some(Instruction::OutputNum),
            Operation::LoopStart => Some(Instruction::LoopStart),
            Operation::LoopEnd => Some(Instruction::LoopEnd),
            Operation::Halt => None,
            Operation::AddCells => Some(Instruction::AddCells),
            Operation::SubCells => Some(Instruction::SubCells),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::MoveRight => "MoveRight",
            Operation::MoveLeft => "MoveLeft",
            Operation::Increment => "Increment",
            Operation::Decrement => "Decrement",
            Operation::OutputChar => "OutputChar",
            Operation::InputChar => "InputChar",
            Operation::OutputNum => "OutputNum",
            Operation::LoopStart => "LoopStart",
            Operation::LoopEnd => "LoopEnd",
            Operation::Halt => "Halt",
            Operation::AddCells => "AddCells",
            Operation::SubCells => "SubCells",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One concrete spelling of an operation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern(String);

impl Pattern {
    /// Parse glyph text into a pattern, rejecting empty, overlong, or non-glyph input.
    pub fn parse(text: &str) -> Result<Self> {
        let len = text.chars().count();
        if len == 0 || len > MAX_PATTERN_LEN {
            return Err(Error::CatalogInvariant(format!(
                "pattern \"{}\" has length {}, expected 1..={}",
                text, len, MAX_PATTERN_LEN
            )));
        }
        if let Some(bad) = text.chars().find(|c| !Glyph::is_glyph(*c)) {
            return Err(Error::CatalogInvariant(format!(
                "pattern \"{}\" contains non-glyph {:?}",
                text, bad
            )));
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in glyphs
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn glyphs(&self) -> impl Iterator<Item = Glyph> + '_ {
        self.0.chars().filter_map(Glyph::from_char)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog row: pattern, owning operation and a short human description
#[derive(Debug, Clone)]
pub struct Entry {
    pub pattern: Pattern,
    pub operation: Operation,
    pub description: String,
}

/// Table form accepted by [`Catalog::from_table`]: an operation and its
/// `(pattern, description)` pairs in preference order.
pub type TableRow<'a> = (Operation, &'a [(&'a str, &'a str)]);

/// The built-in mapping. The table is prefix-free, so greedy generation
/// decodes back to the same instructions. Patterns past the third of an
/// operation are fallbacks the generator reaches only when the earlier
/// ones would repeat.
static STANDARD_TABLE: &[TableRow<'static>] = &[
    (
        Operation::MoveRight,
        &[
            ("DDA", "step right"),
            ("CA", "step right, short"),
            ("ACD", "step right, rising"),
            ("CCA", "step right, doubled"),
        ],
    ),
    (
        Operation::MoveLeft,
        &[
            ("DFE", "step left"),
            ("DC", "step left, short"),
            ("ADC", "step left, falling"),
            ("ACB", "step left, turned"),
            ("CDBB", "step left, held"),
        ],
    ),
    (
        Operation::Increment,
        &[
            ("CCB", "raise cell"),
            ("FB", "raise cell, short"),
            ("EC", "raise cell, leap"),
            ("BABD", "raise cell, neighbour"),
        ],
    ),
    (
        Operation::Decrement,
        &[
            ("AEA", "lower cell"),
            ("BC", "lower cell, short"),
            ("EAA", "lower cell, leap"),
            ("FCFBF", "lower cell, trill"),
        ],
    ),
    (
        Operation::OutputChar,
        &[
            ("BAD", "sing cell as character"),
            ("EDAAD", "sing cell as character, long"),
            ("DBABB", "sing cell as character, ornamented"),
            ("ADF", "sing cell as character, rising"),
            ("EDDF", "sing cell as character, held"),
        ],
    ),
    (
        Operation::InputChar,
        &[
            ("EBD", "listen into cell"),
            ("BAE", "listen into cell, variant"),
            ("DAF", "listen into cell, inverted"),
            ("FCDAF", "listen into cell, long"),
            ("CBEBD", "listen into cell, ornamented"),
        ],
    ),
    (
        Operation::OutputNum,
        &[
            ("BDD", "count cell aloud"),
            ("FAAB", "count cell aloud, long"),
            ("BBFE", "count cell aloud, ornamented"),
            ("CBCBC", "count cell aloud, trill"),
            ("EBC", "count cell aloud, short"),
        ],
    ),
    (
        Operation::LoopStart,
        &[
            ("EFA", "open repeat"),
            ("EAF", "open repeat, inverted"),
            ("BFCE", "open repeat, long"),
            ("ABEAF", "open repeat, ornamented"),
        ],
    ),
    (
        Operation::LoopEnd,
        &[
            ("BDAF", "close repeat"),
            ("FDCF", "close repeat, variant"),
            ("BACFE", "close repeat, long"),
            ("CBB", "close repeat, short"),
        ],
    ),
    (
        Operation::Halt,
        &[
            ("G", "fermata"),
            ("DGD", "fermata, framed"),
            ("AGCGA", "fermata, cadence"),
        ],
    ),
    (
        Operation::AddCells,
        &[
            ("ACFFD", "fold next cell in"),
            ("CDBA", "fold next cell in, short"),
            ("ACA", "fold next cell in, turn"),
            ("BDB", "fold next cell in, framed"),
            ("CBFAA", "fold next cell in, long"),
        ],
    ),
    (
        Operation::SubCells,
        &[
            ("DAEB", "draw next cell out"),
            ("CCDAA", "draw next cell out, long"),
            ("CFDA", "draw next cell out, variant"),
            ("EECDD", "draw next cell out, held"),
            ("ABFBA", "draw next cell out, mirrored"),
        ],
    ),
];

static STANDARD: OnceLock<Catalog> = OnceLock::new();

/// Immutable pattern table with forward and inverse lookups
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<Entry>,
    by_operation: Vec<Vec<Pattern>>,
    by_pattern: HashMap<String, usize>,
    max_pattern_len: usize,
}

impl Catalog {
    /// The built-in catalog, built on first use and shared for the life of the process.
    ///
    /// # Panics
    ///
    /// Panics if the built-in table breaks a catalog invariant. That is a defect
    /// in the table itself, never a property of user input.
    pub fn standard() -> &'static Catalog {
        STANDARD.get_or_init(|| match Catalog::from_table(STANDARD_TABLE) {
            Ok(catalog) => catalog,
            Err(e) => panic!("built-in catalog is malformed: {}", e),
        })
    }

    /// Build a catalog, checking that every operation has at least
    /// [`MIN_PATTERNS_PER_OPERATION`] distinct patterns and that no pattern is
    /// declared twice.
    pub fn from_table(rows: &[TableRow<'_>]) -> Result<Self> {
        let mut entries: Vec<Entry> = Vec::new();
        let mut by_operation = vec![Vec::new(); Operation::ALL.len()];
        let mut by_pattern: HashMap<String, usize> = HashMap::new();

        for (operation, patterns) in rows {
            for (text, description) in patterns.iter() {
                let pattern = Pattern::parse(text)?;
                if let Some(&existing) = by_pattern.get(pattern.as_str()) {
                    let owner = entries[existing].operation;
                    return Err(Error::CatalogInvariant(if owner == *operation {
                        format!("pattern \"{}\" is declared twice by {}", pattern, owner)
                    } else {
                        format!(
                            "pattern \"{}\" is declared by both {} and {}",
                            pattern, owner, operation
                        )
                    }));
                }
                by_pattern.insert(pattern.as_str().to_string(), entries.len());
                by_operation[operation.index()].push(pattern.clone());
                entries.push(Entry {
                    pattern,
                    operation: *operation,
                    description: description.to_string(),
                });
            }
        }

        for op in Operation::ALL {
            let count = by_operation[op.index()].len();
            if count < MIN_PATTERNS_PER_OPERATION {
                return Err(Error::CatalogInvariant(format!(
                    "{} has {} pattern(s), needs at least {}",
                    op, count, MIN_PATTERNS_PER_OPERATION
                )));
            }
        }

        let max_pattern_len = entries.iter().map(|e| e.pattern.len()).max().unwrap_or(0);
        tracing::debug!(
            patterns = entries.len(),
            max_pattern_len,
            "catalog built"
        );

        Ok(Self {
            entries,
            by_operation,
            by_pattern,
            max_pattern_len,
        })
    }

    /// Patterns of `op` in declared order
    pub fn patterns_for(&self, op: Operation) -> &[Pattern] {
        &self.by_operation[op.index()]
    }

    pub fn lookup(&self, pattern: &str) -> Option<&Entry> {
        self.by_pattern.get(pattern).map(|&idx| &self.entries[idx])
    }

    pub fn operation_for(&self, pattern: &str) -> Option<Operation> {
        self.lookup(pattern).map(|e| e.operation)
    }

    /// Outer `None`: unknown pattern. Inner `None`: a pattern that compiles to nothing.
    pub fn instruction_for(&self, pattern: &str) -> Option<Option<Instruction>> {
        self.lookup(pattern).map(|e| e.operation.instruction())
    }

    /// First operation in catalog order that compiles to `inst`
    pub fn operation_for_instruction(&self, inst: Instruction) -> Option<Operation> {
        self.entries
            .iter()
            .map(|e| e.operation)
            .find(|op| op.instruction() == Some(inst))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn max_pattern_len(&self) -> usize {
        self.max_pattern_len
    }

    /// Returns true if no pattern is a proper prefix of another
    pub fn is_prefix_free(&self) -> bool {
        self.entries.iter().all(|a| {
            self.entries.iter().all(|b| {
                a.pattern == b.pattern || !b.pattern.as_str().starts_with(a.pattern.as_str())
            })
        })
    }
}
