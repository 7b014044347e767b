//! Core type definitions shared by the compiler and the interpreter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven glyphs of the notation.
///
/// The glyphs are the seven natural notes. Newline separates statements and is
/// not a glyph; any other character is inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Glyph {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Glyph {
    pub const ALL: [Glyph; 7] = [
        Glyph::A,
        Glyph::B,
        Glyph::C,
        Glyph::D,
        Glyph::E,
        Glyph::F,
        Glyph::G,
    ];

    /// Map a character to its glyph, failing closed on anything outside the alphabet.
    pub fn from_char(c: char) -> Option<Glyph> {
        match c {
            'A' => Some(Glyph::A),
            'B' => Some(Glyph::B),
            'C' => Some(Glyph::C),
            'D' => Some(Glyph::D),
            'E' => Some(Glyph::E),
            'F' => Some(Glyph::F),
            'G' => Some(Glyph::G),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Glyph::A => 'A',
            Glyph::B => 'B',
            Glyph::C => 'C',
            Glyph::D => 'D',
            Glyph::E => 'E',
            Glyph::F => 'F',
            Glyph::G => 'G',
        }
    }

    pub fn is_glyph(c: char) -> bool {
        Glyph::from_char(c).is_some()
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Loop bracket kind, used in structural diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bracket {
    Open,
    Close,
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bracket::Open => write!(f, "'['"),
            Bracket::Close => write!(f, "']'"),
        }
    }
}

/// A run of consecutive identical windows found by the repetition validator.
///
/// `index` is the position of the first copy in the flattened text (all
/// whitespace removed), counted in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub pattern: String,
    pub length: usize,
    pub repeats: usize,
    pub index: usize,
}

impl Violation {
    /// Index one past the last copy in the flattened text.
    pub fn end(&self) -> usize {
        self.index + self.length * self.repeats
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pattern \"{}\" (length {}) repeats {} times starting at index {}",
            self.pattern, self.length, self.repeats, self.index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_round_trip() {
        for glyph in Glyph::ALL {
            assert_eq!(Glyph::from_char(glyph.to_char()), Some(glyph));
        }
    }

    #[test]
    fn test_glyph_fails_closed() {
        assert_eq!(Glyph::from_char('H'), None);
        assert_eq!(Glyph::from_char('a'), None);
        assert_eq!(Glyph::from_char('\n'), None);
        assert!(!Glyph::is_glyph('#'));
    }

    #[test]
    fn test_violation_end() {
        let v = Violation {
            pattern: "AB".to_string(),
            length: 2,
            repeats: 3,
            index: 4,
        };
        assert_eq!(v.end(), 10);
    }
}
