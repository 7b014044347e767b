//! Byte-cell tape with a pointer.

use hepta_core::{Error, Result};

/// Cells grow on demand to the right; the pointer never goes below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
    max_cells: usize,
}

impl Tape {
    pub fn new(max_cells: usize) -> Self {
        Self {
            cells: vec![0],
            pointer: 0,
            max_cells: max_cells.max(1),
        }
    }

    /// A tape preloaded with `cells`, pointer at cell 0
    pub fn with_cells(cells: Vec<u8>, max_cells: usize) -> Self {
        let mut tape = Self::new(max_cells.max(cells.len()));
        if !cells.is_empty() {
            tape.cells = cells;
        }
        tape
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn get(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn set(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    /// Cell right of the pointer, zero if it was never touched
    pub fn peek_next(&self) -> u8 {
        self.cells.get(self.pointer + 1).copied().unwrap_or(0)
    }

    pub fn add(&mut self, amount: usize) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add((amount % 256) as u8);
    }

    pub fn sub(&mut self, amount: usize) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub((amount % 256) as u8);
    }

    pub fn move_right(&mut self, by: usize) -> Result<()> {
        let target = self.pointer + by;
        if target >= self.max_cells {
            return Err(Error::ResourceExhausted(format!(
                "tape limit of {} cells reached",
                self.max_cells
            )));
        }
        if target >= self.cells.len() {
            self.cells.resize(target + 1, 0);
        }
        self.pointer = target;
        Ok(())
    }

    /// Move left, or report `false` without moving if that would pass cell 0.
    pub fn move_left(&mut self, by: usize) -> bool {
        match self.pointer.checked_sub(by) {
            Some(target) => {
                self.pointer = target;
                true
            }
            None => false,
        }
    }

    /// Fold the next cell into the current one and clear it
    pub fn merge_next(&mut self, subtract: bool) {
        let next = self.peek_next();
        if subtract {
            self.sub(next as usize);
        } else {
            self.add(next as usize);
        }
        if let Some(cell) = self.cells.get_mut(self.pointer + 1) {
            *cell = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapping_arithmetic() {
        let mut tape = Tape::new(16);
        tape.sub(1);
        assert_eq!(tape.get(), 255);
        tape.add(1);
        assert_eq!(tape.get(), 0);
        tape.add(300);
        assert_eq!(tape.get(), 44);
    }

    #[test]
    fn test_grows_to_the_right() {
        let mut tape = Tape::new(16);
        tape.move_right(5).unwrap();
        assert_eq!(tape.pointer(), 5);
        assert_eq!(tape.cells().len(), 6);
        assert_eq!(tape.get(), 0);
    }

    #[test]
    fn test_tape_limit() {
        let mut tape = Tape::new(4);
        assert!(tape.move_right(3).is_ok());
        assert!(matches!(tape.move_right(1), Err(Error::ResourceExhausted(_))));
        assert_eq!(tape.pointer(), 3);
    }

    #[test]
    fn test_move_left_stops_at_zero() {
        let mut tape = Tape::new(16);
        tape.move_right(2).unwrap();
        assert!(tape.move_left(2));
        assert!(!tape.move_left(1));
        assert_eq!(tape.pointer(), 0);
    }

    #[test]
    fn test_merge_next() {
        let mut tape = Tape::with_cells(vec![10, 3], 16);
        tape.merge_next(false);
        assert_eq!(tape.cells(), &[13, 0]);

        let mut tape = Tape::with_cells(vec![2, 5], 16);
        tape.merge_next(true);
        assert_eq!(tape.cells(), &[253, 0]);

        // An untouched neighbour reads as zero and is not materialised.
        let mut tape = Tape::with_cells(vec![7], 16);
        tape.merge_next(false);
        assert_eq!(tape.cells(), &[7]);
    }
}
