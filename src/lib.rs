extern crate failure_derive;
extern crate lazy_static;

pub mod bits;
mod constraints;
pub mod fallback;
pub mod lanes;
pub mod layout;
pub mod lockstep;
pub mod queue;
pub mod record;
mod solve;
#[cfg(test)]
mod testing;

pub use self::fallback::GuessStrategy;
pub use self::lanes::LANES;
pub use self::layout::BatchState;
pub use self::record::{read_records, Record, RecordParseError};
pub use self::solve::{solve, Solution, Solver, SolverConfig, Stats};

use self::bits::{ascii_to_mask, Mask};
use self::layout::{CELL_SLOTS, ROW_BASE};
use failure_derive::Fail;

const DIM1: usize = 3;
const DIM2: usize = DIM1 * DIM1;
const DIM4: usize = DIM2 * DIM2;

/// Number of cells in a grid.
pub const CELLS: usize = DIM4;

/// A grid as 81 ASCII digits in row-major order, `'0'` for a blank cell.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    array: [u8; DIM4],
}

impl Default for Grid {
    fn default() -> Self {
        Grid::from_ascii([b'0'; DIM4])
    }
}

impl Grid {
    /// Callers guarantee every byte is in `b'0'..=b'9'`.
    pub fn from_ascii(array: [u8; DIM4]) -> Self {
        Grid { array }
    }

    pub fn as_bytes(&self) -> &[u8; DIM4] {
        &self.array
    }

    pub fn clues(&self) -> usize {
        self.array.iter().filter(|&&c| c != b'0').count()
    }

    /// Every cell filled and every row, column and box holding each digit
    /// exactly once.
    pub fn is_complete(&self) -> bool {
        let mut seen = [0 as Mask; DIM2 * 3];
        for (slots, &c) in CELL_SLOTS.iter().zip(self.array.iter()) {
            if !(b'1'..=b'9').contains(&c) {
                return false;
            }
            let bit = ascii_to_mask(c);
            for &group in &[slots.row, slots.boxx, slots.col] {
                let seen = &mut seen[group - ROW_BASE];
                if *seen & bit != 0 {
                    return false;
                }
                *seen |= bit;
            }
        }
        true
    }

    /// `self` is complete and keeps every clue of `puzzle`.
    pub fn solves(&self, puzzle: &Grid) -> bool {
        self.is_complete()
            && puzzle
                .array
                .iter()
                .zip(self.array.iter())
                .all(|(&p, &s)| p == b'0' || p == s)
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Grid({})", self)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for &c in self.array.iter() {
            write!(f, "{}", c as char)?;
        }
        Ok(())
    }
}

#[derive(Debug, Fail)]
pub enum ProblemParseError {
    #[fail(display = "length must be {} but is {}.", _0, _1)]
    InvalidLength(usize, usize),
    #[fail(display = "invalid character '{}' at position {}.", _1, _0)]
    InvalidCharacter(usize, char),
}

pub fn parse(input: &str) -> Result<Grid, ProblemParseError> {
    if input.len() != DIM4 {
        return Err(ProblemParseError::InvalidLength(DIM4, input.len()));
    }
    let mut array = [b'0'; DIM4];
    for (i, c) in input.chars().enumerate() {
        array[i] = match c {
            '0'..='9' => c as u8,
            _ => return Err(ProblemParseError::InvalidCharacter(i, c)),
        }
    }
    Ok(Grid::from_ascii(array))
}
