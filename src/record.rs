use super::{parse, Grid, ProblemParseError, Solution};
use failure_derive::Fail;
use std::io::BufRead;

/// One benchmark line: `puzzle,solution`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub puzzle: Grid,
    pub solution: Grid,
}

#[derive(Debug, Fail)]
pub enum RecordParseError {
    #[fail(display = "line {}: expected 'puzzle,solution'.", _0)]
    MissingSeparator(usize),
    #[fail(display = "line {}: {}", _0, _1)]
    InvalidGrid(usize, #[cause] ProblemParseError),
    #[fail(display = "failed to read input: {}", _0)]
    Io(#[cause] std::io::Error),
}

impl Record {
    pub fn parse(line_number: usize, line: &str) -> Result<Record, RecordParseError> {
        let mut fields = line.trim().splitn(2, ',');
        let (puzzle, solution) = match (fields.next(), fields.next()) {
            (Some(p), Some(s)) => (p, s),
            _ => return Err(RecordParseError::MissingSeparator(line_number)),
        };
        let grid = |s: &str| parse(s.trim()).map_err(|e| RecordParseError::InvalidGrid(line_number, e));
        Ok(Record {
            puzzle: grid(puzzle)?,
            solution: grid(solution)?,
        })
    }

    /// The solver's answer matches the recorded solution.
    pub fn check(&self, solution: &Solution) -> bool {
        match solution {
            Solution::Found(grid) => *grid == self.solution,
            Solution::No => false,
        }
    }
}

/// Reads all records, skipping blank lines and a header line that does not
/// start with a digit.
pub fn read_records<R: BufRead>(input: R) -> Result<Vec<Record>, RecordParseError> {
    let mut records = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line.map_err(RecordParseError::Io)?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if i == 0 && !line.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        records.push(Record::parse(i + 1, line)?);
    }
    Ok(records)
}
