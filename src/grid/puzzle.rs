//! The immutable puzzle template.

use std::fmt;

use thiserror::Error;

use super::types::{box_cells, digit, CellGrid, Grid, SIZE};

/// A row, column, or box of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Row index 0..9.
    Row(usize),
    /// Column index 0..9.
    Column(usize),
    /// Box index 0..9, left to right, top to bottom.
    Box(usize),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Row(i) => write!(f, "row {i}"),
            Unit::Column(i) => write!(f, "column {i}"),
            Unit::Box(i) => write!(f, "box {i}"),
        }
    }
}

/// Errors raised when reading or validating a clue grid.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("cell ({row}, {col}) holds {value}, expected 0-9")]
    InvalidValue { row: usize, col: usize, value: i32 },
    #[error("expected 81 cells, found {found}")]
    InvalidLength { found: usize },
    #[error("unexpected character {ch:?} in grid text")]
    InvalidCharacter { ch: char },
    #[error("digit {digit} is given more than once in {unit}")]
    ConflictingClues { unit: Unit, digit: u8 },
}

/// The clue template every candidate is built from.
///
/// Construction precomputes, per box, the free positions and the digits the
/// clues leave missing, so the operators never rescan the clues.
///
/// # Examples
///
/// ```
/// use hive_sudoku::grid::{Grid, Puzzle};
///
/// let clues: Grid = "
///     53..7....
///     6..195...
///     .98....6.
///     8...6...3
///     4..8.3..1
///     7...2...6
///     .6....28.
///     ...419..5
///     ....8..79"
///     .parse()
///     .unwrap();
/// let puzzle = Puzzle::new(clues).unwrap();
/// assert_eq!(puzzle.given_count(), 30);
/// assert!(puzzle.check_consistency().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    clues: Grid,
    free: [Vec<(usize, usize)>; SIZE],
    missing: [Vec<u8>; SIZE],
}

impl Puzzle {
    /// Builds a template from a clue grid (`0` = blank).
    ///
    /// Fails if a cell is out of range or a box repeats a clue: either makes
    /// it impossible to fill the box with 1–9 exactly once. Row and column
    /// clashes are only reported by [`check_consistency`](Self::check_consistency).
    pub fn new(clues: Grid) -> Result<Self, PuzzleError> {
        let mut free: [Vec<(usize, usize)>; SIZE] = Default::default();
        let mut missing: [Vec<u8>; SIZE] = Default::default();

        for b in 0..SIZE {
            let mut present = [false; SIZE + 1];
            for (row, col) in box_cells(b) {
                let v = clues.get(row, col);
                if v as usize > SIZE {
                    return Err(PuzzleError::InvalidValue {
                        row,
                        col,
                        value: i32::from(v),
                    });
                }
                if v == 0 {
                    free[b].push((row, col));
                } else if present[v as usize] {
                    return Err(PuzzleError::ConflictingClues {
                        unit: Unit::Box(b),
                        digit: v,
                    });
                } else {
                    present[v as usize] = true;
                }
            }
            missing[b] = (1..=SIZE as u8).filter(|&d| !present[d as usize]).collect();
        }

        Ok(Self {
            clues,
            free,
            missing,
        })
    }

    /// Reads clues from an external container.
    ///
    /// Cells the container reports as free are blanks regardless of value.
    pub fn from_cells<G: CellGrid + ?Sized>(cells: &G) -> Result<Self, PuzzleError> {
        let mut clues = Grid::empty();
        for row in 0..SIZE {
            for col in 0..SIZE {
                if cells.is_fixed(row, col) {
                    clues.set(row, col, digit(row, col, cells.cell(row, col))?);
                }
            }
        }
        Self::new(clues)
    }

    /// Reports the first row or column that repeats a clue.
    ///
    /// Such a puzzle has no solution; the search would only exhaust its
    /// restarts against it.
    pub fn check_consistency(&self) -> Result<(), PuzzleError> {
        for row in 0..SIZE {
            check_line(Unit::Row(row), (0..SIZE).map(|col| self.clues.get(row, col)))?;
        }
        for col in 0..SIZE {
            check_line(Unit::Column(col), (0..SIZE).map(|row| self.clues.get(row, col)))?;
        }
        Ok(())
    }

    /// The clue grid.
    pub fn clues(&self) -> &Grid {
        &self.clues
    }

    /// Whether `(row, col)` is a given clue.
    #[inline]
    pub fn is_fixed(&self, row: usize, col: usize) -> bool {
        self.clues.get(row, col) != 0
    }

    /// Free positions of box `b`, row-major.
    #[inline]
    pub fn free_positions(&self, b: usize) -> &[(usize, usize)] {
        &self.free[b]
    }

    /// Digits box `b` still needs, ascending.
    #[inline]
    pub fn missing_digits(&self, b: usize) -> &[u8] {
        &self.missing[b]
    }

    /// Number of given clues.
    pub fn given_count(&self) -> usize {
        self.clues.filled_count()
    }
}

fn check_line(unit: Unit, values: impl Iterator<Item = u8>) -> Result<(), PuzzleError> {
    let mut seen = 0u16;
    for v in values.filter(|&v| v != 0) {
        let bit = 1u16 << v;
        if seen & bit != 0 {
            return Err(PuzzleError::ConflictingClues { unit, digit: v });
        }
        seen |= bit;
    }
    Ok(())
}
