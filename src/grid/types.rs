//! Grid container and the external cell-access capability.

use std::fmt;
use std::str::FromStr;

use super::puzzle::PuzzleError;

/// Side length of the grid.
pub const SIZE: usize = 9;

/// Side length of one box.
pub const BOX: usize = 3;

/// Index (0..9) of the box containing `(row, col)`, numbered left to right,
/// top to bottom.
#[inline]
pub fn box_index(row: usize, col: usize) -> usize {
    (row / BOX) * BOX + col / BOX
}

/// The nine `(row, col)` positions of box `b`, in row-major order.
///
/// # Panics
/// Panics if `b >= 9`.
pub fn box_cells(b: usize) -> [(usize, usize); SIZE] {
    assert!(b < SIZE, "box index out of range: {b}");
    let top = (b / BOX) * BOX;
    let left = (b % BOX) * BOX;
    let mut cells = [(0, 0); SIZE];
    for (k, cell) in cells.iter_mut().enumerate() {
        *cell = (top + k / BOX, left + k % BOX);
    }
    cells
}

/// An owned 9×9 matrix of digits.
///
/// `0` marks a blank cell in clue grids. Candidate grids produced by the
/// hive operators contain only 1–9.
///
/// Grids are plain values: operators never edit a grid that is shared,
/// they build a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    cells: [[u8; SIZE]; SIZE],
}

impl Grid {
    /// Wraps a raw cell matrix.
    pub fn new(cells: [[u8; SIZE]; SIZE]) -> Self {
        Self { cells }
    }

    /// A grid of blanks.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads one cell.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    /// Writes one cell.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[row][col] = value;
    }

    /// Swaps the values of two cells.
    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) {
        let tmp = self.cells[a.0][a.1];
        self.cells[a.0][a.1] = self.cells[b.0][b.1];
        self.cells[b.0][b.1] = tmp;
    }

    /// The rows of the grid.
    pub fn rows(&self) -> &[[u8; SIZE]; SIZE] {
        &self.cells
    }

    /// Copies all nine cells of box `b` from `source` into `self`.
    pub fn copy_box_from(&mut self, source: &Grid, b: usize) {
        for (row, col) in box_cells(b) {
            self.cells[row][col] = source.cells[row][col];
        }
    }

    /// The values of box `b`, in row-major order.
    pub fn box_values(&self, b: usize) -> [u8; SIZE] {
        box_cells(b).map(|(row, col)| self.cells[row][col])
    }

    /// Number of non-blank cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&v| v != 0).count()
    }
}

impl From<[[u8; SIZE]; SIZE]> for Grid {
    fn from(cells: [[u8; SIZE]; SIZE]) -> Self {
        Self::new(cells)
    }
}

impl TryFrom<&[Vec<i32>]> for Grid {
    type Error = PuzzleError;

    /// Converts a row-major integer container, checking shape and range.
    fn try_from(rows: &[Vec<i32>]) -> Result<Self, Self::Error> {
        let found = rows.iter().map(Vec::len).sum();
        if rows.len() != SIZE || rows.iter().any(|r| r.len() != SIZE) {
            return Err(PuzzleError::InvalidLength { found });
        }
        let mut grid = Grid::empty();
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                grid.set(row, col, digit(row, col, value)?);
            }
        }
        Ok(grid)
    }
}

/// Checks that `value` is 0–9 and narrows it.
pub(crate) fn digit(row: usize, col: usize, value: i32) -> Result<u8, PuzzleError> {
    u8::try_from(value)
        .ok()
        .filter(|&v| v as usize <= SIZE)
        .ok_or(PuzzleError::InvalidValue { row, col, value })
}

impl FromStr for Grid {
    type Err = PuzzleError;

    /// Parses 81 cells in row-major order.
    ///
    /// Digits `1`–`9` are clues, `0` and `.` are blanks. Whitespace and the
    /// box-drawing separators `|`, `-`, `+` are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut values = Vec::with_capacity(SIZE * SIZE);
        for ch in s.chars() {
            match ch {
                '.' => values.push(0),
                '0'..='9' => values.push(ch as u8 - b'0'),
                '|' | '-' | '+' => {}
                c if c.is_whitespace() => {}
                c => return Err(PuzzleError::InvalidCharacter { ch: c }),
            }
        }
        if values.len() != SIZE * SIZE {
            return Err(PuzzleError::InvalidLength {
                found: values.len(),
            });
        }
        let mut grid = Grid::empty();
        for (i, v) in values.into_iter().enumerate() {
            grid.set(i / SIZE, i % SIZE, v);
        }
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for &v in row {
                if v == 0 {
                    write!(f, ".")?;
                } else {
                    write!(f, "{v}")?;
                }
            }
        }
        Ok(())
    }
}

/// Cell access for an external 9×9 integer container.
///
/// The hive engine depends only on this capability set. `0` is the blank
/// sentinel; any non-zero cell is a fixed clue unless the implementor says
/// otherwise.
pub trait CellGrid {
    /// Reads the cell at `(row, col)`.
    fn cell(&self, row: usize, col: usize) -> i32;

    /// Writes the cell at `(row, col)`.
    fn set_cell(&mut self, row: usize, col: usize, value: i32);

    /// Whether `(row, col)` holds a given clue.
    fn is_fixed(&self, row: usize, col: usize) -> bool {
        self.cell(row, col) != 0
    }
}

impl CellGrid for Grid {
    fn cell(&self, row: usize, col: usize) -> i32 {
        i32::from(self.get(row, col))
    }

    fn set_cell(&mut self, row: usize, col: usize, value: i32) {
        // Values outside 0..=9 are stored as blanks.
        let v = u8::try_from(value).ok().filter(|&v| v as usize <= SIZE);
        self.set(row, col, v.unwrap_or(0));
    }
}

impl CellGrid for [[i32; SIZE]; SIZE] {
    fn cell(&self, row: usize, col: usize) -> i32 {
        self[row][col]
    }

    fn set_cell(&mut self, row: usize, col: usize, value: i32) {
        self[row][col] = value;
    }
}
