//! Fitness of a candidate grid.
//!
//! A line (row or column) with `k` distinct digits contributes `9 - k`
//! conflicts. The score sums this over all 18 lines. Boxes are not counted:
//! the operators keep them permutations of 1–9.

use super::puzzle::Puzzle;
use super::types::{Grid, SIZE};

const ALL_DIGITS: u16 = 0b11_1111_1110;

#[inline]
fn distinct(values: impl Iterator<Item = u8>) -> u32 {
    let mut mask = 0u16;
    for v in values {
        if (1..=SIZE as u8).contains(&v) {
            mask |= 1 << v;
        }
    }
    mask.count_ones()
}

/// Duplicate count of one row.
#[inline]
pub fn row_conflicts(grid: &Grid, row: usize) -> u32 {
    SIZE as u32 - distinct(grid.rows()[row].iter().copied())
}

/// Duplicate count of one column.
#[inline]
pub fn column_conflicts(grid: &Grid, col: usize) -> u32 {
    SIZE as u32 - distinct(grid.rows().iter().map(|r| r[col]))
}

/// Total row and column conflicts. `0` means the grid is solved.
///
/// # Examples
///
/// ```
/// use hive_sudoku::grid::{score, Grid};
///
/// let mut cells = [[0u8; 9]; 9];
/// for r in 0..9 {
///     for c in 0..9 {
///         cells[r][c] = ((r * 3 + r / 3 + c) % 9 + 1) as u8;
///     }
/// }
/// assert_eq!(score(&Grid::new(cells)), 0);
/// ```
pub fn score(grid: &Grid) -> u32 {
    (0..SIZE)
        .map(|i| row_conflicts(grid, i) + column_conflicts(grid, i))
        .sum()
}

/// Whether `grid` is a complete, valid solution.
#[inline]
pub fn is_solved(grid: &Grid) -> bool {
    score(grid) == 0
}

/// Whether every box of `grid` holds 1–9 exactly once.
pub fn satisfies_box_invariant(grid: &Grid) -> bool {
    (0..SIZE).all(|b| {
        let mut mask = 0u16;
        for v in grid.box_values(b) {
            if v == 0 || v as usize > SIZE {
                return false;
            }
            mask |= 1 << v;
        }
        mask == ALL_DIGITS
    })
}

/// Whether `grid` keeps every clue of `puzzle`.
pub fn preserves_clues(puzzle: &Puzzle, grid: &Grid) -> bool {
    let clues = puzzle.clues();
    (0..SIZE).all(|row| {
        (0..SIZE).all(|col| !puzzle.is_fixed(row, col) || clues.get(row, col) == grid.get(row, col))
    })
}
