//! Sudoku grid model.
//!
//! The search engine sees a puzzle through three pieces:
//!
//! - [`Grid`]: an owned 9×9 digit matrix, used for clues and candidates alike
//! - [`Puzzle`]: the immutable template built from the clues, with the
//!   fixed/free split and per-box bookkeeping precomputed
//! - [`score`]: the fitness function, counting row and column duplicates
//!
//! External containers plug in through [`CellGrid`], which exposes only
//! cell read/write and the fixed predicate.
//!
//! # Box invariant
//!
//! Every candidate produced by the hive operators holds each digit 1–9
//! exactly once per 3×3 box and keeps every clue. Box conflicts are
//! therefore impossible and only rows and columns are scored.

mod fitness;
mod puzzle;
mod types;

pub use fitness::{
    column_conflicts, is_solved, preserves_clues, row_conflicts, satisfies_box_invariant, score,
};
pub use puzzle::{Puzzle, PuzzleError, Unit};
pub use types::{box_cells, box_index, CellGrid, Grid, BOX, SIZE};
