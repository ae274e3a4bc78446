//! Population-based metaheuristic Sudoku solver.
//!
//! Solves 9×9 Sudoku by stochastic local search instead of exact
//! constraint propagation:
//!
//! - **Grid model** ([`grid`]): grid container, clue template, and the
//!   fitness function (row and column duplicate count)
//! - **Hive search** ([`hive`]): a colony of worker and explorer organisms
//!   driven by box-preserving operators, with crossover between the best
//!   worker and best explorer each epoch and seeded restarts
//! - **Random streams** ([`random`]): seeded, platform-independent generators
//!
//! Every candidate keeps each 3×3 box a permutation of 1–9, so the search
//! only has to remove row and column conflicts. The search is not exact:
//! the returned grid is a solution only when its score is 0.
//!
//! # Example
//!
//! ```
//! use hive_sudoku::grid::Puzzle;
//! use hive_sudoku::hive::{HiveConfig, HiveRunner};
//!
//! let puzzle = Puzzle::new(
//!     "534678912672195348198342567859761423426853791713924856961537284287419635345286..."
//!         .parse()
//!         .unwrap(),
//! )
//! .unwrap();
//! let result = HiveRunner::run(&puzzle, &HiveConfig::fast()).unwrap();
//! assert!(result.solved);
//! ```

pub mod grid;
pub mod hive;
pub mod random;
