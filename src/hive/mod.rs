//! Hive search for Sudoku.
//!
//! A population of organisms shares one puzzle. Workers hill-climb with a
//! box-local swap move, accepting a worse grid with a small fixed
//! probability and restarting from a random grid once they stagnate.
//! Explorers resample a random grid every epoch. After each epoch the best
//! worker and best explorer are crossed, box by box, into the slot of the
//! worst worker. Attempts restart from a fresh population with the next
//! seed until one reaches score 0 or the restart budget runs out.
//!
//! # Key Types
//!
//! - [`HiveConfig`]: population size, role split, budgets, acceptance
//! - [`HiveRunner`]: executes the restart and epoch loops
//! - [`HiveResult`]: best grid over all attempts, with per-attempt statistics
//! - [`Organism`]: one agent of the population
//!
//! # Submodules
//!
//! - [`operators`]: random fill, swap neighbor, and box crossover

mod config;
pub mod operators;
mod runner;
mod types;

pub use config::HiveConfig;
pub use runner::{
    AttemptOutcome, AttemptSummary, EpochReport, HiveObserver, HiveResult, HiveRunner,
};
pub use types::{HiveError, Organism, Role};
