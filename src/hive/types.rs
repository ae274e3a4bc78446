//! Organisms, roles, and the hive error type.

use rand::Rng;
use thiserror::Error;

use super::operators::random_fill;
use crate::grid::{score, Grid, Puzzle, PuzzleError};

/// What an organism does each epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    /// Hill-climbs with the swap move, occasionally accepting a worse grid,
    /// and restarts from scratch when it stagnates.
    Worker,
    /// Resamples a fresh random grid every epoch.
    Explorer,
}

/// One agent of the hive: a role, a candidate grid, its score, and how many
/// consecutive epochs it has gone without accepting a move.
///
/// Organisms are replaced wholesale; the runner never edits a candidate in
/// place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organism {
    pub role: Role,
    pub candidate: Grid,
    pub fitness: u32,
    pub age: usize,
}

impl Organism {
    /// Wraps `candidate`, scoring it. Age starts at 0.
    pub fn new(role: Role, candidate: Grid) -> Self {
        Self {
            role,
            fitness: score(&candidate),
            candidate,
            age: 0,
        }
    }

    /// A fresh organism on a random fill of `puzzle`.
    pub fn spawn<R: Rng>(role: Role, puzzle: &Puzzle, rng: &mut R) -> Self {
        Self::new(role, random_fill(puzzle, rng))
    }

    /// Whether this organism holds a solved grid.
    pub fn is_solved(&self) -> bool {
        self.fitness == 0
    }
}

/// Errors that stop a hive run before any search happens.
///
/// Failing to converge is not an error: the runner returns the best grid it
/// found and the caller checks its score.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HiveError {
    #[error("invalid hive configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid puzzle: {0}")]
    InvalidInput(#[from] PuzzleError),
}
