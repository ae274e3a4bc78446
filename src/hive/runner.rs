//! Hive colony loop.
//!
//! [`HiveRunner`] drives the search:
//! restart loop → (initialize population → epochs → best tracking) → repeat.
//!
//! # Epoch
//!
//! 1. Every organism takes one step according to its role:
//!    workers try a swap move, explorers resample
//! 2. Barrier: the whole population is committed before anything scans it
//! 3. The best worker and best explorer are merged into the worst worker
//! 4. The global best is updated from the population and the merged child

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::HiveConfig;
use super::operators::{merge, neighbor};
use super::types::{HiveError, Organism, Role};
use crate::grid::{score, CellGrid, Grid, Puzzle, SIZE};
use crate::random::{create_rng, HiveRng};
#[cfg(feature = "parallel")]
use crate::random::stream_rng;

/// How one attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Reached score 0.
    Solved,
    /// Used its whole epoch budget without solving.
    Exhausted,
    /// Stopped by the cancellation flag.
    Cancelled,
}

/// Statistics of one restart attempt.
#[derive(Debug, Clone)]
pub struct AttemptSummary {
    /// Attempt index, starting at 0.
    pub attempt: usize,

    /// Seed of the attempt's random stream.
    pub seed: u64,

    /// Epochs executed.
    pub epochs: usize,

    /// Best score reached in this attempt.
    pub best_score: u32,

    /// Why the attempt stopped.
    pub outcome: AttemptOutcome,

    /// Best score of the initial population, then after each epoch.
    pub score_history: Vec<u32>,
}

/// Result of a hive run.
///
/// `best` is the lowest-score grid over all attempts. It is a valid solution
/// only when `solved` is true.
#[derive(Debug, Clone)]
pub struct HiveResult {
    /// Best grid found across all attempts.
    pub best: Grid,

    /// Score of `best`.
    pub best_score: u32,

    /// Whether `best` is a complete solution.
    pub solved: bool,

    /// Whether the run stopped on the cancellation flag.
    pub cancelled: bool,

    /// One summary per attempt, in run order.
    pub attempts: Vec<AttemptSummary>,
}

impl HiveResult {
    /// Epochs executed across all attempts.
    pub fn total_epochs(&self) -> usize {
        self.attempts.iter().map(|a| a.epochs).sum()
    }
}

/// Snapshot handed to a [`HiveObserver`] after each epoch.
#[derive(Debug)]
pub struct EpochReport<'a> {
    /// Attempt index, starting at 0.
    pub attempt: usize,
    /// 1-based number of the epoch just completed.
    pub epoch: usize,
    /// Best score of the attempt so far.
    pub best_score: u32,
    /// The committed population, workers first.
    pub population: &'a [Organism],
}

/// Receives a report after every epoch. Purely observational.
pub trait HiveObserver {
    fn on_epoch(&mut self, report: &EpochReport<'_>);
}

impl HiveObserver for () {
    fn on_epoch(&mut self, _report: &EpochReport<'_>) {}
}

/// Executes the hive search.
///
/// # Usage
///
/// ```
/// use hive_sudoku::grid::{Grid, Puzzle};
/// use hive_sudoku::hive::{HiveConfig, HiveRunner};
///
/// let clues: Grid = "
///     .34678912
///     672195348
///     198342567
///     859761423
///     426853791
///     713924856
///     961537284
///     287419635
///     345286179"
///     .parse()
///     .unwrap();
/// let puzzle = Puzzle::new(clues).unwrap();
/// let config = HiveConfig::fast().with_seed(1);
/// let result = HiveRunner::run(&puzzle, &config).unwrap();
/// assert!(result.solved);
/// assert_eq!(result.best.get(0, 0), 5);
/// ```
pub struct HiveRunner;

impl HiveRunner {
    /// Runs the search to completion.
    pub fn run(puzzle: &Puzzle, config: &HiveConfig) -> Result<HiveResult, HiveError> {
        Self::run_with_cancel(puzzle, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The flag is polled once per epoch. A cancelled run returns the best
    /// grid found so far and starts no further attempts.
    pub fn run_with_cancel(
        puzzle: &Puzzle,
        config: &HiveConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<HiveResult, HiveError> {
        Self::run_observed(puzzle, config, cancel, &mut ())
    }

    /// Runs the search, reporting every epoch to `observer`.
    pub fn run_observed<O: HiveObserver>(
        puzzle: &Puzzle,
        config: &HiveConfig,
        cancel: Option<Arc<AtomicBool>>,
        observer: &mut O,
    ) -> Result<HiveResult, HiveError> {
        config.validate().map_err(HiveError::InvalidConfig)?;
        if config.reject_inconsistent_clues {
            puzzle.check_consistency()?;
        }
        if config.parallel && !cfg!(feature = "parallel") {
            warn!("parallel requested but the `parallel` feature is disabled; running sequentially");
        }

        info!(
            num_organisms = config.num_organisms,
            workers = config.worker_count(),
            max_epochs = config.max_epochs,
            max_restarts = config.max_restarts,
            givens = puzzle.given_count(),
            "starting hive search"
        );

        let mut best = *puzzle.clues();
        let mut best_score = u32::MAX;
        let mut attempts = Vec::with_capacity(config.max_restarts);

        for attempt in 0..config.max_restarts {
            let (grid, summary) =
                run_attempt(puzzle, config, attempt, cancel.as_deref(), observer);

            if summary.best_score < best_score {
                best = grid;
                best_score = summary.best_score;
            }

            let outcome = summary.outcome;
            attempts.push(summary);
            if outcome != AttemptOutcome::Exhausted {
                break;
            }
        }

        let solved = best_score == 0;
        let cancelled = attempts
            .last()
            .is_some_and(|a| a.outcome == AttemptOutcome::Cancelled);
        if !solved && !cancelled {
            warn!(
                attempts = attempts.len(),
                best_score, "all attempts exhausted without a solution"
            );
        }

        Ok(HiveResult {
            best,
            best_score,
            solved,
            cancelled,
            attempts,
        })
    }

    /// Solves the clues held in an external container and writes the best
    /// grid back into its free cells.
    pub fn solve_in_place<G: CellGrid + ?Sized>(
        cells: &mut G,
        config: &HiveConfig,
    ) -> Result<HiveResult, HiveError> {
        let puzzle = Puzzle::from_cells(&*cells)?;
        let result = Self::run(&puzzle, config)?;
        for row in 0..SIZE {
            for col in 0..SIZE {
                if !puzzle.is_fixed(row, col) {
                    cells.set_cell(row, col, i32::from(result.best.get(row, col)));
                }
            }
        }
        Ok(result)
    }
}

/// Population and best-so-far of one attempt.
struct Colony<'p> {
    puzzle: &'p Puzzle,
    population: Vec<Organism>,
    workers: usize,
    rng: HiveRng,
    #[cfg(feature = "parallel")]
    slot_rngs: Vec<HiveRng>,
    best: Grid,
    best_score: u32,
}

impl<'p> Colony<'p> {
    fn new(puzzle: &'p Puzzle, config: &HiveConfig, seed: u64) -> Self {
        let mut rng = create_rng(seed);
        let workers = config.worker_count();
        let population: Vec<Organism> = (0..config.num_organisms)
            .map(|i| {
                let role = if i < workers {
                    Role::Worker
                } else {
                    Role::Explorer
                };
                Organism::spawn(role, puzzle, &mut rng)
            })
            .collect();

        #[cfg(feature = "parallel")]
        let slot_rngs = if config.parallel {
            // Stream 0 belongs to the attempt's own generator.
            (0..config.num_organisms)
                .map(|i| stream_rng(seed, i as u64 + 1))
                .collect()
        } else {
            Vec::new()
        };

        let mut colony = Self {
            puzzle,
            population,
            workers,
            rng,
            #[cfg(feature = "parallel")]
            slot_rngs,
            best: *puzzle.clues(),
            best_score: u32::MAX,
        };
        colony.scan_best();
        colony
    }

    fn epoch(&mut self, config: &HiveConfig) {
        self.step_all(config);
        self.scan_best();
        self.merge_step();
    }

    #[cfg(feature = "parallel")]
    fn step_all(&mut self, config: &HiveConfig) {
        if config.parallel {
            let puzzle = self.puzzle;
            self.population
                .par_iter_mut()
                .zip(self.slot_rngs.par_iter_mut())
                .for_each(|(organism, rng)| step_organism(organism, puzzle, config, rng));
        } else {
            self.step_sequential(config);
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn step_all(&mut self, config: &HiveConfig) {
        self.step_sequential(config);
    }

    fn step_sequential(&mut self, config: &HiveConfig) {
        for organism in &mut self.population {
            step_organism(organism, self.puzzle, config, &mut self.rng);
        }
    }

    /// Records the first organism scoring strictly below the running best.
    fn scan_best(&mut self) {
        for organism in &self.population {
            if organism.fitness < self.best_score {
                self.best = organism.candidate;
                self.best_score = organism.fitness;
            }
        }
    }

    /// Merges the best worker with the best explorer into the worst worker.
    fn merge_step(&mut self) {
        let (workers, explorers) = self.population.split_at(self.workers);
        let Some(best_worker) = first_min(workers) else {
            return;
        };
        let Some(best_explorer) = first_min(explorers) else {
            return;
        };
        let Some(worst_worker) = workers
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, o)| o.fitness)
            .map(|(i, _)| i)
        else {
            return;
        };

        let merged = merge(
            &workers[best_worker].candidate,
            &explorers[best_explorer].candidate,
            &mut self.rng,
        );
        let child = Organism::new(Role::Worker, merged);
        if child.fitness < self.best_score {
            self.best = child.candidate;
            self.best_score = child.fitness;
        }
        self.population[worst_worker] = child;
    }
}

fn first_min(organisms: &[Organism]) -> Option<usize> {
    organisms
        .iter()
        .enumerate()
        .min_by_key(|(_, o)| o.fitness)
        .map(|(i, _)| i)
}

/// One epoch step of a single organism.
///
/// Reads only the shared puzzle and the organism's own state, so steps of
/// different organisms are independent.
fn step_organism<R: Rng>(
    organism: &mut Organism,
    puzzle: &Puzzle,
    config: &HiveConfig,
    rng: &mut R,
) {
    match organism.role {
        Role::Worker => {
            let candidate = neighbor(puzzle, &organism.candidate, rng);
            let fitness = score(&candidate);
            let escape = rng.random::<f64>() < config.acceptance_probability;
            if fitness < organism.fitness || escape {
                *organism = Organism {
                    role: Role::Worker,
                    candidate,
                    fitness,
                    age: 0,
                };
            } else {
                organism.age += 1;
                if organism.age > config.stagnation_threshold {
                    *organism = Organism::spawn(Role::Worker, puzzle, rng);
                }
            }
        }
        Role::Explorer => {
            *organism = Organism::spawn(Role::Explorer, puzzle, rng);
        }
    }
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}

fn run_attempt<O: HiveObserver>(
    puzzle: &Puzzle,
    config: &HiveConfig,
    attempt: usize,
    cancel: Option<&AtomicBool>,
    observer: &mut O,
) -> (Grid, AttemptSummary) {
    let seed = config.attempt_seed(attempt);
    info!(attempt, seed, "attempt started");

    let mut colony = Colony::new(puzzle, config, seed);
    let mut score_history = Vec::with_capacity(config.max_epochs + 1);
    score_history.push(colony.best_score);

    let mut epochs = 0;
    let mut cancelled = false;
    for epoch in 0..config.max_epochs {
        if colony.best_score == 0 {
            break;
        }
        if is_cancelled(cancel) {
            cancelled = true;
            break;
        }
        if config.progress_interval > 0 && epoch % config.progress_interval == 0 {
            debug!(attempt, epoch, best_score = colony.best_score, "hive progress");
        }

        colony.epoch(config);
        epochs += 1;
        score_history.push(colony.best_score);

        observer.on_epoch(&EpochReport {
            attempt,
            epoch: epochs,
            best_score: colony.best_score,
            population: &colony.population,
        });
    }

    let outcome = if colony.best_score == 0 {
        AttemptOutcome::Solved
    } else if cancelled {
        AttemptOutcome::Cancelled
    } else {
        AttemptOutcome::Exhausted
    };
    info!(
        attempt,
        epochs,
        best_score = colony.best_score,
        ?outcome,
        "attempt finished"
    );

    let summary = AttemptSummary {
        attempt,
        seed,
        epochs,
        best_score: colony.best_score,
        outcome,
        score_history,
    };
    (colony.best, summary)
}
