//! Hive configuration.
//!
//! [`HiveConfig`] holds every parameter of the colony loop. Defaults match
//! the classic setup: 200 organisms, 90% workers, 5000 epochs per attempt,
//! 20 attempts.

/// Configuration for the hive search.
///
/// # Builder Pattern
///
/// ```
/// use hive_sudoku::hive::HiveConfig;
///
/// let config = HiveConfig::default()
///     .with_num_organisms(50)
///     .with_max_epochs(200)
///     .with_max_restarts(3)
///     .with_seed(7);
/// assert_eq!(config.worker_count(), 45);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HiveConfig {
    /// Population size.
    pub num_organisms: usize,

    /// Fraction of the population acting as workers (0.0–1.0).
    ///
    /// The first `round(num_organisms * worker_ratio)` slots are workers,
    /// the rest explorers.
    pub worker_ratio: f64,

    /// Epoch budget of one attempt.
    pub max_epochs: usize,

    /// Number of fresh attempts before giving up.
    pub max_restarts: usize,

    /// Chance that a worker accepts a neighbor that does not improve it.
    pub acceptance_probability: f64,

    /// A worker whose age exceeds this is replaced by a random grid.
    pub stagnation_threshold: usize,

    /// Base seed. Attempt `k` draws from a stream seeded with `seed + k`.
    pub seed: u64,

    /// Reject puzzles whose clues repeat a digit in a row or column before
    /// searching. When `false`, such puzzles run until every attempt is
    /// exhausted.
    pub reject_inconsistent_clues: bool,

    /// Epochs between progress log lines. 0 disables them.
    pub progress_interval: usize,

    /// Update organisms in parallel with rayon.
    ///
    /// Takes effect only with the `parallel` feature. Parallel runs give each
    /// population slot its own random stream, so they are reproducible but
    /// differ from sequential runs with the same seed.
    pub parallel: bool,
}

impl Default for HiveConfig {
    fn default() -> Self {
        Self {
            num_organisms: 200,
            worker_ratio: 0.9,
            max_epochs: 5000,
            max_restarts: 20,
            acceptance_probability: 0.001,
            stagnation_threshold: 1000,
            seed: 0,
            reject_inconsistent_clues: true,
            progress_interval: 1000,
            parallel: false,
        }
    }
}

impl HiveConfig {
    /// Sets the population size.
    pub fn with_num_organisms(mut self, n: usize) -> Self {
        self.num_organisms = n;
        self
    }

    /// Sets the worker fraction of the population (clamped to [0, 1]).
    pub fn with_worker_ratio(mut self, ratio: f64) -> Self {
        self.worker_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the epoch budget of one attempt.
    pub fn with_max_epochs(mut self, n: usize) -> Self {
        self.max_epochs = n;
        self
    }

    /// Sets the number of attempts.
    pub fn with_max_restarts(mut self, n: usize) -> Self {
        self.max_restarts = n;
        self
    }

    /// Sets the probability of accepting a non-improving move (clamped to [0, 1]).
    pub fn with_acceptance_probability(mut self, p: f64) -> Self {
        self.acceptance_probability = p.clamp(0.0, 1.0);
        self
    }

    /// Sets the age after which a worker respawns.
    pub fn with_stagnation_threshold(mut self, age: usize) -> Self {
        self.stagnation_threshold = age;
        self
    }

    /// Sets the base seed. Attempt `k` runs with `seed + k`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets whether row or column clue clashes fail before the search.
    pub fn with_reject_inconsistent_clues(mut self, reject: bool) -> Self {
        self.reject_inconsistent_clues = reject;
        self
    }

    /// Sets the epochs between progress log lines. `0` disables them.
    pub fn with_progress_interval(mut self, epochs: usize) -> Self {
        self.progress_interval = epochs;
        self
    }

    /// Enables parallel epochs (requires the `parallel` feature).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Preset for easy puzzles: small population, short attempts.
    ///
    /// - Organisms: 50, Epochs: 500, Restarts: 5
    pub fn fast() -> Self {
        Self {
            num_organisms: 50,
            max_epochs: 500,
            max_restarts: 5,
            ..Self::default()
        }
    }

    /// The default parameters.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset for hard puzzles: larger population, longer attempts.
    ///
    /// - Organisms: 400, Epochs: 20000, Restarts: 40
    pub fn thorough() -> Self {
        Self {
            num_organisms: 400,
            max_epochs: 20_000,
            max_restarts: 40,
            ..Self::default()
        }
    }

    /// Number of worker slots at the front of the population.
    pub fn worker_count(&self) -> usize {
        (self.num_organisms as f64 * self.worker_ratio).round() as usize
    }

    /// Number of explorer slots at the back of the population.
    pub fn explorer_count(&self) -> usize {
        self.num_organisms.saturating_sub(self.worker_count())
    }

    /// Seed of attempt `attempt`.
    pub fn attempt_seed(&self, attempt: usize) -> u64 {
        self.seed.wrapping_add(attempt as u64)
    }

    /// Validates the configuration.
    ///
    /// The merge step needs at least one worker and one explorer.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_organisms < 2 {
            return Err("num_organisms must be at least 2".into());
        }
        if !(0.0..=1.0).contains(&self.worker_ratio) {
            return Err(format!(
                "worker_ratio must be in [0, 1], got {}",
                self.worker_ratio
            ));
        }
        if self.worker_count() == 0 {
            return Err("worker_ratio leaves no workers".into());
        }
        if self.explorer_count() == 0 {
            return Err("worker_ratio leaves no explorers".into());
        }
        if self.max_epochs == 0 {
            return Err("max_epochs must be at least 1".into());
        }
        if self.max_restarts == 0 {
            return Err("max_restarts must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.acceptance_probability) {
            return Err(format!(
                "acceptance_probability must be in [0, 1], got {}",
                self.acceptance_probability
            ));
        }
        Ok(())
    }
}
