//! End-to-end behavior of the hive runner.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use hive_sudoku::grid::{
    preserves_clues, satisfies_box_invariant, score, Grid, Puzzle, PuzzleError, Unit, SIZE,
};
use hive_sudoku::hive::{
    AttemptOutcome, EpochReport, HiveConfig, HiveError, HiveObserver, HiveRunner, Organism,
};

const SOLUTION: &str = "\
    534678912
    672195348
    198342567
    859761423
    426853791
    713924856
    961537284
    287419635
    345286179";

/// 63 givens: two blanks in every box.
const EASY: &str = "\
    .346789.2
    6.2.95348
    1983.2.67
    8.976142.
    42.8.3791
    71392.8.6
    96.537.84
    .8741.635
    345.8617.";

/// The classic 30-clue puzzle whose solution is `SOLUTION`.
const MEDIUM: &str = "\
    53..7....
    6..195...
    .98....6.
    8...6...3
    4..8.3..1
    7...2...6
    .6....28.
    ...419..5
    ....8..79";

fn puzzle(text: &str) -> Puzzle {
    Puzzle::new(text.parse().unwrap()).unwrap()
}

/// Records every committed population.
#[derive(Default)]
struct Recorder {
    snapshots: Vec<(usize, usize, u32, Vec<Organism>)>,
}

impl HiveObserver for Recorder {
    fn on_epoch(&mut self, report: &EpochReport<'_>) {
        self.snapshots.push((
            report.attempt,
            report.epoch,
            report.best_score,
            report.population.to_vec(),
        ));
    }
}

#[test]
fn test_easy_puzzle_solves_reliably() {
    let puzzle = puzzle(EASY);
    assert_eq!(puzzle.given_count(), 63);

    for seed in 0..5 {
        let config = HiveConfig::default()
            .with_num_organisms(50)
            .with_max_epochs(200)
            .with_max_restarts(5)
            .with_seed(seed * 100);
        let result = HiveRunner::run(&puzzle, &config).unwrap();

        assert!(result.solved, "seed {seed}: best score {}", result.best_score);
        assert_eq!(result.best_score, 0);
        assert_eq!(score(&result.best), 0);
        assert!(preserves_clues(&puzzle, &result.best));
        assert_eq!(
            result.attempts.last().map(|a| a.outcome),
            Some(AttemptOutcome::Solved)
        );
    }
}

#[test]
fn test_easy_puzzle_matches_known_solution() {
    let config = HiveConfig::fast().with_seed(1);
    let result = HiveRunner::run(&puzzle(EASY), &config).unwrap();
    assert!(result.solved);
    // Of the 512 box-valid fillings only one is a solution.
    assert_eq!(result.best, SOLUTION.parse::<Grid>().unwrap());
}

#[test]
fn test_identical_seeds_are_bit_identical() {
    let puzzle = puzzle(MEDIUM);
    let config = HiveConfig::default()
        .with_num_organisms(30)
        .with_max_epochs(40)
        .with_max_restarts(2)
        .with_seed(17);

    let mut first = Recorder::default();
    let mut second = Recorder::default();
    let a = HiveRunner::run_observed(&puzzle, &config, None, &mut first).unwrap();
    let b = HiveRunner::run_observed(&puzzle, &config, None, &mut second).unwrap();

    assert!(!first.snapshots.is_empty());
    assert_eq!(first.snapshots, second.snapshots);
    assert_eq!(a.best, b.best);
    assert_eq!(a.best_score, b.best_score);
    let ha: Vec<_> = a.attempts.iter().map(|s| s.score_history.clone()).collect();
    let hb: Vec<_> = b.attempts.iter().map(|s| s.score_history.clone()).collect();
    assert_eq!(ha, hb);
}

#[test]
fn test_attempts_use_consecutive_seeds() {
    let puzzle = puzzle(MEDIUM);
    let config = HiveConfig::default()
        .with_num_organisms(10)
        .with_max_epochs(3)
        .with_max_restarts(3)
        .with_seed(40);
    let result = HiveRunner::run(&puzzle, &config).unwrap();
    let seeds: Vec<u64> = result.attempts.iter().map(|a| a.seed).collect();
    assert_eq!(seeds, vec![40, 41, 42]);
}

#[test]
fn test_best_score_non_increasing_within_attempt() {
    let puzzle = puzzle(MEDIUM);
    let config = HiveConfig::default()
        .with_num_organisms(40)
        .with_max_epochs(150)
        .with_max_restarts(2)
        .with_seed(3);
    let mut recorder = Recorder::default();
    let result = HiveRunner::run_observed(&puzzle, &config, None, &mut recorder).unwrap();

    for attempt in &result.attempts {
        assert_eq!(attempt.score_history.len(), attempt.epochs + 1);
        for window in attempt.score_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "attempt {}: best score rose from {} to {}",
                attempt.attempt,
                window[0],
                window[1]
            );
        }
        assert_eq!(attempt.score_history.last(), Some(&attempt.best_score));
    }

    for (_, _, best_score, population) in &recorder.snapshots {
        let population_best = population.iter().map(|o| o.fitness).min().unwrap_or(u32::MAX);
        assert!(*best_score <= population_best);
        for organism in population {
            assert!(satisfies_box_invariant(&organism.candidate));
            assert!(preserves_clues(&puzzle, &organism.candidate));
            assert_eq!(organism.fitness, score(&organism.candidate));
        }
    }
}

#[test]
fn test_returns_best_across_attempts() {
    let puzzle = puzzle(MEDIUM);
    let config = HiveConfig::default()
        .with_num_organisms(10)
        .with_max_epochs(5)
        .with_max_restarts(4)
        .with_seed(9);
    let result = HiveRunner::run(&puzzle, &config).unwrap();
    let min = result.attempts.iter().map(|a| a.best_score).min();
    assert_eq!(Some(result.best_score), min);
    assert_eq!(score(&result.best), result.best_score);
}

fn contradictory_clues() -> Puzzle {
    // Two 5s in row 0, in different boxes.
    let mut clues = Grid::empty();
    clues.set(0, 0, 5);
    clues.set(0, 8, 5);
    Puzzle::new(clues).unwrap()
}

#[test]
fn test_contradictory_clues_fail_fast() {
    let err = HiveRunner::run(&contradictory_clues(), &HiveConfig::default()).unwrap_err();
    assert_eq!(
        err,
        HiveError::InvalidInput(PuzzleError::ConflictingClues {
            unit: Unit::Row(0),
            digit: 5
        })
    );
}

#[test]
fn test_contradictory_clues_exhaust_restarts() {
    let config = HiveConfig::default()
        .with_num_organisms(12)
        .with_max_epochs(30)
        .with_max_restarts(3)
        .with_reject_inconsistent_clues(false);
    let result = HiveRunner::run(&contradictory_clues(), &config).unwrap();

    assert!(!result.solved);
    assert!(!result.cancelled);
    assert!(result.best_score > 0);
    assert_eq!(result.attempts.len(), 3);
    assert!(result
        .attempts
        .iter()
        .all(|a| a.outcome == AttemptOutcome::Exhausted && a.epochs == 30));
    assert_eq!(result.total_epochs(), 90);
}

#[test]
fn test_cancelled_before_start() {
    let config = HiveConfig::default().with_num_organisms(10).with_max_restarts(5);
    let cancel = Arc::new(AtomicBool::new(true));
    let result = HiveRunner::run_with_cancel(&puzzle(MEDIUM), &config, Some(cancel)).unwrap();

    assert!(result.cancelled);
    assert_eq!(result.attempts.len(), 1);
    assert_eq!(result.attempts[0].epochs, 0);
    assert_eq!(result.attempts[0].outcome, AttemptOutcome::Cancelled);
    assert!(satisfies_box_invariant(&result.best));
}

#[test]
fn test_solve_in_place_fills_free_cells() {
    let clues: Grid = EASY.parse().unwrap();
    let mut cells = [[0i32; SIZE]; SIZE];
    for (row, values) in cells.iter_mut().enumerate() {
        for (col, cell) in values.iter_mut().enumerate() {
            *cell = i32::from(clues.get(row, col));
        }
    }

    let result = HiveRunner::solve_in_place(&mut cells, &HiveConfig::fast()).unwrap();
    assert!(result.solved);

    let solution: Grid = SOLUTION.parse().unwrap();
    for (row, values) in cells.iter().enumerate() {
        for (col, &cell) in values.iter().enumerate() {
            assert_eq!(cell, i32::from(solution.get(row, col)));
        }
    }
}

#[test]
fn test_solve_in_place_rejects_bad_cell() {
    let mut cells = [[0i32; SIZE]; SIZE];
    cells[2][2] = 10;
    let err = HiveRunner::solve_in_place(&mut cells, &HiveConfig::fast()).unwrap_err();
    assert!(matches!(
        err,
        HiveError::InvalidInput(PuzzleError::InvalidValue { row: 2, col: 2, value: 10 })
    ));
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_runs_are_reproducible() {
    let puzzle = puzzle(MEDIUM);
    let config = HiveConfig::default()
        .with_num_organisms(40)
        .with_max_epochs(30)
        .with_max_restarts(2)
        .with_seed(5)
        .with_parallel(true);

    let mut first = Recorder::default();
    let mut second = Recorder::default();
    let a = HiveRunner::run_observed(&puzzle, &config, None, &mut first).unwrap();
    let b = HiveRunner::run_observed(&puzzle, &config, None, &mut second).unwrap();
    assert_eq!(first.snapshots, second.snapshots);
    assert_eq!(a.best, b.best);
}
