//! Box-preserving Sudoku operators.
//!
//! Every operator returns a fresh [`Grid`] and keeps the box invariant:
//! each 3×3 box holds 1–9 exactly once and every clue is untouched.
//!
//! # Operators
//!
//! - [`random_fill`]: fills each box's free cells with a shuffled set of the
//!   digits it is missing
//! - [`neighbor`]: swaps two free cells inside one box (the only
//!   hill-climbing move)
//! - [`merge`]: builds a child by copying whole boxes from one parent or
//!   the other

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Grid, Puzzle, SIZE};

/// Fills every free cell of `puzzle` so each box is a permutation of 1–9.
///
/// Each box is shuffled independently and uniformly.
///
/// # Complexity
/// O(81)
pub fn random_fill<R: Rng>(puzzle: &Puzzle, rng: &mut R) -> Grid {
    let mut grid = *puzzle.clues();
    let mut digits = Vec::with_capacity(SIZE);
    for b in 0..SIZE {
        digits.clear();
        digits.extend_from_slice(puzzle.missing_digits(b));
        digits.shuffle(rng);
        for (&(row, col), &d) in puzzle.free_positions(b).iter().zip(&digits) {
            grid.set(row, col, d);
        }
    }
    grid
}

/// Swaps the values of two distinct free cells within one box.
///
/// The box is chosen uniformly among boxes with at least two free cells,
/// then the pair uniformly within it. If no box has two free cells the
/// puzzle is fully determined and `candidate` is returned unchanged.
///
/// # Complexity
/// O(1) beyond copying the grid
pub fn neighbor<R: Rng>(puzzle: &Puzzle, candidate: &Grid, rng: &mut R) -> Grid {
    let mut eligible = [0usize; SIZE];
    let mut count = 0;
    for b in 0..SIZE {
        if puzzle.free_positions(b).len() >= 2 {
            eligible[count] = b;
            count += 1;
        }
    }
    if count == 0 {
        return *candidate;
    }

    let cells = puzzle.free_positions(eligible[rng.random_range(0..count)]);
    let n = cells.len();
    let i = rng.random_range(0..n);
    // Offset in 1..n guarantees j != i.
    let j = (i + rng.random_range(1..n)) % n;

    let mut next = *candidate;
    next.swap(cells[i], cells[j]);
    next
}

/// Crossover: each box of the child is copied whole from `a` or `b`, by a
/// fair coin flip per box.
///
/// Because boxes are never mixed, a child of two box-valid parents is
/// box-valid.
pub fn merge<R: Rng>(a: &Grid, b: &Grid, rng: &mut R) -> Grid {
    let mut child = *a;
    for bx in 0..SIZE {
        if rng.random_bool(0.5) {
            child.copy_box_from(b, bx);
        }
    }
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{box_cells, box_index, preserves_clues, satisfies_box_invariant};
    use crate::random::create_rng;

    fn puzzle() -> Puzzle {
        let clues: Grid =
            "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79"
                .parse()
                .unwrap();
        Puzzle::new(clues).unwrap()
    }

    fn diff(a: &Grid, b: &Grid) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                if a.get(row, col) != b.get(row, col) {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    // ---- random_fill ----

    #[test]
    fn test_random_fill_box_invariant() {
        let puzzle = puzzle();
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let grid = random_fill(&puzzle, &mut rng);
            assert!(satisfies_box_invariant(&grid));
            assert!(preserves_clues(&puzzle, &grid));
        }
    }

    #[test]
    fn test_random_fill_empty_puzzle() {
        let puzzle = Puzzle::new(Grid::empty()).unwrap();
        let mut rng = create_rng(1);
        let grid = random_fill(&puzzle, &mut rng);
        assert!(satisfies_box_invariant(&grid));
    }

    #[test]
    fn test_random_fill_varies() {
        let puzzle = puzzle();
        let mut rng = create_rng(5);
        let a = random_fill(&puzzle, &mut rng);
        let b = random_fill(&puzzle, &mut rng);
        assert_ne!(a, b);
    }

    // ---- neighbor ----

    #[test]
    fn test_neighbor_swaps_two_free_cells_in_one_box() {
        let puzzle = puzzle();
        let mut rng = create_rng(42);
        let mut grid = random_fill(&puzzle, &mut rng);
        for _ in 0..200 {
            let next = neighbor(&puzzle, &grid, &mut rng);
            let changed = diff(&grid, &next);
            assert_eq!(changed.len(), 2);
            let (p, q) = (changed[0], changed[1]);
            assert_eq!(box_index(p.0, p.1), box_index(q.0, q.1));
            assert!(!puzzle.is_fixed(p.0, p.1) && !puzzle.is_fixed(q.0, q.1));
            assert_eq!(next.get(p.0, p.1), grid.get(q.0, q.1));
            assert_eq!(next.get(q.0, q.1), grid.get(p.0, p.1));
            assert!(satisfies_box_invariant(&next));
            grid = next;
        }
    }

    #[test]
    fn test_neighbor_skips_boxes_with_one_free_cell() {
        // Solved grid with a single blank in box 0 and two blanks in box 8.
        let mut solved = [[0u8; SIZE]; SIZE];
        for (r, row) in solved.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = ((r * 3 + r / 3 + c) % 9 + 1) as u8;
            }
        }
        let full = Grid::new(solved);
        let mut clues = full;
        clues.set(0, 0, 0);
        clues.set(8, 7, 0);
        clues.set(8, 8, 0);
        let puzzle = Puzzle::new(clues).unwrap();

        let mut rng = create_rng(9);
        for _ in 0..50 {
            let next = neighbor(&puzzle, &full, &mut rng);
            assert_eq!(diff(&full, &next), vec![(8, 7), (8, 8)]);
        }
    }

    #[test]
    fn test_neighbor_fully_given_is_identity() {
        let mut rng = create_rng(0);
        let grid = random_fill(&Puzzle::new(Grid::empty()).unwrap(), &mut rng);
        let puzzle = Puzzle::new(grid).unwrap();
        assert_eq!(neighbor(&puzzle, &grid, &mut rng), grid);
    }

    // ---- merge ----

    #[test]
    fn test_merge_copies_whole_boxes() {
        let puzzle = puzzle();
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let a = random_fill(&puzzle, &mut rng);
            let b = random_fill(&puzzle, &mut rng);
            let child = merge(&a, &b, &mut rng);
            assert!(satisfies_box_invariant(&child));
            for bx in 0..SIZE {
                let values = child.box_values(bx);
                assert!(
                    values == a.box_values(bx) || values == b.box_values(bx),
                    "box {bx} mixes parents"
                );
            }
        }
    }

    #[test]
    fn test_merge_uses_both_parents() {
        let empty = Puzzle::new(Grid::empty()).unwrap();
        let mut rng = create_rng(3);
        let a = random_fill(&empty, &mut rng);
        let b = random_fill(&empty, &mut rng);
        let mut from_a = false;
        let mut from_b = false;
        for _ in 0..50 {
            let child = merge(&a, &b, &mut rng);
            for bx in 0..SIZE {
                let cells = box_cells(bx);
                if cells.iter().all(|&(r, c)| child.get(r, c) == a.get(r, c)) {
                    from_a = true;
                }
                if cells.iter().all(|&(r, c)| child.get(r, c) == b.get(r, c)) {
                    from_b = true;
                }
            }
        }
        assert!(from_a && from_b);
    }

    #[test]
    fn test_merge_identical_parents() {
        let mut rng = create_rng(42);
        let a = random_fill(&puzzle(), &mut rng);
        assert_eq!(merge(&a, &a, &mut rng), a);
    }
}
