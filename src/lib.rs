//! Sliding-Tile Puzzle Solver Library
//!
//! Solves the generalized N-puzzle: an `n x n` board of numbered tiles with
//! one blank, where a move slides an adjacent tile into the blank and the
//! task is a minimal move sequence to the sorted configuration. Four
//! interchangeable strategies are provided (breadth-first search, iterative
//! deepening, and A* under two admissible heuristics), each reporting an
//! optimal path plus the number of states it explored.

pub mod board;
pub mod generate;
pub mod heuristic;
pub mod search;

pub use board::{Board, BoardError};
pub use generate::generate;
pub use search::{Algorithm, Outcome, SolveResult, Solver};

use std::time::Duration;

/// One-shot convenience wrapper: builds a [`Solver`] for the board's size
/// and runs `algorithm` from `initial`.
///
/// Callers solving many instances of one size should hold a [`Solver`] and
/// reuse its precomputed distance table instead.
pub fn solve(
    initial: &Board,
    algorithm: Algorithm,
    budget: Option<Duration>,
) -> Result<SolveResult, BoardError> {
    Solver::new(initial.size()).solve(initial, algorithm, budget)
}
