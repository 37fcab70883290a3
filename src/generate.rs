//! Guaranteed-solvable instance generation.
//!
//! Scrambling replays legal blank moves starting from the goal, which keeps
//! the permutation inside the goal's reachability class. A uniformly random
//! permutation is solvable only half the time, so raw shuffling is never
//! used here.

use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};

use crate::board::Board;

/// Number of random blank moves applied to the goal when scrambling.
pub const SCRAMBLE_MOVES: usize = 100;

/// Returns a random solvable `size x size` instance.
///
/// # Panics
///
/// Panics if `size` is outside the supported board range.
pub fn generate(size: usize) -> Board {
    generate_with(size, &mut thread_rng())
}

/// Seeded variant of [`generate`] for reproducible instances.
pub fn generate_seeded(size: usize, seed: u64) -> Board {
    generate_with(size, &mut StdRng::seed_from_u64(seed))
}

/// Scrambles the goal with [`SCRAMBLE_MOVES`] random legal moves drawn
/// from `rng`.
pub fn generate_with<R: Rng>(size: usize, rng: &mut R) -> Board {
    let mut board = Board::goal(size);
    for _ in 0..SCRAMBLE_MOVES {
        let neighbors = board.neighbors(board.blank());
        let choices = neighbors.as_slice();
        let target = choices[rng.gen_range(0..choices.len())];
        board = board.swapped(target);
    }
    board
}
