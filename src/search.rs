//! Search strategies over the sliding-tile move graph.
//!
//! All four strategies return a shortest path when one exists (every move
//! costs one) and differ only in how much of the state space they touch
//! along the way. Per-invocation bookkeeping (frontier, visited set,
//! predecessor map) is created on entry and dropped on return, so one
//! [`Solver`] can serve any number of concurrent searches.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::board::{Board, BoardError};
use crate::heuristic::{DistanceTable, Heuristic};

/// Search strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Uninformed layer-by-layer sweep of the move graph.
    Bfs,
    /// Depth-bounded sweeps with a persistent visited map: states discovered
    /// in an earlier pass are never re-expanded, so each deepening step only
    /// pays for the new boundary layer.
    Ids,
    /// Best-first search guided by the misplaced-tile count.
    AstarMisplaced,
    /// Best-first search guided by the Manhattan-distance sum.
    AstarManhattan,
}

impl Algorithm {
    /// All strategies, in menu order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Ids,
        Algorithm::AstarMisplaced,
        Algorithm::AstarManhattan,
    ];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Bfs => "Breadth-First Search",
            Algorithm::Ids => "Iterative Deepening Search",
            Algorithm::AstarMisplaced => "A* Misplaced Tiles",
            Algorithm::AstarManhattan => "A* Manhattan Distances",
        };
        f.write_str(name)
    }
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A shortest path to the goal was found.
    Solved,
    /// The reachable component was exhausted without meeting the goal; the
    /// instance is proven unsolvable.
    Exhausted,
    /// The time budget ran out first. Says nothing about solvability.
    Cancelled,
}

/// Result of one search invocation.
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub outcome: Outcome,
    /// `[root, ..., goal]` when solved; length is the optimal move count
    /// plus one.
    pub path: Option<Vec<Board>>,
    /// States the strategy committed to: visited for BFS/IDS, expanded
    /// for A*.
    pub states_explored: usize,
    /// Wall-clock search time. Diagnostic only.
    pub elapsed: Duration,
}

impl SolveResult {
    pub fn solved(&self) -> bool {
        self.outcome == Outcome::Solved
    }

    /// Optimal move count, when solved.
    pub fn moves(&self) -> Option<usize> {
        self.path.as_ref().map(|p| p.len() - 1)
    }
}

fn solved(path: Vec<Board>, explored: usize) -> SolveResult {
    SolveResult {
        outcome: Outcome::Solved,
        path: Some(path),
        states_explored: explored,
        elapsed: Duration::ZERO,
    }
}

fn exhausted(explored: usize) -> SolveResult {
    SolveResult {
        outcome: Outcome::Exhausted,
        path: None,
        states_explored: explored,
        elapsed: Duration::ZERO,
    }
}

fn cancelled(explored: usize) -> SolveResult {
    SolveResult {
        outcome: Outcome::Cancelled,
        path: None,
        states_explored: explored,
        elapsed: Duration::ZERO,
    }
}

/// Cut-off instant derived from the caller's time budget.
#[derive(Debug, Clone, Copy)]
struct Deadline(Option<Instant>);

impl Deadline {
    fn new(budget: Option<Duration>) -> Self {
        Deadline(budget.and_then(|d| Instant::now().checked_add(d)))
    }

    fn expired(&self) -> bool {
        self.0.map_or(false, |t| Instant::now() >= t)
    }
}

/// Frontier entry for the informed strategies.
///
/// Ordered by lowest `f`, then earliest insertion, so equal-cost entries
/// leave the heap in FIFO order.
#[derive(Clone, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    seq: u64,
    g: u32,
    board: Board,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse both keys for min-first order.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reusable solver for one board size.
///
/// Holds the canonical goal and the precomputed distance table; everything
/// a search mutates lives inside [`Solver::solve`], so shared references to
/// a solver are safe across threads.
#[derive(Debug, Clone)]
pub struct Solver {
    size: usize,
    goal: Board,
    table: DistanceTable,
}

impl Solver {
    /// Builds a solver for `size x size` boards.
    ///
    /// # Panics
    ///
    /// Panics if `size` is outside the supported board range.
    pub fn new(size: usize) -> Self {
        let goal = Board::goal(size);
        let table = DistanceTable::new(size);
        Self { size, goal, table }
    }

    /// Board edge length this solver was built for.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The canonical solved board.
    pub fn goal(&self) -> &Board {
        &self.goal
    }

    /// Returns a random solvable instance of this solver's size.
    pub fn generate(&self) -> Board {
        crate::generate::generate(self.size)
    }

    /// Runs `algorithm` from `initial` toward the canonical goal.
    ///
    /// `budget` bounds wall-clock time; when it runs out the search returns
    /// [`Outcome::Cancelled`] with the explored count so far instead of
    /// blocking indefinitely. An exhausted search is reported as
    /// [`Outcome::Exhausted`], not an error.
    pub fn solve(
        &self,
        initial: &Board,
        algorithm: Algorithm,
        budget: Option<Duration>,
    ) -> Result<SolveResult, BoardError> {
        if initial.size() != self.size {
            return Err(BoardError::InvalidLength {
                expected: self.size * self.size,
                found: initial.size() * initial.size(),
            });
        }

        let start = Instant::now();
        let deadline = Deadline::new(budget);

        let mut result = if initial == &self.goal {
            solved(vec![initial.clone()], 1)
        } else {
            match algorithm {
                Algorithm::Bfs => self.bfs(initial, deadline),
                Algorithm::Ids => self.ids(initial, deadline),
                Algorithm::AstarMisplaced => {
                    self.astar(initial, Heuristic::Misplaced, deadline)
                }
                Algorithm::AstarManhattan => {
                    self.astar(initial, Heuristic::Manhattan, deadline)
                }
            }
        };
        result.elapsed = start.elapsed();

        debug!(
            "{algorithm}: outcome={:?} explored={} elapsed={:?}",
            result.outcome, result.states_explored, result.elapsed
        );
        Ok(result)
    }

    fn bfs(&self, root: &Board, deadline: Deadline) -> SolveResult {
        let mut visited: FxHashSet<Board> = FxHashSet::default();
        let mut predecessor: FxHashMap<Board, Board> = FxHashMap::default();
        let mut frontier: VecDeque<Board> = VecDeque::new();

        visited.insert(root.clone());
        frontier.push_back(root.clone());

        while let Some(current) = frontier.pop_front() {
            if deadline.expired() {
                return cancelled(visited.len());
            }
            for next in current.successors() {
                if visited.contains(&next) {
                    continue;
                }
                visited.insert(next.clone());
                predecessor.insert(next.clone(), current.clone());
                if next == self.goal {
                    let path = reconstruct_path(&next, &predecessor);
                    return solved(path, visited.len());
                }
                frontier.push_back(next);
            }
        }

        exhausted(visited.len())
    }

    fn ids(&self, root: &Board, deadline: Deadline) -> SolveResult {
        // Depth at which each state was first discovered. Survives across
        // deepening passes, so pass L expands only the depth-L boundary
        // instead of redoing the shallow layers.
        let mut visited: FxHashMap<Board, usize> = FxHashMap::default();
        let mut predecessor: FxHashMap<Board, Board> = FxHashMap::default();

        visited.insert(root.clone(), 0);

        // States the previous pass discovered but left unexpanded.
        let mut boundary: Vec<(Board, usize)> = vec![(root.clone(), 0)];
        let mut limit = 0;

        loop {
            if boundary.is_empty() {
                return exhausted(visited.len());
            }
            limit += 1;

            let mut next_boundary: Vec<(Board, usize)> = Vec::new();
            let mut stack = boundary;

            while let Some((current, depth)) = stack.pop() {
                if deadline.expired() {
                    return cancelled(visited.len());
                }
                if depth >= limit {
                    next_boundary.push((current, depth));
                    continue;
                }
                for next in current.successors() {
                    if visited.contains_key(&next) {
                        continue;
                    }
                    visited.insert(next.clone(), depth + 1);
                    predecessor.insert(next.clone(), current.clone());
                    if next == self.goal {
                        let path = reconstruct_path(&next, &predecessor);
                        return solved(path, visited.len());
                    }
                    stack.push((next, depth + 1));
                }
            }

            boundary = next_boundary;
        }
    }

    fn astar(&self, root: &Board, heuristic: Heuristic, deadline: Deadline) -> SolveResult {
        let mut expanded: FxHashSet<Board> = FxHashSet::default();
        let mut best_g: FxHashMap<Board, u32> = FxHashMap::default();
        let mut predecessor: FxHashMap<Board, Board> = FxHashMap::default();
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        let mut seq = 0u64;

        best_g.insert(root.clone(), 0);
        open.push(OpenEntry {
            f: heuristic.evaluate(root, &self.table),
            seq,
            g: 0,
            board: root.clone(),
        });

        while let Some(entry) = open.pop() {
            if deadline.expired() {
                return cancelled(expanded.len());
            }
            let current = entry.board;
            if expanded.contains(&current) {
                // Stale duplicate left behind by a later g improvement.
                continue;
            }
            if best_g.get(&current).map_or(false, |&g| g < entry.g) {
                // A cheaper copy of this state is still queued.
                continue;
            }
            expanded.insert(current.clone());
            if current == self.goal {
                let path = reconstruct_path(&current, &predecessor);
                return solved(path, expanded.len());
            }

            let g_next = entry.g + 1;
            for next in current.successors() {
                if expanded.contains(&next) {
                    continue;
                }
                if best_g.get(&next).map_or(true, |&g| g_next < g) {
                    best_g.insert(next.clone(), g_next);
                    predecessor.insert(next.clone(), current.clone());
                    seq += 1;
                    let f = g_next + heuristic.evaluate(&next, &self.table);
                    open.push(OpenEntry {
                        f,
                        seq,
                        g: g_next,
                        board: next,
                    });
                }
            }
        }

        exhausted(expanded.len())
    }
}

/// Walks the predecessor map back from `last` to the root.
///
/// Returns `[root, ..., last]`. The root is the one state with no recorded
/// predecessor.
fn reconstruct_path(last: &Board, predecessor: &FxHashMap<Board, Board>) -> Vec<Board> {
    let mut path = vec![last.clone()];
    let mut current = last;
    while let Some(previous) = predecessor.get(current) {
        path.push(previous.clone());
        current = previous;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::generate_seeded;

    fn board(s: &str) -> Board {
        s.parse().expect("test board must parse")
    }

    /// Every consecutive pair must differ by one legal blank move, and the
    /// path must end at the goal.
    fn assert_valid_path(path: &[Board], solver: &Solver) {
        assert_eq!(path.last(), Some(solver.goal()), "path must end at goal");
        for pair in path.windows(2) {
            let stepped = pair[0]
                .apply_move(pair[1].blank())
                .expect("path step must be a legal move");
            assert_eq!(stepped, pair[1], "path step does not follow its predecessor");
        }
    }

    #[test]
    fn test_already_solved_board() {
        let solver = Solver::new(3);
        for algorithm in Algorithm::ALL {
            let result = solver.solve(solver.goal(), algorithm, None).unwrap();
            assert!(result.solved());
            assert_eq!(result.moves(), Some(0));
            assert_eq!(result.states_explored, 1);
        }
    }

    #[test]
    fn test_one_move_instance() {
        let solver = Solver::new(3);
        let root = board("102345678");
        for algorithm in Algorithm::ALL {
            let result = solver.solve(&root, algorithm, None).unwrap();
            assert!(result.solved(), "{algorithm} failed a one-move instance");
            assert_eq!(result.moves(), Some(1), "{algorithm} path is not minimal");
            assert_valid_path(result.path.as_deref().unwrap(), &solver);
        }

        let bfs = solver.solve(&root, Algorithm::Bfs, None).unwrap();
        assert_eq!(bfs.states_explored, 2, "BFS must stop on first goal sighting");
    }

    #[test]
    fn test_strategies_agree_on_optimal_length() {
        let solver = Solver::new(3);
        let root = board("724506831");

        let reference = solver.solve(&root, Algorithm::Bfs, None).unwrap();
        assert!(reference.solved());
        let optimal = reference.moves().unwrap();
        assert!(optimal > 0);

        for algorithm in Algorithm::ALL {
            let result = solver.solve(&root, algorithm, None).unwrap();
            assert!(result.solved(), "{algorithm} failed a solvable instance");
            assert_eq!(
                result.moves(),
                Some(optimal),
                "{algorithm} returned a non-minimal path"
            );
            assert_valid_path(result.path.as_deref().unwrap(), &solver);
        }
    }

    #[test]
    fn test_manhattan_explores_no_more_than_misplaced() {
        let solver = Solver::new(3);
        let root = board("724506831");

        let misplaced = solver
            .solve(&root, Algorithm::AstarMisplaced, None)
            .unwrap();
        let manhattan = solver
            .solve(&root, Algorithm::AstarManhattan, None)
            .unwrap();
        assert!(
            manhattan.states_explored <= misplaced.states_explored,
            "dominant heuristic expanded more states ({} > {})",
            manhattan.states_explored,
            misplaced.states_explored
        );
    }

    #[test]
    fn test_unsolvable_instance_exhausts_its_component() {
        // A transposed 2x2 board; its reachable component holds 4!/2 = 12
        // of the 24 permutations.
        let solver = Solver::new(2);
        let root = board("0213");
        assert!(!root.is_solvable());

        for algorithm in Algorithm::ALL {
            let result = solver.solve(&root, algorithm, None).unwrap();
            assert_eq!(
                result.outcome,
                Outcome::Exhausted,
                "{algorithm} must prove unsolvability"
            );
            assert!(result.path.is_none());
            assert_eq!(
                result.states_explored, 12,
                "{algorithm} must sweep the whole component"
            );
        }
    }

    #[test]
    fn test_zero_budget_cancels() {
        let solver = Solver::new(4);
        let root = board("15 2 1 12 8 5 6 11 4 9 10 7 3 14 13 0");

        for algorithm in Algorithm::ALL {
            let result = solver
                .solve(&root, algorithm, Some(Duration::ZERO))
                .unwrap();
            assert_eq!(result.outcome, Outcome::Cancelled, "{algorithm}");
            assert!(result.path.is_none());
        }
    }

    #[test]
    fn test_generated_instances_solve() {
        let solver = Solver::new(3);
        for seed in [1, 7, 42] {
            let root = generate_seeded(3, seed);
            assert!(root.is_solvable(), "seed {seed} produced an unsolvable board");
            let result = solver
                .solve(&root, Algorithm::AstarManhattan, None)
                .unwrap();
            assert!(result.solved(), "seed {seed} did not solve");
            assert_valid_path(result.path.as_deref().unwrap(), &solver);
        }
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let solver = Solver::new(4);
        let small = board("102345678");
        assert!(solver.solve(&small, Algorithm::Bfs, None).is_err());
    }

    #[test]
    fn test_fifo_tie_break_is_deterministic() {
        let solver = Solver::new(3);
        let root = board("724506831");
        let first = solver.solve(&root, Algorithm::AstarManhattan, None).unwrap();
        let second = solver.solve(&root, Algorithm::AstarManhattan, None).unwrap();
        assert_eq!(first.path, second.path);
        assert_eq!(first.states_explored, second.states_explored);
    }
}
