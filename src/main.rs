//! Sliding-Tile Puzzle Solver
//!
//! Generates solvable N-puzzle instances and solves them with a chosen
//! search strategy, printing the move count, states explored and timing
//! for each run.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use taquin::board::{MAX_SIZE, MIN_SIZE};
use taquin::generate::generate_seeded;
use taquin::{generate, Algorithm, Board, Outcome, Solver};

/// Solves sliding-tile puzzles with interchangeable search strategies.
#[derive(Parser)]
#[command(name = "taquin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a random solvable instance.
    Generate {
        /// Board edge length.
        #[arg(short, long, default_value_t = 3)]
        size: usize,
        /// Seed for a reproducible instance.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Solve one instance with one strategy.
    Solve {
        /// Initial state: digits ("724506831") or numbers ("7 2 4 ...").
        state: String,
        #[arg(short, long, value_enum, default_value = "astar-manhattan")]
        algorithm: AlgoArg,
        /// Give up after this many milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Print every board along the path.
        #[arg(long)]
        show_path: bool,
    },
    /// Run all four strategies on one instance.
    Compare {
        /// Initial state; a random instance is generated when omitted.
        state: Option<String>,
        /// Board edge length for the generated instance.
        #[arg(short, long, default_value_t = 3)]
        size: usize,
        /// Give up after this many milliseconds per strategy.
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Seed for a reproducible generated instance.
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Strategy names as accepted on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum AlgoArg {
    Bfs,
    Ids,
    AstarMisplaced,
    AstarManhattan,
}

impl From<AlgoArg> for Algorithm {
    fn from(arg: AlgoArg) -> Self {
        match arg {
            AlgoArg::Bfs => Algorithm::Bfs,
            AlgoArg::Ids => Algorithm::Ids,
            AlgoArg::AstarMisplaced => Algorithm::AstarMisplaced,
            AlgoArg::AstarManhattan => Algorithm::AstarManhattan,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate { size, seed } => run_generate(size, seed),
        Command::Solve {
            state,
            algorithm,
            timeout_ms,
            show_path,
        } => run_solve(
            &state,
            algorithm.into(),
            timeout_ms.map(Duration::from_millis),
            show_path,
        ),
        Command::Compare {
            state,
            size,
            timeout_ms,
            seed,
        } => run_compare(
            state.as_deref(),
            size,
            timeout_ms.map(Duration::from_millis),
            seed,
        ),
    }
}

/// Prints a fresh instance and its parseable state string.
fn run_generate(size: usize, seed: Option<u64>) -> Result<()> {
    let board = make_instance(size, seed)?;
    println!("{board}");
    println!();
    println!("state: {}", state_string(&board));
    Ok(())
}

/// Solves one instance and prints the run summary.
fn run_solve(
    state: &str,
    algorithm: Algorithm,
    budget: Option<Duration>,
    show_path: bool,
) -> Result<()> {
    let board: Board = state.parse().context("invalid initial state")?;
    let solver = Solver::new(board.size());
    let result = solver.solve(&board, algorithm, budget)?;

    println!("Algorithm: {algorithm}");
    println!("Time: {:?}", result.elapsed);
    println!("States Explored: {}", result.states_explored);

    match result.outcome {
        Outcome::Solved => {
            if let Some(path) = &result.path {
                println!("Shortest Path: {} steps", path.len() - 1);
                if show_path {
                    for step in path {
                        println!();
                        println!("{step}");
                    }
                }
            }
        }
        Outcome::Exhausted => println!("This puzzle is unsolvable."),
        Outcome::Cancelled => println!("Gave up: time budget exhausted."),
    }
    Ok(())
}

/// Runs every strategy on one instance, one summary row each.
fn run_compare(
    state: Option<&str>,
    size: usize,
    budget: Option<Duration>,
    seed: Option<u64>,
) -> Result<()> {
    let board: Board = match state {
        Some(s) => s.parse().context("invalid initial state")?,
        None => make_instance(size, seed)?,
    };
    println!("{board}");
    println!();

    let solver = Solver::new(board.size());
    for algorithm in Algorithm::ALL {
        let result = solver.solve(&board, algorithm, budget)?;
        let status = match result.outcome {
            Outcome::Solved => format!("{} steps", result.moves().unwrap_or(0)),
            Outcome::Exhausted => "unsolvable".to_string(),
            Outcome::Cancelled => "timed out".to_string(),
        };
        println!(
            "{:<26} {:>10} explored  {:>12}  {}",
            algorithm.to_string(),
            result.states_explored,
            format!("{:?}", result.elapsed),
            status
        );
    }
    Ok(())
}

fn make_instance(size: usize, seed: Option<u64>) -> Result<Board> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
        bail!("board size must be in {MIN_SIZE}..={MAX_SIZE}");
    }
    Ok(match seed {
        Some(s) => generate_seeded(size, s),
        None => generate(size),
    })
}

/// Formats a board as a state string `solve` accepts back.
fn state_string(board: &Board) -> String {
    let cells = board.cells();
    if cells.len() <= 10 {
        cells.iter().map(|&v| char::from(b'0' + v)).collect()
    } else {
        cells
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_string_roundtrips() {
        let small: Board = "724506831".parse().unwrap();
        assert_eq!(state_string(&small), "724506831");

        let large: Board = "15 2 1 12 8 5 6 11 4 9 10 7 3 14 13 0".parse().unwrap();
        let reparsed: Board = state_string(&large).parse().unwrap();
        assert_eq!(reparsed, large);
    }
}
