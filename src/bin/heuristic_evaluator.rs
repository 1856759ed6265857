use clap::Parser;
use rushhour_solver::heuristics::HeuristicKind;
use rushhour_solver::solver::{SearchLimits, Solver};
use rushhour_solver::utils::{init_tracing, read_board_file};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare heuristics on Rush Hour puzzles", long_about = None)]
struct Args {
    /// Name of the target car in every puzzle
    #[clap(short, long, default_value_t = 'r')]
    target: char,

    /// Give up on a puzzle after expanding this many boards
    #[clap(long)]
    max_expansions: Option<u64>,

    /// Give up on a puzzle after searching for this many seconds
    #[clap(long)]
    time_limit_secs: Option<u64>,

    /// Puzzle files to evaluate
    #[clap(required = true)]
    puzzle_files: Vec<PathBuf>,
}

impl Args {
    fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_expansions: self.max_expansions,
            time_limit: self.time_limit_secs.map(Duration::from_secs),
        }
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_tracing("warn") {
        eprintln!("{}", e);
        process::exit(1);
    }

    let limits = args.limits();
    // Per heuristic: (puzzles solved, total boards expanded on solved puzzles)
    let mut totals: BTreeMap<&str, (usize, u64)> = BTreeMap::new();

    println!(
        "Starting heuristic evaluation for {} puzzles...",
        args.puzzle_files.len()
    );

    for path in &args.puzzle_files {
        let board = match read_board_file(path, args.target) {
            Ok(board) => board,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping puzzle");
                continue;
            }
        };
        println!("\nEvaluating {}", path.display());

        let mut lengths = Vec::new();
        for kind in HeuristicKind::ALL {
            let heuristic = kind.into_heuristic();
            let name = heuristic.name();
            let solver = match Solver::new(board.clone(), heuristic) {
                Ok(solver) => solver.with_limits(limits),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping puzzle");
                    break;
                }
            };

            match solver.solve() {
                Ok(solution) => {
                    println!(
                        "  Heuristic: {:<22}, Moves: {:<4}, Expanded: {}",
                        name,
                        solution.moves.len(),
                        solution.stats.expanded
                    );
                    let entry = totals.entry(name).or_insert((0, 0));
                    entry.0 += 1;
                    entry.1 += solution.stats.expanded;
                    lengths.push(solution.moves.len());
                }
                Err(e) => println!("  Heuristic: {:<22}, {}", name, e),
            }
        }

        if lengths.windows(2).any(|pair| pair[0] != pair[1]) {
            warn!(file = %path.display(), ?lengths, "Heuristics disagree on solution length");
        }
        info!(file = %path.display(), "Evaluated");
    }

    println!("\n--- Evaluation Complete ---");
    for (name, (solved, expanded)) in &totals {
        let average = if *solved == 0 {
            0.0
        } else {
            *expanded as f64 / *solved as f64
        };
        println!(
            "Heuristic {:<22}: Solved = {}, Average Expanded = {:.2}",
            name, solved, average
        );
    }
}
