use clap::Parser;
use rushhour_solver::heuristics::HeuristicKind;
use rushhour_solver::solver::{SearchLimits, Solver};
use rushhour_solver::utils::{init_tracing, read_board_file, solution_walkthrough};
use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Solve a Rush Hour puzzle", long_about = None)]
struct Args {
    /// Heuristic guiding the A* search
    #[clap(long, value_enum, default_value_t = HeuristicKind::BlockingCars)]
    heuristic: HeuristicKind,

    /// Name of the car that has to leave through the right edge
    #[clap(short, long, default_value_t = 'r')]
    target: char,

    /// Give up after expanding this many boards
    #[clap(long)]
    max_expansions: Option<u64>,

    /// Give up after searching for this many seconds
    #[clap(long)]
    time_limit_secs: Option<u64>,

    /// Path to the puzzle file ('.' for empty cells, one character per car cell)
    puzzle_file: PathBuf,
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let board = read_board_file(&args.puzzle_file, args.target)?;
    info!(file = %args.puzzle_file.display(), cars = board.cars().len(), "Loaded puzzle");
    println!("Configuration");
    println!("{}", board);

    let limits = SearchLimits {
        max_expansions: args.max_expansions,
        time_limit: args.time_limit_secs.map(Duration::from_secs),
    };
    let solver = Solver::new(board, args.heuristic.into_heuristic())?.with_limits(limits);

    println!("Working on solving it!");
    let solution = solver.solve()?;
    info!(moves = solution.moves.len(), "Solved");

    println!("{}", solution_walkthrough(solver.board(), &solution.moves)?);
    println!("Moves: {}", solution.moves.len());
    println!("{}", solution.stats);
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_tracing("info") {
        eprintln!("{}", e);
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
