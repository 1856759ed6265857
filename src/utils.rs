use crate::engine::{Board, BoardError, Coord, Move, Placement, EMPTY_CELL};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing_subscriber::prelude::*;

/// Installs the `tracing` subscriber used by the binaries.
///
/// The filter comes from `RUST_LOG`, falling back to `default_filter`. Events are
/// written to stderr so they never mix with the solution printed on stdout.
pub fn init_tracing(default_filter: &str) -> Result<(), String> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_filter))
        .map_err(|e| format!("Invalid log filter: {}", e))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| format!("Failed to install log subscriber: {}", e))
}

/// Parses rows of puzzle text into a `Board`.
///
/// Each string slice is one row of the board, starting from the top (row 0).
/// Rows are trimmed and blank rows are skipped. Within a row:
/// - `'.'` is an empty cell,
/// - any letter or digit is a cell of the car with that name.
///
/// Any other character results in an error. The car named `target` becomes the
/// target car; the board is still built if no car has that name.
///
/// # Arguments
/// * `s`: A slice of string slices (`&[&str]`) representing the rows of the board.
/// * `target`: Name of the car that has to reach the exit.
///
/// # Returns
/// * `Ok(Board)` if parsing is successful.
/// * `Err(BoardError)` if:
///     - There are no non-blank rows (`EmptyBoard`).
///     - A row differs in length from the first row (`RaggedRows`).
///     - An unrecognized character is encountered (`UnrecognizedCharacter`).
///     - A car's cells do not form a valid car, or the layout is invalid.
///
/// # Examples
/// ```
/// use rushhour_solver::engine::{Coord, Orientation};
/// use rushhour_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["..A", "rrA", "..."], 'r').unwrap();
/// assert_eq!(board.width(), 3);
/// assert_eq!(board.height(), 3);
/// let a = board.car('A').unwrap();
/// assert_eq!(a.orientation(), Orientation::Vertical);
/// assert_eq!(a.origin(), Coord::new(2, 0));
/// assert!(board.car('r').unwrap().is_target());
///
/// assert!(board_from_str_array(&["rr#"], 'r').is_err());
/// ```
pub fn board_from_str_array(s: &[&str], target: char) -> Result<Board, BoardError> {
    let rows: Vec<&str> = s
        .iter()
        .map(|row| row.trim())
        .filter(|row| !row.is_empty())
        .collect();

    let width = match rows.first() {
        Some(first) => first.chars().count(),
        None => return Err(BoardError::EmptyBoard),
    };

    // BTreeMap keeps the placements in name order.
    let mut cells_by_name: BTreeMap<char, Vec<Coord>> = BTreeMap::new();
    for (r, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != width {
            return Err(BoardError::RaggedRows {
                row: r,
                expected: width,
                found,
            });
        }

        for (c, ch) in row.chars().enumerate() {
            if ch == EMPTY_CELL {
                continue;
            }
            if !ch.is_ascii_alphanumeric() {
                return Err(BoardError::UnrecognizedCharacter { ch, row: r, col: c });
            }
            cells_by_name.entry(ch).or_default().push(Coord::new(c, r));
        }
    }

    let placements: Vec<Placement> = cells_by_name
        .into_iter()
        .map(|(name, cells)| Placement { name, cells })
        .collect();
    Board::from_placements(width, rows.len(), &placements, target)
}

/// Reads a puzzle file and parses it with [`board_from_str_array`].
pub fn read_board_file(path: &Path, target: char) -> Result<Board, BoardError> {
    let content = fs::read_to_string(path)
        .map_err(|e| BoardError::Io(format!("{}: {}", path.display(), e)))?;
    let lines: Vec<&str> = content.lines().collect();
    board_from_str_array(&lines, target)
}

/// Formats a step-by-step guide through a solution.
///
/// The first line lists all moves separated by `"; "`. Then, for each move, a
/// `MOVE <car> <direction>` line is followed by the board after that move.
///
/// # Returns
/// * `Err(BoardError)` if a move cannot be applied to the board it is replayed on.
pub fn solution_walkthrough(board: &Board, moves: &[Move]) -> Result<String, BoardError> {
    let mut output = moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join("; ");

    let mut current = board.clone();
    for mv in moves {
        current = current.apply(*mv)?;
        output.push_str(&format!("\nMOVE {}\n", mv));
        output.push_str(&current.to_string());
    }
    Ok(output)
}
