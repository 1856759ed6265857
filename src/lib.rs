//! # Rush Hour Solver Library
//!
//! This library provides the board model for the Rush Hour sliding-block puzzle
//! and an A* solver that finds the shortest sequence of unit slides freeing the
//! target car through the right edge of the board.
//!
//! It is used by two binaries:
//! - `rushhour`: Reads a puzzle file, solves it with the chosen heuristic and
//!   prints a step-by-step walkthrough of the solution.
//! - `heuristic_evaluator`: Solves one or more puzzles with every heuristic and
//!   compares solution lengths and search effort.
//!
//! ## Modules
//! - `engine`: Cars, boards, moves, legal-move generation and board validation errors.
//! - `heuristics`: The `Heuristic` trait and its implementations.
//! - `solver`: The A* search (`Solver`), search limits and statistics.
//! - `utils`: Reading puzzles from text and formatting solutions.

pub mod engine;
pub mod heuristics;
pub mod solver;
pub mod utils;
