//! Cost-to-go estimates that steer the A* search.
//!
//! Every heuristic implements the [`Heuristic`] trait. Two are provided:
//! - [`ZeroHeuristic`]: no information at all, which turns A* into a breadth-first search.
//! - [`BlockingCarsHeuristic`]: counts the vertical cars standing between the
//!   target car and the exit.
use crate::engine::{Board, Orientation};

/// Estimates how many moves remain before a board is solved.
///
/// For the solver to return shortest solutions the estimate must never exceed
/// the true number of remaining moves.
pub trait Heuristic {
    /// Returns the estimated number of moves needed to solve `board`.
    fn calculate(&self, board: &Board) -> u32;

    /// Short human-readable name, used in logs and reports.
    fn name(&self) -> &'static str;
}

impl<H: Heuristic + ?Sized> Heuristic for Box<H> {
    fn calculate(&self, board: &Board) -> u32 {
        (**self).calculate(board)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Always estimates zero, so the search expands boards purely by path cost.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn calculate(&self, _board: &Board) -> u32 {
        0
    }

    fn name(&self) -> &'static str {
        "ZeroHeuristic"
    }
}

/// Counts the cars blocking the target car's way to the exit.
///
/// Returns 0 when the target car already touches the right edge. Otherwise
/// returns 1 (the target itself still has to move) plus the number of vertical
/// cars at or beyond the target's far-end column whose span covers the target's
/// row.
///
/// Each counted car is a distinct car that has to move at least once, so the
/// estimate stays admissible. Horizontal cars sharing the target's row are not
/// counted even though they block it too.
///
/// # Examples
/// ```
/// use rushhour_solver::heuristics::{BlockingCarsHeuristic, Heuristic};
/// use rushhour_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["....C.", "rr..C.", "......"], 'r').unwrap();
/// assert_eq!(BlockingCarsHeuristic.calculate(&board), 2);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockingCarsHeuristic;

impl Heuristic for BlockingCarsHeuristic {
    fn calculate(&self, board: &Board) -> u32 {
        // The solver never searches a board without a target.
        let Some(target) = board.target() else {
            return 0;
        };
        if board.is_solved() {
            return 0;
        }

        let far_end = target.far_end();
        let row = target.origin().y;
        let blocking = board
            .cars()
            .iter()
            .filter(|car| car.orientation() == Orientation::Vertical)
            .filter(|car| car.origin().x >= far_end.x)
            .filter(|car| car.origin().y <= row && row <= car.far_end().y)
            .count() as u32;
        1 + blocking
    }

    fn name(&self) -> &'static str {
        "BlockingCarsHeuristic"
    }
}

/// The heuristics selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum HeuristicKind {
    /// Breadth-first search.
    Zero,
    /// Count the cars in front of the target.
    BlockingCars,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 2] = [HeuristicKind::Zero, HeuristicKind::BlockingCars];

    pub fn into_heuristic(self) -> Box<dyn Heuristic> {
        match self {
            HeuristicKind::Zero => Box::new(ZeroHeuristic),
            HeuristicKind::BlockingCars => Box::new(BlockingCarsHeuristic),
        }
    }
}
