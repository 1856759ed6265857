//! A* search over Rush Hour boards.
//!
//! The frontier is a min-priority queue ordered by `f = g + h`, where `g` is the
//! board's path cost and `h` the heuristic estimate. Boards with equal priority
//! are expanded in the order they were discovered, which keeps the search
//! deterministic.
use crate::engine::{Board, BoardError, BoardKey, Move, Orientation};
use crate::heuristics::Heuristic;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Bounds on how much work a single search may do.
///
/// Hitting a bound ends the search with [`SolveError::LimitReached`], which is
/// distinct from [`SolveError::Unsolvable`]: the puzzle may still have a solution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of boards to expand.
    pub max_expansions: Option<u64>,
    /// Maximum wall-clock time to spend searching.
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    /// No bounds: the search runs until it finds a solution or runs out of boards.
    pub fn unlimited() -> Self {
        Self::default()
    }

    fn exceeded(&self, expanded: u64, elapsed: Duration) -> bool {
        self.max_expansions.map_or(false, |max| expanded >= max)
            || self.time_limit.map_or(false, |limit| elapsed >= limit)
    }
}

/// Counters collected while searching.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Boards whose successors were generated.
    pub expanded: u64,
    /// Successor boards produced, including those discarded as duplicates.
    pub generated: u64,
    /// Boards pushed again because a cheaper path to them was found.
    pub reopened: u64,
    /// Frontier entries dropped on pop because a cheaper copy had been queued since.
    pub stale_skipped: u64,
    /// Largest frontier size observed.
    pub max_frontier: usize,
    /// Wall-clock time spent in the search.
    pub duration: Duration,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Boards Expanded: {}", self.expanded)?;
        writeln!(f, "  Boards Generated: {}", self.generated)?;
        writeln!(f, "  Boards Reopened: {}", self.reopened)?;
        writeln!(f, "  Stale Entries Skipped: {}", self.stale_skipped)?;
        writeln!(f, "  Max Frontier Size: {}", self.max_frontier)?;
        write!(
            f,
            "  Search Duration (secs): {:.3}",
            self.duration.as_secs_f64()
        )
    }
}

/// A solution found by the solver.
#[derive(Clone, Debug)]
pub struct Solution {
    /// The moves leading from the initial board to a solved board, in order.
    pub moves: Vec<Move>,
    pub stats: SearchStats,
}

/// Ways a search can end without a solution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// Every reachable board was explored and none is solved.
    Unsolvable { stats: SearchStats },
    /// A [`SearchLimits`] bound stopped the search first.
    LimitReached { stats: SearchStats },
}

impl SolveError {
    pub fn stats(&self) -> &SearchStats {
        match self {
            SolveError::Unsolvable { stats } | SolveError::LimitReached { stats } => stats,
        }
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Unsolvable { stats } => write!(
                f,
                "Not able to solve: all {} reachable boards explored",
                stats.expanded
            ),
            SolveError::LimitReached { stats } => write!(
                f,
                "Search limit reached after expanding {} boards",
                stats.expanded
            ),
        }
    }
}

impl Error for SolveError {}

/// A frontier entry. Ordered by priority, then by insertion sequence.
struct SearchNode {
    priority: u32,
    sequence: u64,
    moves: Vec<Move>,
    board: Board,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.priority, self.sequence).cmp(&(other.priority, other.sequence))
    }
}

/// Min-priority queue with FIFO order among equal priorities.
#[derive(Default)]
struct Frontier {
    heap: BinaryHeap<Reverse<SearchNode>>,
    next_sequence: u64,
}

impl Frontier {
    fn push(&mut self, priority: u32, moves: Vec<Move>, board: Board) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Reverse(SearchNode {
            priority,
            sequence,
            moves,
            board,
        }));
    }

    fn pop(&mut self) -> Option<SearchNode> {
        self.heap.pop().map(|Reverse(node)| node)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Solves a Rush Hour board with A* guided by a [`Heuristic`].
///
/// # Examples
/// ```
/// use rushhour_solver::engine::{Direction, Move};
/// use rushhour_solver::heuristics::ZeroHeuristic;
/// use rushhour_solver::solver::Solver;
/// use rushhour_solver::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["..A", "rrA", "...", "..."], 'r').unwrap();
/// let solution = Solver::new(board, ZeroHeuristic).unwrap().solve().unwrap();
/// assert_eq!(
///     solution.moves,
///     vec![
///         Move::new('A', Direction::Down),
///         Move::new('A', Direction::Down),
///         Move::new('r', Direction::Right),
///     ]
/// );
/// ```
pub struct Solver<H> {
    board: Board,
    heuristic: H,
    limits: SearchLimits,
}

impl<H: Heuristic> Solver<H> {
    /// Prepares a search from `board`.
    ///
    /// # Returns
    /// * `Err(BoardError::MissingTarget)` if the board has no target car.
    /// * `Err(BoardError::TargetNotHorizontal)` if the target can never reach the exit.
    pub fn new(board: Board, heuristic: H) -> Result<Self, BoardError> {
        let target = board.target().ok_or(BoardError::MissingTarget)?;
        if target.orientation() != Orientation::Horizontal {
            return Err(BoardError::TargetNotHorizontal {
                name: target.name(),
            });
        }
        Ok(Solver {
            board,
            heuristic,
            limits: SearchLimits::unlimited(),
        })
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Runs the search to completion.
    ///
    /// The first board popped from the frontier that is solved ends the search.
    /// Successors are queued when their layout has not been seen before, or when
    /// they reach a known layout with a smaller path cost than recorded; the
    /// older, more expensive entry stays in the frontier and is skipped when
    /// popped. With an admissible heuristic the returned move list is as short
    /// as possible.
    ///
    /// # Returns
    /// * `Ok(Solution)` with the moves in order (empty if the board is already solved).
    /// * `Err(SolveError::Unsolvable)` if every reachable board was explored.
    /// * `Err(SolveError::LimitReached)` if a search limit was hit first.
    pub fn solve(&self) -> Result<Solution, SolveError> {
        let started = Instant::now();
        let mut stats = SearchStats::default();
        let mut frontier = Frontier::default();
        let mut best_cost: HashMap<BoardKey, u32> = HashMap::new();

        debug!(
            heuristic = self.heuristic.name(),
            cars = self.board.cars().len(),
            "Starting search"
        );

        best_cost.insert(self.board.key(), self.board.path_cost());
        frontier.push(0, Vec::new(), self.board.clone());
        stats.max_frontier = 1;

        while let Some(SearchNode { moves, board, .. }) = frontier.pop() {
            if board.is_solved() {
                stats.duration = started.elapsed();
                debug!(
                    moves = moves.len(),
                    expanded = stats.expanded,
                    "Solution found"
                );
                return Ok(Solution { moves, stats });
            }

            let g = board.path_cost();
            if best_cost.get(&board.key()).map_or(false, |&best| g > best) {
                stats.stale_skipped += 1;
                continue;
            }

            if self.limits.exceeded(stats.expanded, started.elapsed()) {
                stats.duration = started.elapsed();
                warn!(
                    expanded = stats.expanded,
                    frontier = frontier.len(),
                    "Search limit reached"
                );
                return Err(SolveError::LimitReached { stats });
            }

            stats.expanded += 1;
            for (mv, next) in board.successors() {
                stats.generated += 1;
                let next_g = next.path_cost();
                let next_key = next.key();
                match best_cost.get(&next_key) {
                    Some(&best) if next_g >= best => continue,
                    Some(_) => stats.reopened += 1,
                    None => {}
                }
                best_cost.insert(next_key, next_g);

                let priority = next_g + self.heuristic.calculate(&next);
                let mut next_moves = Vec::with_capacity(moves.len() + 1);
                next_moves.extend_from_slice(&moves);
                next_moves.push(mv);
                frontier.push(priority, next_moves, next);
            }
            stats.max_frontier = stats.max_frontier.max(frontier.len());

            if stats.expanded % 10_000 == 0 {
                trace!(
                    expanded = stats.expanded,
                    frontier = frontier.len(),
                    depth = g,
                    "Search progress"
                );
            }
        }

        stats.duration = started.elapsed();
        debug!(expanded = stats.expanded, "Frontier exhausted");
        Err(SolveError::Unsolvable { stats })
    }
}
