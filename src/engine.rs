//! Core board model for the Rush Hour puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Car`: A named vehicle with a fixed length and orientation.
//! - `Board`: A rectangular grid of cars that validates its own layout and
//!   generates the legal successor boards reachable by one unit slide.
//! - `Move`: A single unit slide of one car, the building block of a solution.
//! - `BoardError`: Everything that can be wrong with a puzzle before a search starts.
use std::error::Error;
use std::fmt;

/// Marker used for an empty cell in the occupancy grid and in puzzle text.
pub const EMPTY_CELL: char = '.';

/// A cell position on the board: `x` is the column and `y` the row, both 0-based.
/// Row 0 is the top row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// The axis a car is aligned with, and therefore the only axis it can travel along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    /// Occupies a single row; moves left and right.
    Horizontal,
    /// Occupies a single column; moves up and down.
    Vertical,
}

impl Orientation {
    /// The two directions a car with this orientation can move in,
    /// near end first.
    pub fn directions(&self) -> [Direction; 2] {
        match self {
            Orientation::Horizontal => [Direction::Left, Direction::Right],
            Orientation::Vertical => [Direction::Up, Direction::Down],
        }
    }
}

/// Direction of a unit slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The axis this direction runs along.
    pub fn orientation(&self) -> Orientation {
        match self {
            Direction::Up | Direction::Down => Orientation::Vertical,
            Direction::Left | Direction::Right => Orientation::Horizontal,
        }
    }

    /// Lowercase name, as used in solution listings.
    ///
    /// # Examples
    ///
    /// ```
    /// use rushhour_solver::engine::Direction;
    /// assert_eq!(Direction::Right.as_str(), "right");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single unit slide of the car named `car` in `direction`.
///
/// A solution is an ordered sequence of moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub car: char,
    pub direction: Direction,
}

impl Move {
    pub fn new(car: char, direction: Direction) -> Self {
        Move { car, direction }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.car, self.direction)
    }
}

/// Errors detected while building or manipulating a board.
///
/// All of these are input problems: they are reported before a search starts
/// and are never recovered from inside the solver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardError {
    /// The puzzle has no rows, or a zero width or height.
    EmptyBoard,
    /// A puzzle row does not have the same length as the first row.
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A puzzle row contains a character that is neither a car nor an empty cell.
    UnrecognizedCharacter { ch: char, row: usize, col: usize },
    /// A car occupies fewer than two cells.
    CarTooShort { name: char },
    /// A car's cells do not form one contiguous straight line.
    MalformedCar { name: char },
    /// Two cars share a name.
    DuplicateCar { name: char },
    /// A car extends past the edge of the board.
    OutOfBounds { name: char },
    /// Two cars occupy the same cell.
    Overlap { first: char, second: char, at: Coord },
    /// No car is flagged as the target.
    MissingTarget,
    /// The target car is vertical and can never reach the exit on the right edge.
    TargetNotHorizontal { name: char },
    /// A move refers to a car that is not on the board.
    UnknownCar { name: char },
    /// A move is blocked by a wall or another car, or is off the car's axis.
    IllegalMove { mv: Move },
    /// The puzzle file could not be read.
    Io(String),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::EmptyBoard => write!(f, "Board has no cells"),
            BoardError::RaggedRows {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} cells, expected {} like the first row",
                row, found, expected
            ),
            BoardError::UnrecognizedCharacter { ch, row, col } => write!(
                f,
                "Unrecognized character '{}' in row {} col {}",
                ch, row, col
            ),
            BoardError::CarTooShort { name } => {
                write!(f, "Car '{}' must occupy at least two cells", name)
            }
            BoardError::MalformedCar { name } => write!(
                f,
                "Car '{}' does not occupy a straight contiguous line of cells",
                name
            ),
            BoardError::DuplicateCar { name } => {
                write!(f, "More than one car is named '{}'", name)
            }
            BoardError::OutOfBounds { name } => {
                write!(f, "Car '{}' extends past the edge of the board", name)
            }
            BoardError::Overlap { first, second, at } => {
                write!(f, "Cars '{}' and '{}' both occupy {}", first, second, at)
            }
            BoardError::MissingTarget => write!(f, "Board has no target car"),
            BoardError::TargetNotHorizontal { name } => write!(
                f,
                "Target car '{}' is vertical and cannot reach the exit",
                name
            ),
            BoardError::UnknownCar { name } => write!(f, "No car named '{}'", name),
            BoardError::IllegalMove { mv } => write!(f, "Illegal move: {}", mv),
            BoardError::Io(message) => write!(f, "Failed to read puzzle: {}", message),
        }
    }
}

impl Error for BoardError {}

/// A car on the board.
///
/// The shape (name, length, orientation, target flag) never changes; moving a car
/// produces a new `Car` with a different origin, see [`Car::shifted_by`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Car {
    name: char,
    origin: Coord,
    /// Offset from the origin to the far end, i.e. length - 1.
    extent: usize,
    orientation: Orientation,
    is_target: bool,
}

impl Car {
    /// Creates a car whose top-left cell is `origin`.
    ///
    /// `length` counts cells and should be at least 2; `Board::new` rejects
    /// shorter cars.
    pub fn new(
        name: char,
        origin: Coord,
        length: usize,
        orientation: Orientation,
        is_target: bool,
    ) -> Self {
        Car {
            name,
            origin,
            extent: length.saturating_sub(1),
            orientation,
            is_target,
        }
    }

    /// Builds a car from the cells it occupies in a puzzle grid.
    ///
    /// The car is horizontal when all cells share a row and span at least two
    /// columns, otherwise vertical. The origin is the top-left cell regardless of
    /// the order `cells` are given in.
    ///
    /// # Arguments
    /// * `name`: The car's identifier.
    /// * `cells`: Every cell the car occupies.
    /// * `is_target`: Whether this is the car that must reach the exit.
    ///
    /// # Returns
    /// * `Ok(Car)` if the cells form a straight contiguous line of length 2 or more.
    /// * `Err(BoardError::CarTooShort)` for fewer than two cells.
    /// * `Err(BoardError::MalformedCar)` for gaps, bends or repeated cells.
    ///
    /// # Examples
    /// ```
    /// use rushhour_solver::engine::{Car, Coord, Orientation};
    ///
    /// let car = Car::from_cells('r', &[Coord::new(0, 2), Coord::new(1, 2)], true).unwrap();
    /// assert_eq!(car.orientation(), Orientation::Horizontal);
    /// assert_eq!(car.length(), 2);
    /// assert_eq!(car.far_end(), Coord::new(1, 2));
    /// ```
    pub fn from_cells(name: char, cells: &[Coord], is_target: bool) -> Result<Car, BoardError> {
        if cells.len() < 2 {
            return Err(BoardError::CarTooShort { name });
        }

        let mut sorted = cells.to_vec();
        sorted.sort_unstable_by_key(|c| (c.y, c.x));
        let first = sorted[0];

        let same_row = sorted.iter().all(|c| c.y == first.y);
        let spans_columns = sorted.iter().any(|c| c.x != first.x);
        let orientation = if same_row && spans_columns {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };

        let car = Car::new(name, first, sorted.len(), orientation, is_target);
        if !car.cells().eq(sorted.iter().copied()) {
            return Err(BoardError::MalformedCar { name });
        }
        Ok(car)
    }

    pub fn name(&self) -> char {
        self.name
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Number of cells the car occupies.
    pub fn length(&self) -> usize {
        self.extent + 1
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_target(&self) -> bool {
        self.is_target
    }

    /// The cell at the bottom (vertical) or right (horizontal) end of the car.
    pub fn far_end(&self) -> Coord {
        match self.orientation {
            Orientation::Horizontal => Coord::new(self.origin.x + self.extent, self.origin.y),
            Orientation::Vertical => Coord::new(self.origin.x, self.origin.y + self.extent),
        }
    }

    /// Every cell the car occupies, from the origin to the far end.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let Car {
            origin,
            extent,
            orientation,
            ..
        } = *self;
        (0..=extent).map(move |offset| match orientation {
            Orientation::Horizontal => Coord::new(origin.x + offset, origin.y),
            Orientation::Vertical => Coord::new(origin.x, origin.y + offset),
        })
    }

    /// Returns a copy of this car moved `distance` cells in `direction`.
    ///
    /// No bounds or collision checks are made here; that is the board's job.
    /// Returns `None` if `direction` is off the car's axis, or if the origin
    /// would move to a negative coordinate.
    pub fn shifted_by(&self, direction: Direction, distance: usize) -> Option<Car> {
        if direction.orientation() != self.orientation {
            return None;
        }
        let Coord { x, y } = self.origin;
        let origin = match direction {
            Direction::Up => Coord::new(x, y.checked_sub(distance)?),
            Direction::Down => Coord::new(x, y + distance),
            Direction::Left => Coord::new(x.checked_sub(distance)?, y),
            Direction::Right => Coord::new(x + distance, y),
        };
        Some(Car { origin, ..*self })
    }
}

/// The cars of a puzzle as they arrive from a puzzle reader: a name and the
/// cells that name occupies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub name: char,
    pub cells: Vec<Coord>,
}

/// Content of one cell of the occupancy grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Car(char),
}

impl Cell {
    /// Converts the cell to its character representation: the car name, or `'.'`.
    ///
    /// ```
    /// use rushhour_solver::engine::Cell;
    /// assert_eq!(Cell::Car('A').to_char(), 'A');
    /// assert_eq!(Cell::Empty.to_char(), '.');
    /// ```
    pub fn to_char(&self) -> char {
        match self {
            Cell::Empty => EMPTY_CELL,
            Cell::Car(name) => *name,
        }
    }
}

/// Canonical identity of a board layout.
///
/// Built from every car's name, origin and orientation in name order. It
/// deliberately ignores the path cost, so two different move sequences that
/// reach the same arrangement produce equal keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoardKey(Vec<(char, Coord, Orientation)>);

/// A Rush Hour board: a `width` x `height` grid holding a set of cars.
///
/// Boards are immutable values. Every move yields a new board whose
/// `path_cost` is one more than its parent's.
#[derive(Clone, Debug)]
pub struct Board {
    /// Sorted by name; names are unique.
    cars: Vec<Car>,
    width: usize,
    height: usize,
    path_cost: u32,
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.cars == other.cars
    }
}

impl Eq for Board {}

impl Board {
    /// Creates a board after checking that the layout is physically possible.
    ///
    /// A board without a target car is accepted here (it simply is never solved);
    /// the solver refuses to search it.
    ///
    /// # Returns
    /// * `Ok(Board)` with a path cost of 0.
    /// * `Err(BoardError)` for zero dimensions, duplicate names, cars shorter than
    ///   two cells, cars outside the grid, or overlapping cars.
    pub fn new(mut cars: Vec<Car>, width: usize, height: usize) -> Result<Board, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::EmptyBoard);
        }

        cars.sort_by_key(|car| car.name);
        if let Some(pair) = cars.windows(2).find(|pair| pair[0].name == pair[1].name) {
            return Err(BoardError::DuplicateCar { name: pair[0].name });
        }

        let mut grid = vec![vec![Cell::Empty; width]; height];
        for car in &cars {
            if car.extent == 0 {
                return Err(BoardError::CarTooShort { name: car.name });
            }
            let far = car.far_end();
            if far.x >= width || far.y >= height {
                return Err(BoardError::OutOfBounds { name: car.name });
            }
            for cell in car.cells() {
                if let Cell::Car(first) = grid[cell.y][cell.x] {
                    return Err(BoardError::Overlap {
                        first,
                        second: car.name,
                        at: cell,
                    });
                }
                grid[cell.y][cell.x] = Cell::Car(car.name);
            }
        }

        Ok(Board {
            cars,
            width,
            height,
            path_cost: 0,
        })
    }

    /// Builds a board from externally parsed placements.
    ///
    /// The car named `target` becomes the target car. Its presence is not
    /// required here; see [`Board::new`].
    pub fn from_placements(
        width: usize,
        height: usize,
        placements: &[Placement],
        target: char,
    ) -> Result<Board, BoardError> {
        let cars = placements
            .iter()
            .map(|p| Car::from_cells(p.name, &p.cells, p.name == target))
            .collect::<Result<Vec<_>, _>>()?;
        Board::new(cars, width, height)
    }

    /// The cars on the board, in name order.
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of moves made from the initial board to reach this one.
    pub fn path_cost(&self) -> u32 {
        self.path_cost
    }

    pub fn car(&self, name: char) -> Option<&Car> {
        self.cars
            .binary_search_by_key(&name, |car| car.name)
            .ok()
            .map(|idx| &self.cars[idx])
    }

    /// The car that has to reach the exit, if the board has one.
    pub fn target(&self) -> Option<&Car> {
        self.cars.iter().find(|car| car.is_target)
    }

    /// Canonical identity of this layout, independent of how it was reached.
    pub fn key(&self) -> BoardKey {
        BoardKey(
            self.cars
                .iter()
                .map(|car| (car.name, car.origin, car.orientation))
                .collect(),
        )
    }

    /// Builds a `height` x `width` snapshot of which car, if any, covers each cell.
    ///
    /// The grid is indexed `[row][column]`.
    pub fn occupancy_grid(&self) -> Vec<Vec<Cell>> {
        let mut grid = vec![vec![Cell::Empty; self.width]; self.height];
        for car in &self.cars {
            for cell in car.cells() {
                grid[cell.y][cell.x] = Cell::Car(car.name);
            }
        }
        grid
    }

    /// Whether `car` can slide one cell in `direction` on a board whose
    /// occupancy is `grid`.
    fn can_slide(&self, grid: &[Vec<Cell>], car: &Car, direction: Direction) -> bool {
        if direction.orientation() != car.orientation {
            return false;
        }
        let origin = car.origin;
        let far = car.far_end();
        let next = match direction {
            Direction::Up => origin.y.checked_sub(1).map(|y| Coord::new(origin.x, y)),
            Direction::Down => Some(Coord::new(origin.x, far.y + 1)),
            Direction::Left => origin.x.checked_sub(1).map(|x| Coord::new(x, origin.y)),
            Direction::Right => Some(Coord::new(far.x + 1, origin.y)),
        };
        match next {
            Some(c) if c.x < self.width && c.y < self.height => grid[c.y][c.x] == Cell::Empty,
            _ => false,
        }
    }

    fn with_car_replaced(&self, idx: usize, car: Car) -> Board {
        let mut cars = self.cars.clone();
        cars[idx] = car;
        Board {
            cars,
            width: self.width,
            height: self.height,
            path_cost: self.path_cost + 1,
        }
    }

    /// Generates every board reachable from this one by a single unit slide.
    ///
    /// Each car is tried in both directions along its axis; a slide is legal
    /// when the cell just beyond the car's end in that direction lies on the
    /// board and is empty. The legality checks run against one occupancy grid
    /// of the current board, while the successor boards themselves are only
    /// built as the iterator is consumed. At most two successors per car.
    ///
    /// # Examples
    /// ```
    /// use rushhour_solver::engine::{Direction, Move};
    /// use rushhour_solver::utils::board_from_str_array;
    ///
    /// let board = board_from_str_array(&["...", "rr.", "..."], 'r').unwrap();
    /// let successors: Vec<_> = board.successors().collect();
    /// assert_eq!(successors.len(), 1);
    /// assert_eq!(successors[0].0, Move::new('r', Direction::Right));
    /// assert_eq!(successors[0].1.path_cost(), 1);
    /// ```
    pub fn successors(&self) -> impl Iterator<Item = (Move, Board)> + '_ {
        let grid = self.occupancy_grid();
        let mut legal = Vec::with_capacity(2 * self.cars.len());
        for (idx, car) in self.cars.iter().enumerate() {
            for direction in car.orientation.directions() {
                if self.can_slide(&grid, car, direction) {
                    legal.push((idx, direction));
                }
            }
        }

        legal.into_iter().filter_map(move |(idx, direction)| {
            let moved = self.cars[idx].shifted_by(direction, 1)?;
            Some((
                Move::new(moved.name, direction),
                self.with_car_replaced(idx, moved),
            ))
        })
    }

    /// Applies a single move, checking that it is legal.
    ///
    /// # Returns
    /// * `Ok(Board)` with the car moved and the path cost increased by one.
    /// * `Err(BoardError::UnknownCar)` if no car has the move's name.
    /// * `Err(BoardError::IllegalMove)` if the slide is blocked or off the car's axis.
    pub fn apply(&self, mv: Move) -> Result<Board, BoardError> {
        let idx = self
            .cars
            .iter()
            .position(|car| car.name == mv.car)
            .ok_or(BoardError::UnknownCar { name: mv.car })?;
        let car = &self.cars[idx];
        if !self.can_slide(&self.occupancy_grid(), car, mv.direction) {
            return Err(BoardError::IllegalMove { mv });
        }
        let moved = car
            .shifted_by(mv.direction, 1)
            .ok_or(BoardError::IllegalMove { mv })?;
        Ok(self.with_car_replaced(idx, moved))
    }

    /// True when the target car's far end sits in the rightmost column.
    ///
    /// A board without a target, or with a vertical target, is never solved.
    pub fn is_solved(&self) -> bool {
        self.target().map_or(false, |target| {
            target.orientation == Orientation::Horizontal && target.far_end().x == self.width - 1
        })
    }

    /// The occupancy grid as compact rows of markers, one string per row.
    ///
    /// This is the same text a puzzle file uses, so feeding it back through
    /// `utils::board_from_str_array` reproduces the board.
    pub fn to_lines(&self) -> Vec<String> {
        self.occupancy_grid()
            .iter()
            .map(|row| row.iter().map(Cell::to_char).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    /// One line per row, cell markers separated by spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.occupancy_grid() {
            let line: Vec<String> = row.iter().map(|cell| cell.to_char().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_str_array;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    const ASSIGNMENT: [&str; 6] = [
        "....AA", //
        "..BBCC", //
        "rr..EF", //
        "GGHHEF", //
        "...IEF", //
        "...IJJ", //
    ];

    fn board(rows: &[&str]) -> Board {
        board_from_str_array(rows, 'r').unwrap()
    }

    fn moved_target_cars(board: &Board) -> Vec<Car> {
        board
            .successors()
            .map(|(_, next)| *next.car('r').unwrap())
            .collect()
    }

    #[test]
    fn test_car_from_cells_horizontal() {
        let car = Car::from_cells('B', &[Coord::new(3, 1), Coord::new(2, 1)], false).unwrap();
        assert_eq!(car, Car::new('B', Coord::new(2, 1), 2, Orientation::Horizontal, false));
        assert_eq!(car.far_end(), Coord::new(3, 1));
    }

    #[test]
    fn test_car_from_cells_vertical() {
        let cells = [Coord::new(4, 2), Coord::new(4, 3), Coord::new(4, 4)];
        let car = Car::from_cells('E', &cells, false).unwrap();
        assert_eq!(car.orientation(), Orientation::Vertical);
        assert_eq!(car.length(), 3);
        assert_eq!(car.cells().collect::<Vec<_>>(), cells.to_vec());
    }

    #[test]
    fn test_car_from_cells_rejects_bad_shapes() {
        assert_eq!(
            Car::from_cells('A', &[Coord::new(0, 0)], false),
            Err(BoardError::CarTooShort { name: 'A' })
        );
        // Gap in the middle
        assert_eq!(
            Car::from_cells('A', &[Coord::new(0, 0), Coord::new(2, 0)], false),
            Err(BoardError::MalformedCar { name: 'A' })
        );
        // L shape
        let bent = [Coord::new(0, 0), Coord::new(1, 0), Coord::new(1, 1)];
        assert_eq!(
            Car::from_cells('A', &bent, false),
            Err(BoardError::MalformedCar { name: 'A' })
        );
    }

    #[test]
    fn test_shifted_by() {
        let car = Car::new('C', Coord::new(4, 1), 2, Orientation::Vertical, false);
        assert_eq!(car.shifted_by(Direction::Down, 2).unwrap().origin(), Coord::new(4, 3));
        assert_eq!(car.shifted_by(Direction::Up, 1).unwrap().origin(), Coord::new(4, 0));
        assert!(car.shifted_by(Direction::Up, 2).is_none());
        assert!(car.shifted_by(Direction::Left, 1).is_none());
        // Shifting returns a new car and leaves this one as it was
        assert_eq!(car.origin(), Coord::new(4, 1));
    }

    #[test]
    fn test_board_new_rejects_invalid_layouts() {
        let a = Car::new('A', Coord::new(0, 0), 2, Orientation::Horizontal, false);
        let b = Car::new('B', Coord::new(1, 0), 2, Orientation::Vertical, false);
        assert_eq!(
            Board::new(vec![a, b], 3, 3),
            Err(BoardError::Overlap {
                first: 'A',
                second: 'B',
                at: Coord::new(1, 0)
            })
        );
        assert_eq!(Board::new(vec![a, a], 3, 3), Err(BoardError::DuplicateCar { name: 'A' }));
        assert_eq!(Board::new(vec![a], 1, 3), Err(BoardError::OutOfBounds { name: 'A' }));
        assert_eq!(Board::new(vec![], 0, 3), Err(BoardError::EmptyBoard));
        let stub = Car::new('S', Coord::new(0, 0), 1, Orientation::Vertical, false);
        assert_eq!(Board::new(vec![stub], 3, 3), Err(BoardError::CarTooShort { name: 'S' }));
    }

    #[test]
    fn test_board_from_assignment_grid() {
        let board = board(&ASSIGNMENT);
        assert_eq!(board.cars().len(), 10);
        assert_eq!(board.width(), 6);
        assert_eq!(board.height(), 6);
        let expected = [
            Car::new('r', Coord::new(0, 2), 2, Orientation::Horizontal, true),
            Car::new('A', Coord::new(4, 0), 2, Orientation::Horizontal, false),
            Car::new('B', Coord::new(2, 1), 2, Orientation::Horizontal, false),
            Car::new('C', Coord::new(4, 1), 2, Orientation::Horizontal, false),
            Car::new('E', Coord::new(4, 2), 3, Orientation::Vertical, false),
            Car::new('F', Coord::new(5, 2), 3, Orientation::Vertical, false),
            Car::new('G', Coord::new(0, 3), 2, Orientation::Horizontal, false),
            Car::new('H', Coord::new(2, 3), 2, Orientation::Horizontal, false),
            Car::new('I', Coord::new(3, 4), 2, Orientation::Vertical, false),
            Car::new('J', Coord::new(4, 5), 2, Orientation::Horizontal, false),
        ];
        for car in &expected {
            assert!(board.cars().contains(car), "missing {:?}", car);
        }
        assert_eq!(board.target().map(Car::name), Some('r'));
    }

    #[test]
    fn test_empty_board_has_no_moves_and_is_not_solved() {
        let board = board(&["......", "......"]);
        assert!(board.cars().is_empty());
        assert_eq!(board.successors().count(), 0);
        assert!(!board.is_solved());
        assert!(board.target().is_none());
    }

    #[test]
    fn test_occupancy_grid_markers() {
        let board = board(&["..C", "rrC"]);
        let grid = board.occupancy_grid();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0], vec![Cell::Empty, Cell::Empty, Cell::Car('C')]);
        assert_eq!(grid[1], vec![Cell::Car('r'), Cell::Car('r'), Cell::Car('C')]);
    }

    #[test]
    fn test_moves_horizontal() {
        let board = board(&["......", "......", ".rr...", "......"]);
        let moved = moved_target_cars(&board);
        assert_eq!(
            moved,
            vec![
                Car::new('r', Coord::new(0, 2), 2, Orientation::Horizontal, true),
                Car::new('r', Coord::new(2, 2), 2, Orientation::Horizontal, true),
            ]
        );
    }

    #[test]
    fn test_moves_vertical() {
        let board = board(&["......", "......", ".r....", ".r....", "......", "......"]);
        let moved = moved_target_cars(&board);
        assert_eq!(
            moved,
            vec![
                Car::new('r', Coord::new(1, 1), 2, Orientation::Vertical, true),
                Car::new('r', Coord::new(1, 3), 2, Orientation::Vertical, true),
            ]
        );
    }

    #[test]
    fn test_wall_blocks_move() {
        let board = board(&["......", "......", "rr....", "......", "......", "......"]);
        let moves: Vec<Move> = board.successors().map(|(mv, _)| mv).collect();
        assert_eq!(moves, vec![Move::new('r', Direction::Right)]);
    }

    #[test]
    fn test_other_car_blocks_move() {
        let board = board(&["..A", "rrA", "..."]);
        let moves: Vec<Move> = board.successors().map(|(mv, _)| mv).collect();
        // r is boxed in by the left wall and A; only A can go down
        assert_eq!(moves, vec![Move::new('A', Direction::Down)]);
    }

    #[test]
    fn test_successors_do_not_touch_parent() {
        let board = board(&ASSIGNMENT);
        let before = board.clone();
        for (mv, next) in board.successors() {
            assert_eq!(next.path_cost(), board.path_cost() + 1);
            assert_ne!(next, board, "move {} produced an identical board", mv);
        }
        assert_eq!(board, before);
        assert_eq!(board.path_cost(), 0);
    }

    #[test]
    fn test_successors_can_be_consumed_partially() {
        let board = board(&ASSIGNMENT);
        let first = board.successors().next().unwrap();
        let again = board.successors().next().unwrap();
        assert_eq!(first.0, again.0);
        assert_eq!(first.1, again.1);
    }

    #[test]
    fn test_is_solved() {
        assert!(board(&["......", "......", "....rr"]).is_solved());
        assert!(!board(&["......", "......", "...rr."]).is_solved());
        // A vertical target never counts as solved, even against the right edge
        assert!(!board(&[".....r", ".....r"]).is_solved());
    }

    #[test]
    fn test_key_ignores_move_history() {
        let board = board(&["A.....", "A.....", "..rr..", "......"]);
        let via_a_first = board
            .apply(Move::new('A', Direction::Down))
            .and_then(|b| b.apply(Move::new('r', Direction::Right)))
            .unwrap();
        let via_r_first = board
            .apply(Move::new('r', Direction::Right))
            .and_then(|b| b.apply(Move::new('A', Direction::Down)))
            .unwrap();
        assert_eq!(via_a_first.key(), via_r_first.key());
        assert_ne!(board.key(), via_a_first.key());

        let there_and_back = board
            .apply(Move::new('r', Direction::Left))
            .and_then(|b| b.apply(Move::new('r', Direction::Right)))
            .unwrap();
        assert_eq!(there_and_back.key(), board.key());
        assert_eq!(there_and_back.path_cost(), 2);
        assert_eq!(there_and_back, board);
    }

    #[test]
    fn test_apply_rejects_illegal_moves() {
        let board = board(&["..A", "rrA", "..."]);
        let blocked = Move::new('r', Direction::Right);
        assert_eq!(board.apply(blocked), Err(BoardError::IllegalMove { mv: blocked }));
        let off_axis = Move::new('r', Direction::Up);
        assert_eq!(board.apply(off_axis), Err(BoardError::IllegalMove { mv: off_axis }));
        assert_eq!(
            board.apply(Move::new('Z', Direction::Up)),
            Err(BoardError::UnknownCar { name: 'Z' })
        );
    }

    #[test]
    fn test_display_board_formatting() {
        let board = board(&["..C", "rrC"]);
        assert_eq!(format!("{}", board), ". . C\nr r C\n");
    }

    #[test]
    fn test_to_lines_round_trip() {
        let board = board(&ASSIGNMENT);
        assert_eq!(board.to_lines(), ASSIGNMENT.to_vec());
    }

    #[test]
    fn test_random_walks_keep_boards_valid() {
        let start = board(&ASSIGNMENT);
        let mut rng = SmallRng::seed_from_u64(514514);

        for _ in 0..20 {
            let mut current = start.clone();
            for step in 0..50 {
                let successors: Vec<(Move, Board)> = current.successors().collect();
                assert!(!successors.is_empty(), "dead end after {} steps", step);
                for (mv, next) in &successors {
                    // Re-validating the successor's cars checks bounds and overlaps
                    let rebuilt = Board::new(next.cars().to_vec(), next.width(), next.height());
                    assert_eq!(rebuilt.as_ref(), Ok(next), "move {} broke the board", mv);
                    assert_eq!(current.apply(*mv).as_ref(), Ok(next));
                }
                let pick = rng.gen_range(0..successors.len());
                current = successors[pick].1.clone();
                assert_eq!(current.path_cost(), step + 1);
            }
        }
    }
}
