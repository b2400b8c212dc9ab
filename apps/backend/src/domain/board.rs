//! Board, cell and marker types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::BoardParseError;

/// Side length of the grid.
pub const BOARD_SIZE: usize = 3;
/// Total number of cells.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Marker {
    X,
    O,
}

impl Marker {
    pub fn opponent(self) -> Self {
        match self {
            Marker::X => Marker::O,
            Marker::O => Marker::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Marker::X => 'X',
            Marker::O => 'O',
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Marker {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "X" | "x" => Ok(Marker::X),
            "O" | "o" => Ok(Marker::O),
            other => Err(BoardParseError::InvalidMarker(other.to_string())),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn marker(self) -> Option<Marker> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Marker::X),
            Cell::O => Some(Marker::O),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }
}

impl From<Marker> for Cell {
    fn from(marker: Marker) -> Self {
        match marker {
            Marker::X => Cell::X,
            Marker::O => Cell::O,
        }
    }
}

/// A cell coordinate that is known to be on the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    /// Returns `None` when either coordinate falls outside `0..3`.
    pub fn new(row: i32, col: i32) -> Option<Self> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < BOARD_SIZE && col < BOARD_SIZE).then_some(Self { row, col })
    }

    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }
}

/// A single move as submitted by a client.
///
/// Coordinates stay signed and unchecked here; the rule evaluator is the one
/// place that decides whether they are on the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: i32,
    pub col: i32,
    pub marker: Marker,
}

impl Move {
    pub fn new(row: i32, col: i32, marker: Marker) -> Self {
        Self { row, col, marker }
    }

    pub fn position(&self) -> Option<Position> {
        Position::new(self.row, self.col)
    }
}

/// 3x3 grid, serialized as three rows of three cells.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.row][pos.col]
    }

    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Returns a copy with `pos` set to `cell`.
    pub fn with(&self, pos: Position, cell: Cell) -> Self {
        let mut next = *self;
        next.cells[pos.row][pos.col] = cell;
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().flatten().copied()
    }

    pub fn count(&self, marker: Marker) -> usize {
        let cell = Cell::from(marker);
        self.iter().filter(|c| *c == cell).count()
    }

    pub fn is_full(&self) -> bool {
        self.iter().all(|c| !c.is_empty())
    }

    /// X always moves first and turns alternate, so X leads O by zero or one.
    pub fn has_valid_counts(&self) -> bool {
        let x = self.count(Marker::X);
        let o = self.count(Marker::O);
        x == o || x == o + 1
    }

    /// Marker to move next on a board with valid counts.
    pub fn next_marker(&self) -> Marker {
        if self.count(Marker::X) > self.count(Marker::O) {
            Marker::O
        } else {
            Marker::X
        }
    }

    /// Board with every X and O swapped.
    pub fn relabeled(&self) -> Self {
        let mut next = *self;
        for cell in next.cells.iter_mut().flatten() {
            *cell = match *cell {
                Cell::Empty => Cell::Empty,
                Cell::X => Cell::O,
                Cell::O => Cell::X,
            };
        }
        next
    }

    /// Row-major storage encoding over `{'.', 'X', 'O'}`.
    pub fn encode(&self) -> String {
        self.iter().map(Cell::as_char).collect()
    }

    pub fn decode(s: &str) -> Result<Self, BoardParseError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != CELL_COUNT {
            return Err(BoardParseError::WrongLength(chars.len()));
        }

        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for (i, ch) in chars.into_iter().enumerate() {
            cells[i / BOARD_SIZE][i % BOARD_SIZE] = match ch {
                '.' => Cell::Empty,
                'X' => Cell::X,
                'O' => Cell::O,
                other => return Err(BoardParseError::InvalidCell(other)),
            };
        }
        Ok(Self { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}
