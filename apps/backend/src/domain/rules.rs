//! Pure rule evaluation: move legality and terminal status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell, Marker, Move};
use super::errors::{BoardParseError, MoveRejection};

/// Serialized in the same SCREAMING_SNAKE_CASE form as [`GameStatus::as_str`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    InProgress,
    WonByX,
    WonByO,
    Draw,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }

    pub fn won_by(marker: Marker) -> Self {
        match marker {
            Marker::X => GameStatus::WonByX,
            Marker::O => GameStatus::WonByO,
        }
    }

    pub fn winner(self) -> Option<Marker> {
        match self {
            GameStatus::WonByX => Some(Marker::X),
            GameStatus::WonByO => Some(Marker::O),
            GameStatus::InProgress | GameStatus::Draw => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::InProgress => "IN_PROGRESS",
            GameStatus::WonByX => "WON_BY_X",
            GameStatus::WonByO => "WON_BY_O",
            GameStatus::Draw => "DRAW",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(GameStatus::InProgress),
            "WON_BY_X" => Ok(GameStatus::WonByX),
            "WON_BY_O" => Ok(GameStatus::WonByO),
            "DRAW" => Ok(GameStatus::Draw),
            other => Err(BoardParseError::InvalidStatus(other.to_string())),
        }
    }
}

/// Rows, columns, then both diagonals as (row, col) triples.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Check a proposed move against the board and the marker whose turn it is.
///
/// Checks run in order: coordinates, turn, occupancy.
pub fn validate_move(board: &Board, mv: &Move, turn: Marker) -> Result<(), MoveRejection> {
    let pos = mv.position().ok_or(MoveRejection::OutOfBounds)?;

    if mv.marker != turn {
        return Err(MoveRejection::OutOfTurn);
    }

    if !board.get(pos).is_empty() {
        return Err(MoveRejection::CellOccupied);
    }

    Ok(())
}

/// Returns a new board with the move's cell taken. The input board is untouched.
///
/// Call `validate_move` first: a move whose coordinates are off the board
/// yields an unchanged copy.
pub fn apply_move(board: &Board, mv: &Move) -> Board {
    match mv.position() {
        Some(pos) => board.with(pos, Cell::from(mv.marker)),
        None => *board,
    }
}

/// Marker holding a complete line, if any.
pub fn winner(board: &Board) -> Option<Marker> {
    LINES.iter().find_map(|line| {
        let [a, b, c] = line.map(|(row, col)| board.rows()[row][col]);
        if a == b && b == c {
            a.marker()
        } else {
            None
        }
    })
}

pub fn evaluate_status(board: &Board) -> GameStatus {
    if let Some(marker) = winner(board) {
        return GameStatus::won_by(marker);
    }
    if board.is_full() {
        GameStatus::Draw
    } else {
        GameStatus::InProgress
    }
}
