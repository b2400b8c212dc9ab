use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Why the rules refused a move. Display strings are surfaced to clients verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    OutOfBounds,
    OutOfTurn,
    CellOccupied,
    GameConcluded,
}

impl Display for MoveRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MoveRejection::OutOfBounds => write!(f, "coordinates out of range"),
            MoveRejection::OutOfTurn => write!(f, "not your turn"),
            MoveRejection::CellOccupied => write!(f, "cell occupied"),
            MoveRejection::GameConcluded => write!(f, "game already concluded"),
        }
    }
}

impl Error for MoveRejection {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardParseError {
    WrongLength(usize),
    InvalidCell(char),
    InvalidMarker(String),
    InvalidStatus(String),
}

impl Display for BoardParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BoardParseError::WrongLength(n) => write!(f, "board must have 9 cells, got {n}"),
            BoardParseError::InvalidCell(c) => write!(f, "invalid board cell: {c:?}"),
            BoardParseError::InvalidMarker(s) => write!(f, "invalid marker: {s:?}"),
            BoardParseError::InvalidStatus(s) => write!(f, "invalid status: {s:?}"),
        }
    }
}

impl Error for BoardParseError {}
