//! The session state machine, expressed as a pure function over state snapshots.

use serde::{Deserialize, Serialize};

use super::board::{Board, Marker, Move};
use super::errors::MoveRejection;
use super::rules::{apply_move, evaluate_status, validate_move, GameStatus};

/// The mutable part of a session: everything a move can change except the version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub board: Board,
    pub turn: Marker,
    pub status: GameStatus,
    pub moves: Vec<Move>,
}

impl SessionState {
    /// Empty board, X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Marker::X,
            status: GameStatus::InProgress,
            moves: Vec::new(),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the state that follows `mv`, or the reason it is refused.
///
/// The input is never modified, so a caller that loses a version race can
/// recompute from a fresh snapshot.
pub fn advance(state: &SessionState, mv: &Move) -> Result<SessionState, MoveRejection> {
    if state.status.is_terminal() {
        return Err(MoveRejection::GameConcluded);
    }

    validate_move(&state.board, mv, state.turn)?;

    let board = apply_move(&state.board, mv);
    let status = evaluate_status(&board);
    let turn = if status.is_terminal() {
        state.turn
    } else {
        state.turn.opponent()
    };

    let mut moves = Vec::with_capacity(state.moves.len() + 1);
    moves.extend_from_slice(&state.moves);
    moves.push(*mv);

    Ok(SessionState {
        board,
        turn,
        status,
        moves,
    })
}

/// Replay a move list from the empty board.
pub fn replay(moves: &[Move]) -> Result<SessionState, MoveRejection> {
    moves
        .iter()
        .try_fold(SessionState::new(), |state, mv| advance(&state, mv))
}
