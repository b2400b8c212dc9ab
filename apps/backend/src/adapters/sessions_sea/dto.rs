//! DTOs for sessions_sea adapter.

use sea_orm::FromQueryResult;

use crate::domain::Marker;

/// DTO for inserting a new session row. All columns hold their storage encodings.
#[derive(Debug, Clone)]
pub struct SessionCreate {
    pub board: String,
    pub turn: String,
    pub status: String,
    pub moves: String,
    pub move_count: i32,
    pub player_x_id: Option<i64>,
    pub player_o_id: Option<i64>,
}

/// Replacement state for a session, applied only if the stored version still
/// equals `expected_version`. The version is bumped by exactly one on success.
///
/// `winner` names the winning side; the row's seat for that side becomes
/// `winner_id`.
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub id: i64,
    pub expected_version: i32,
    pub board: String,
    pub turn: String,
    pub status: String,
    pub moves: String,
    pub move_count: i32,
    pub winner: Option<Marker>,
}

/// Fill the empty `marker` seat, guarded by `expected_version`.
#[derive(Debug, Clone, Copy)]
pub struct SeatAssignment {
    pub id: i64,
    pub expected_version: i32,
    pub marker: Marker,
    pub player_id: i64,
}

/// One row of the grouped winner query.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct WinnerAggregate {
    pub player_id: i64,
    pub username: String,
    pub win_count: i64,
    pub total_moves: i64,
}
