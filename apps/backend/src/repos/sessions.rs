//! Session store contract and its SeaORM implementation.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use time::OffsetDateTime;

use crate::adapters::sessions_sea as sessions_adapter;
use crate::domain::{Board, GameStatus, Marker, Move, SessionState};
use crate::entities::sessions;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// Session domain model
///
/// Converted from `sessions::Model` when loaded through a store. `version`
/// starts at 0 and grows by one per accepted move.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: i64,
    pub board: Board,
    pub turn: Marker,
    pub status: GameStatus,
    pub moves: Vec<Move>,
    pub version: i32,
    pub player_x: Option<i64>,
    pub player_o: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Session {
    /// Snapshot of the parts a move can change.
    pub fn state(&self) -> SessionState {
        SessionState {
            board: self.board,
            turn: self.turn,
            status: self.status,
            moves: self.moves.clone(),
        }
    }

    /// Marker the player plays as, if seated. A player seated on both sides
    /// is never produced by the service, so X wins the tie.
    pub fn marker_for(&self, player_id: i64) -> Option<Marker> {
        if self.player_x == Some(player_id) {
            Some(Marker::X)
        } else if self.player_o == Some(player_id) {
            Some(Marker::O)
        } else {
            None
        }
    }

    pub fn player_for(&self, marker: Marker) -> Option<i64> {
        match marker {
            Marker::X => self.player_x,
            Marker::O => self.player_o,
        }
    }

    /// Seated player who won, if the session was won by a seated side.
    pub fn winning_player(&self) -> Option<i64> {
        self.status.winner().and_then(|m| self.player_for(m))
    }
}

/// Seats for a session about to be created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewSession {
    pub player_x: Option<i64>,
    pub player_o: Option<i64>,
}

/// Ordering for `SessionStore::winner_stats`. Ties go to the lower player id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinnerRanking {
    /// Win count, descending.
    MostWins,
    /// Mean moves per won session, ascending.
    FewestMoves,
}

/// Wins credited to one seated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerStats {
    pub player_id: i64,
    pub username: String,
    pub wins: u32,
    /// Moves summed over the sessions this player won.
    pub total_moves: u64,
}

impl WinnerStats {
    pub fn mean_moves(&self) -> f64 {
        self.total_moves as f64 / f64::from(self.wins.max(1))
    }
}

/// Persistence contract for sessions.
///
/// Mutations go through `compare_and_swap` and `assign_seat`: each succeeds
/// only when the stored version equals `expected_version`, and returns the
/// stored session with the version bumped by one. A mismatch is
/// `Conflict(OptimisticLock)` and a missing row is `NotFound(Session)`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, new: NewSession) -> Result<Session, DomainError>;

    async fn load(&self, id: i64) -> Result<Option<Session>, DomainError>;

    /// Sessions ordered by id.
    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Session>, DomainError>;

    async fn compare_and_swap(
        &self,
        id: i64,
        expected_version: i32,
        next: &SessionState,
    ) -> Result<Session, DomainError>;

    /// Seat `player_id` on the `marker` side. The seat must still be empty.
    async fn assign_seat(
        &self,
        id: i64,
        expected_version: i32,
        marker: Marker,
        player_id: i64,
    ) -> Result<Session, DomainError>;

    /// Per-player totals over sessions won by a seated side, ranked and
    /// truncated to `limit`. Draws and unseated wins never appear.
    async fn winner_stats(
        &self,
        ranking: WinnerRanking,
        limit: u64,
    ) -> Result<Vec<WinnerStats>, DomainError>;
}

pub(crate) fn encode_moves(moves: &[Move]) -> Result<String, DomainError> {
    serde_json::to_string(moves).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::Other("Serialization".into()),
            format!("failed to encode moves: {e}"),
        )
    })
}

fn move_count(moves: &[Move]) -> i32 {
    i32::try_from(moves.len()).unwrap_or(i32::MAX)
}

fn decode_moves(raw: &str) -> Result<Vec<Move>, DomainError> {
    serde_json::from_str(raw).map_err(|e| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("stored move history is malformed: {e}"),
        )
    })
}

impl TryFrom<sessions::Model> for Session {
    type Error = DomainError;

    fn try_from(model: sessions::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            board: Board::decode(&model.board)?,
            turn: model.turn.parse()?,
            status: model.status.parse()?,
            moves: decode_moves(&model.moves)?,
            version: model.version,
            player_x: model.player_x_id,
            player_o: model.player_o_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// SeaORM implementation of `SessionStore`, on Postgres or SQLite.
#[derive(Debug, Clone)]
pub struct SessionStoreSea {
    db: DatabaseConnection,
}

impl SessionStoreSea {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for SessionStoreSea {
    async fn insert(&self, new: NewSession) -> Result<Session, DomainError> {
        let initial = SessionState::new();
        let dto = sessions_adapter::SessionCreate {
            board: initial.board.encode(),
            turn: initial.turn.to_string(),
            status: initial.status.to_string(),
            moves: encode_moves(&initial.moves)?,
            move_count: 0,
            player_x_id: new.player_x,
            player_o_id: new.player_o,
        };
        let model = sessions_adapter::create_session(&self.db, dto).await?;
        Session::try_from(model)
    }

    async fn load(&self, id: i64) -> Result<Option<Session>, DomainError> {
        sessions_adapter::find_by_id(&self.db, id)
            .await?
            .map(Session::try_from)
            .transpose()
    }

    async fn compare_and_swap(
        &self,
        id: i64,
        expected_version: i32,
        next: &SessionState,
    ) -> Result<Session, DomainError> {
        let dto = sessions_adapter::SessionUpdate {
            id,
            expected_version,
            board: next.board.encode(),
            turn: next.turn.to_string(),
            status: next.status.to_string(),
            moves: encode_moves(&next.moves)?,
            move_count: move_count(&next.moves),
            winner: next.status.winner(),
        };
        let model = sessions_adapter::update_state(&self.db, dto).await?;
        Session::try_from(model)
    }

    async fn assign_seat(
        &self,
        id: i64,
        expected_version: i32,
        marker: Marker,
        player_id: i64,
    ) -> Result<Session, DomainError> {
        let dto = sessions_adapter::SeatAssignment {
            id,
            expected_version,
            marker,
            player_id,
        };
        let model = sessions_adapter::assign_seat(&self.db, dto).await?;
        Session::try_from(model)
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Session>, DomainError> {
        sessions_adapter::list(&self.db, offset, limit)
            .await?
            .into_iter()
            .map(Session::try_from)
            .collect()
    }

    async fn winner_stats(
        &self,
        ranking: WinnerRanking,
        limit: u64,
    ) -> Result<Vec<WinnerStats>, DomainError> {
        let rows = sessions_adapter::winner_aggregates(&self.db, ranking, limit).await?;
        Ok(rows
            .into_iter()
            .map(|row| WinnerStats {
                player_id: row.player_id,
                username: row.username,
                wins: u32::try_from(row.win_count).unwrap_or(u32::MAX),
                total_moves: u64::try_from(row.total_moves).unwrap_or_default(),
            })
            .collect())
    }
}
