//! Session engine: create, query and advance sessions through the store.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{advance, Marker, Move};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::players::PlayerStore;
use crate::repos::sessions::{NewSession, Session, SessionStore};
use crate::services::players::MAX_PAGE_SIZE;

/// Optional player ids for the two sides of a new session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Seats {
    pub x: Option<i64>,
    pub o: Option<i64>,
}

/// Session engine.
///
/// Holds no state of its own: every mutation loads the latest session,
/// consults the rules and persists through `compare_and_swap` at the version
/// the caller supplied. Losing a race surfaces as a version conflict; the
/// engine never retries on the caller's behalf.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<dyn SessionStore>,
    players: Arc<dyn PlayerStore>,
}

impl SessionService {
    pub fn new(sessions: Arc<dyn SessionStore>, players: Arc<dyn PlayerStore>) -> Self {
        Self { sessions, players }
    }

    /// Empty board, X to move, version 0, no seats.
    pub async fn create_session(&self) -> Result<Session, DomainError> {
        self.create_session_with_seats(Seats::default()).await
    }

    pub async fn create_session_with_seats(&self, seats: Seats) -> Result<Session, DomainError> {
        if let (Some(x), Some(o)) = (seats.x, seats.o) {
            if x == o {
                return Err(DomainError::validation(
                    ValidationKind::InvalidSeats,
                    "a player cannot take both seats",
                ));
            }
        }

        for player_id in [seats.x, seats.o].into_iter().flatten() {
            self.ensure_player(player_id).await?;
        }

        let session = self
            .sessions
            .insert(NewSession {
                player_x: seats.x,
                player_o: seats.o,
            })
            .await?;

        info!(
            session_id = session.id,
            player_x = ?session.player_x,
            player_o = ?session.player_o,
            "Session created"
        );
        Ok(session)
    }

    pub async fn get_session(&self, id: i64) -> Result<Session, DomainError> {
        self.sessions
            .load(id)
            .await?
            .ok_or_else(|| DomainError::session_not_found(id))
    }

    /// Page of sessions ordered by id; `limit` is clamped to `1..=100`.
    pub async fn list_sessions(&self, offset: u64, limit: u64) -> Result<Vec<Session>, DomainError> {
        self.sessions
            .list(offset, limit.clamp(1, MAX_PAGE_SIZE))
            .await
    }

    /// Seat `player_id` on the first open side, X before O.
    ///
    /// A full session is a conflict; joining a session the player already sits
    /// in, or one that has concluded, is refused. The seat is written at the
    /// version just read, so a concurrent join surfaces as a version conflict.
    pub async fn join_session(&self, id: i64, player_id: i64) -> Result<Session, DomainError> {
        let session = self.get_session(id).await?;

        let Some(marker) = [Marker::X, Marker::O]
            .into_iter()
            .find(|m| session.player_for(*m).is_none())
        else {
            return Err(DomainError::conflict(
                ConflictKind::SessionFull,
                format!("Session {id} already has two players"),
            ));
        };
        if session.marker_for(player_id).is_some() {
            return Err(DomainError::validation(
                ValidationKind::AlreadySeated,
                format!("player {player_id} already sits in session {id}"),
            ));
        }
        if session.status.is_terminal() {
            return Err(DomainError::validation(
                ValidationKind::GameConcluded,
                "game already concluded",
            ));
        }
        self.ensure_player(player_id).await?;

        let updated = self
            .sessions
            .assign_seat(id, session.version, marker, player_id)
            .await?;

        info!(
            session_id = id,
            player_id,
            marker = %marker,
            version = updated.version,
            "Player joined session"
        );
        Ok(updated)
    }

    /// Apply `mv` if the session is still at `expected_version` and the rules allow it.
    ///
    /// Only unseated sides move by bare marker. A side with a seated player
    /// moves through `submit_player_move`.
    pub async fn submit_move(
        &self,
        id: i64,
        mv: Move,
        expected_version: i32,
    ) -> Result<Session, DomainError> {
        let session = self.get_session(id).await?;
        if let Some(player_id) = session.player_for(mv.marker) {
            debug!(session_id = id, marker = %mv.marker, "Move rejected: side is seated");
            return Err(DomainError::validation(
                ValidationKind::NotSeated,
                format!(
                    "{} is held by player {player_id} in session {id}; move as that player",
                    mv.marker
                ),
            ));
        }
        self.apply(session, mv, expected_version).await
    }

    /// Play for a seated player: the seat decides the marker.
    pub async fn submit_player_move(
        &self,
        id: i64,
        player_id: i64,
        row: i32,
        col: i32,
        expected_version: i32,
    ) -> Result<Session, DomainError> {
        let session = self.get_session(id).await?;
        let marker: Marker = session.marker_for(player_id).ok_or_else(|| {
            debug!(session_id = id, player_id, "Move rejected: player not seated");
            DomainError::validation(
                ValidationKind::NotSeated,
                format!("player {player_id} is not seated in session {id}"),
            )
        })?;

        self.apply(session, Move::new(row, col, marker), expected_version)
            .await
    }

    async fn ensure_player(&self, player_id: i64) -> Result<(), DomainError> {
        match self.players.find_by_id(player_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found(
                NotFoundKind::Player,
                format!("Player {player_id} not found"),
            )),
        }
    }

    async fn apply(
        &self,
        session: Session,
        mv: Move,
        expected_version: i32,
    ) -> Result<Session, DomainError> {
        if session.version != expected_version {
            warn!(
                session_id = session.id,
                expected = expected_version,
                actual = session.version,
                "Stale session version"
            );
            return Err(DomainError::version_conflict(
                expected_version,
                session.version,
            ));
        }

        let next = advance(&session.state(), &mv).map_err(|rejection| {
            debug!(
                session_id = session.id,
                row = mv.row,
                col = mv.col,
                marker = %mv.marker,
                reason = %rejection,
                "Move rejected"
            );
            DomainError::from(rejection)
        })?;

        let updated = self
            .sessions
            .compare_and_swap(session.id, expected_version, &next)
            .await
            .inspect_err(|e| {
                if e.is_version_conflict() {
                    warn!(session_id = session.id, expected = expected_version, "Lost version race");
                }
            })?;

        info!(
            session_id = updated.id,
            version = updated.version,
            status = %updated.status,
            "Move accepted"
        );
        Ok(updated)
    }
}
