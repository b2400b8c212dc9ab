//! In-process store implementing both store contracts.
//!
//! Holds the same compare-and-swap semantics as the SeaORM stores under a
//! single mutex, so services can be exercised without a database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use time::OffsetDateTime;

use super::players::{Player, PlayerStore};
use super::sessions::{NewSession, Session, SessionStore, WinnerRanking, WinnerStats};
use crate::domain::{Marker, SessionState};
use crate::errors::domain::{ConflictKind, DomainError};

#[derive(Debug, Default)]
struct Tables {
    sessions: BTreeMap<i64, Session>,
    players: BTreeMap<i64, Player>,
    next_session_id: i64,
    next_player_id: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn insert(&self, new: NewSession) -> Result<Session, DomainError> {
        let initial = SessionState::new();
        let now = OffsetDateTime::now_utc();

        let mut tables = self.inner.lock();
        tables.next_session_id += 1;
        let session = Session {
            id: tables.next_session_id,
            board: initial.board,
            turn: initial.turn,
            status: initial.status,
            moves: initial.moves,
            version: 0,
            player_x: new.player_x,
            player_o: new.player_o,
            created_at: now,
            updated_at: now,
        };
        tables.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn load(&self, id: i64) -> Result<Option<Session>, DomainError> {
        Ok(self.inner.lock().sessions.get(&id).cloned())
    }

    async fn compare_and_swap(
        &self,
        id: i64,
        expected_version: i32,
        next: &SessionState,
    ) -> Result<Session, DomainError> {
        let mut tables = self.inner.lock();
        let stored = tables
            .sessions
            .get_mut(&id)
            .ok_or_else(|| DomainError::session_not_found(id))?;

        if stored.version != expected_version {
            return Err(DomainError::version_conflict(
                expected_version,
                stored.version,
            ));
        }

        stored.board = next.board;
        stored.turn = next.turn;
        stored.status = next.status;
        stored.moves = next.moves.clone();
        stored.version += 1;
        stored.updated_at = OffsetDateTime::now_utc();
        Ok(stored.clone())
    }

    async fn assign_seat(
        &self,
        id: i64,
        expected_version: i32,
        marker: Marker,
        player_id: i64,
    ) -> Result<Session, DomainError> {
        let mut tables = self.inner.lock();
        let stored = tables
            .sessions
            .get_mut(&id)
            .ok_or_else(|| DomainError::session_not_found(id))?;

        let seat = match marker {
            Marker::X => &mut stored.player_x,
            Marker::O => &mut stored.player_o,
        };
        if stored.version != expected_version || seat.is_some() {
            return Err(DomainError::version_conflict(
                expected_version,
                stored.version,
            ));
        }

        *seat = Some(player_id);
        stored.version += 1;
        stored.updated_at = OffsetDateTime::now_utc();
        Ok(stored.clone())
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Session>, DomainError> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .inner
            .lock()
            .sessions
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn winner_stats(
        &self,
        ranking: WinnerRanking,
        limit: u64,
    ) -> Result<Vec<WinnerStats>, DomainError> {
        let tables = self.inner.lock();

        let mut by_player: BTreeMap<i64, WinnerStats> = BTreeMap::new();
        for session in tables.sessions.values() {
            let Some(player_id) = session.winning_player() else {
                continue;
            };
            // inner join: wins by a player who no longer exists drop out
            let Some(player) = tables.players.get(&player_id) else {
                continue;
            };
            let stats = by_player.entry(player_id).or_insert_with(|| WinnerStats {
                player_id,
                username: player.username.clone(),
                wins: 0,
                total_moves: 0,
            });
            stats.wins += 1;
            stats.total_moves += session.moves.len() as u64;
        }

        let mut ranked: Vec<WinnerStats> = by_player.into_values().collect();
        match ranking {
            WinnerRanking::MostWins => ranked.sort_by(|a, b| {
                b.wins.cmp(&a.wins).then(a.player_id.cmp(&b.player_id))
            }),
            WinnerRanking::FewestMoves => ranked.sort_by(|a, b| {
                a.mean_moves()
                    .total_cmp(&b.mean_moves())
                    .then(a.player_id.cmp(&b.player_id))
            }),
        }
        ranked.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(ranked)
    }
}

#[async_trait]
impl PlayerStore for InMemoryStore {
    async fn insert(&self, username: &str) -> Result<Player, DomainError> {
        let mut tables = self.inner.lock();
        if tables.players.values().any(|p| p.username == username) {
            return Err(DomainError::conflict(
                ConflictKind::UsernameTaken,
                "Username already taken",
            ));
        }

        tables.next_player_id += 1;
        let player = Player {
            id: tables.next_player_id,
            username: username.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        tables.players.insert(player.id, player.clone());
        Ok(player)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Player>, DomainError> {
        Ok(self.inner.lock().players.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Player>, DomainError> {
        Ok(self
            .inner
            .lock()
            .players
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Player>, DomainError> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .inner
            .lock()
            .players
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
