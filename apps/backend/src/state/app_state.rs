use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::repos::{InMemoryStore, PlayerStore, PlayerStoreSea, SessionStore, SessionStoreSea};
use crate::services::{LeaderboardService, PlayerService, SessionService};

/// Shared handles for request handlers.
///
/// Stores are trait objects so the same routes run against SeaORM or the
/// in-process store.
#[derive(Clone)]
pub struct AppState {
    /// Present only when backed by a database; used by the health probe.
    db: Option<DatabaseConnection>,
    sessions: Arc<dyn SessionStore>,
    players: Arc<dyn PlayerStore>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            sessions: Arc::new(SessionStoreSea::new(db.clone())),
            players: Arc::new(PlayerStoreSea::new(db.clone())),
            db: Some(db),
        }
    }

    /// State backed by a fresh [`InMemoryStore`]; no database.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            db: None,
            sessions: store.clone(),
            players: store,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn session_service(&self) -> SessionService {
        SessionService::new(self.sessions.clone(), self.players.clone())
    }

    pub fn player_service(&self) -> PlayerService {
        PlayerService::new(self.players.clone())
    }

    pub fn leaderboard_service(&self) -> LeaderboardService {
        LeaderboardService::new(self.sessions.clone())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .finish_non_exhaustive()
    }
}
