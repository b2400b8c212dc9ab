//! Player store contract and its SeaORM implementation.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::adapters::players_sea as players_adapter;
use crate::entities::players;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: i64,
    pub username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<players::Model> for Player {
    fn from(model: players::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            created_at: model.created_at,
        }
    }
}

/// Persistence contract for players. `insert` fails with
/// `Conflict(UsernameTaken)` when the username is already registered.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn insert(&self, username: &str) -> Result<Player, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Player>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Player>, DomainError>;

    /// Players ordered by id.
    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Player>, DomainError>;
}

#[derive(Debug, Clone)]
pub struct PlayerStoreSea {
    db: DatabaseConnection,
}

impl PlayerStoreSea {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlayerStore for PlayerStoreSea {
    async fn insert(&self, username: &str) -> Result<Player, DomainError> {
        let model = players_adapter::create_player(&self.db, username).await?;
        Ok(Player::from(model))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Player>, DomainError> {
        let model = players_adapter::find_by_id(&self.db, id).await?;
        Ok(model.map(Player::from))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Player>, DomainError> {
        let model = players_adapter::find_by_username(&self.db, username).await?;
        Ok(model.map(Player::from))
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Player>, DomainError> {
        let models = players_adapter::list(&self.db, offset, limit).await?;
        Ok(models.into_iter().map(Player::from).collect())
    }
}
