//! Player registry.

use std::sync::Arc;

use tracing::info;

use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::repos::players::{Player, PlayerStore};

pub const MAX_USERNAME_CHARS: usize = 32;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Clone)]
pub struct PlayerService {
    players: Arc<dyn PlayerStore>,
}

impl PlayerService {
    pub fn new(players: Arc<dyn PlayerStore>) -> Self {
        Self { players }
    }

    /// Register a player. The username is trimmed before it is checked and stored.
    pub async fn create_player(&self, username: &str) -> Result<Player, DomainError> {
        let username = normalize_username(username)?;
        let player = self.players.insert(username).await?;
        info!(player_id = player.id, "Player created");
        Ok(player)
    }

    pub async fn get_player(&self, id: i64) -> Result<Player, DomainError> {
        self.players.find_by_id(id).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Player, format!("Player {id} not found"))
        })
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Player>, DomainError> {
        self.players.find_by_username(username.trim()).await
    }

    /// Page of players ordered by id; `limit` is clamped to `1..=100`.
    pub async fn list_players(&self, offset: u64, limit: u64) -> Result<Vec<Player>, DomainError> {
        self.players
            .list(offset, limit.clamp(1, MAX_PAGE_SIZE))
            .await
    }
}

fn normalize_username(raw: &str) -> Result<&str, DomainError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            "username must not be blank",
        ));
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(DomainError::validation(
            ValidationKind::InvalidUsername,
            format!("username must be at most {MAX_USERNAME_CHARS} characters"),
        ));
    }
    Ok(username)
}
