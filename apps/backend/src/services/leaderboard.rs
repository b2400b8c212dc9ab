//! Leaderboards computed from concluded sessions.
//!
//! Only sessions won by a seated side count. Draws and sessions without a
//! seated winner are ignored. Grouping and ranking happen in the store.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::errors::domain::DomainError;
use crate::repos::sessions::{SessionStore, WinnerRanking, WinnerStats};

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerWins {
    pub player_id: i64,
    pub username: String,
    pub win_count: u32,
}

/// `efficiency` is the mean number of moves in the sessions the player won.
/// Lower is better.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerEfficiency {
    pub player_id: i64,
    pub username: String,
    pub efficiency: f64,
}

#[derive(Clone)]
pub struct LeaderboardService {
    sessions: Arc<dyn SessionStore>,
}

impl LeaderboardService {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// Players by number of wins, descending; ties go to the lower player id.
    pub async fn top_by_wins(&self, limit: usize) -> Result<Vec<PlayerWins>, DomainError> {
        Ok(self
            .ranked(WinnerRanking::MostWins, limit)
            .await?
            .into_iter()
            .map(|stats| PlayerWins {
                player_id: stats.player_id,
                username: stats.username,
                win_count: stats.wins,
            })
            .collect())
    }

    /// Players by mean moves per win, ascending; ties go to the lower player id.
    pub async fn top_by_efficiency(
        &self,
        limit: usize,
    ) -> Result<Vec<PlayerEfficiency>, DomainError> {
        Ok(self
            .ranked(WinnerRanking::FewestMoves, limit)
            .await?
            .into_iter()
            .map(|stats| PlayerEfficiency {
                efficiency: stats.mean_moves(),
                player_id: stats.player_id,
                username: stats.username,
            })
            .collect())
    }

    async fn ranked(
        &self,
        ranking: WinnerRanking,
        limit: usize,
    ) -> Result<Vec<WinnerStats>, DomainError> {
        let limit = u64::try_from(limit).unwrap_or(u64::MAX);
        let ranked = self.sessions.winner_stats(ranking, limit).await?;
        debug!(?ranking, entries = ranked.len(), "Leaderboard computed");
        Ok(ranked)
    }
}
