//! Domain services: the session engine, player registry and leaderboards.

pub mod leaderboard;
pub mod players;
pub mod sessions;

#[cfg(test)]
mod tests_leaderboard;
#[cfg(test)]
mod tests_sessions;

pub use leaderboard::{LeaderboardService, PlayerEfficiency, PlayerWins, DEFAULT_LEADERBOARD_LIMIT};
pub use players::PlayerService;
pub use sessions::{Seats, SessionService};
