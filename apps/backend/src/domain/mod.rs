//! Domain layer: pure tic-tac-toe types and rules.

pub mod board;
pub mod errors;
pub mod rules;
pub mod transition;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_transition;

// Re-exports for ergonomics
pub use board::{Board, Cell, Marker, Move, Position};
pub use errors::{BoardParseError, MoveRejection};
pub use rules::{apply_move, evaluate_status, validate_move, GameStatus};
pub use transition::{advance, replay, SessionState};
