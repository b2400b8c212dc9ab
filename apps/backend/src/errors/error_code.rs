//! Error codes for the tic-tac-toe backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Move rejections
    /// Row or column outside 0..3
    OutOfBounds,
    /// Marker does not match the side to move
    OutOfTurn,
    /// Target cell already taken
    CellOccupied,
    /// Session already won or drawn
    GameConcluded,
    /// Player holds no seat in the session
    NotSeated,

    // Request validation
    /// Invalid session ID provided
    InvalidSessionId,
    /// Invalid player ID provided
    InvalidPlayerId,
    /// Username empty or too long
    InvalidUsername,
    /// Seat assignment refused
    InvalidSeats,
    /// Player already holds a seat in the session
    AlreadySeated,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,
    /// Invalid or missing HTTP header
    InvalidHeader,
    /// Move submitted without an expected version
    PreconditionRequired,

    // Resource not found
    SessionNotFound,
    PlayerNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Stored version differs from the expected one
    OptimisticLock,
    /// Username already registered
    UsernameTaken,
    /// No open seat left to join
    SessionFull,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System errors
    DbUnavailable,
    /// Database timeout (gateway timeout)
    DbTimeout,
    /// Internal server error
    InternalError,
    ConfigError,
    /// Stored data failed to decode
    DataCorruption,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfBounds => "OUT_OF_BOUNDS",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::CellOccupied => "CELL_OCCUPIED",
            Self::GameConcluded => "GAME_CONCLUDED",
            Self::NotSeated => "NOT_SEATED",

            Self::InvalidSessionId => "INVALID_SESSION_ID",
            Self::InvalidPlayerId => "INVALID_PLAYER_ID",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidSeats => "INVALID_SEATS",
            Self::AlreadySeated => "ALREADY_SEATED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidHeader => "INVALID_HEADER",
            Self::PreconditionRequired => "PRECONDITION_REQUIRED",

            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::SessionFull => "SESSION_FULL",
            Self::Conflict => "CONFLICT",

            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
