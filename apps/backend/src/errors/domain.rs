//! Domain-level error type used across services and adapters.
//!
//! This error type is HTTP- and DB-agnostic. Handlers should return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the provided `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::domain::{BoardParseError, MoveRejection};

/// Validation kinds: the caller sent something the rules refuse.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    OutOfBounds,
    OutOfTurn,
    CellOccupied,
    GameConcluded,
    NotSeated,
    /// Joining a session the player already sits in.
    AlreadySeated,
    InvalidSeats,
    InvalidUsername,
    Other(String),
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    DataCorruption,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Session,
    Player,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// The stored version moved past the one the caller expected.
    OptimisticLock,
    UsernameTaken,
    /// Both seats are taken.
    SessionFull,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn validation_other(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::Validation(ValidationKind::Other(detail.clone()), detail)
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    pub fn session_not_found(id: i64) -> Self {
        Self::not_found(NotFoundKind::Session, format!("Session {id} not found"))
    }

    pub fn version_conflict(expected: i32, actual: i32) -> Self {
        Self::conflict(
            ConflictKind::OptimisticLock,
            format!(
                "Resource was modified concurrently (expected version {expected}, actual version {actual}). Please refresh and retry."
            ),
        )
    }

    /// True for stale-version conflicts, which callers may resolve by re-fetching.
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, DomainError::Conflict(ConflictKind::OptimisticLock, _))
    }
}

impl From<MoveRejection> for DomainError {
    fn from(rejection: MoveRejection) -> Self {
        let kind = match rejection {
            MoveRejection::OutOfBounds => ValidationKind::OutOfBounds,
            MoveRejection::OutOfTurn => ValidationKind::OutOfTurn,
            MoveRejection::CellOccupied => ValidationKind::CellOccupied,
            MoveRejection::GameConcluded => ValidationKind::GameConcluded,
        };
        DomainError::validation(kind, rejection.to_string())
    }
}

/// Stored rows that no longer decode are corruption, not client error.
impl From<BoardParseError> for DomainError {
    fn from(e: BoardParseError) -> Self {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("stored session is malformed: {e}"),
        )
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        crate::infra::db_errors::map_db_err(e)
    }
}
