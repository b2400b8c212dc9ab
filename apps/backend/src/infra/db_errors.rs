//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; everything above them sees a
//! `DomainError` produced here, and the web layer maps that to `AppError`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::trace_ctx;

/// Prefix of the `DbErr::Custom` payload raised by a failed compare-and-swap.
pub const OPTIMISTIC_LOCK_PREFIX: &str = "OPTIMISTIC_LOCK:";
/// Prefix of the `DbErr::Custom` payload raised when a session row is missing.
pub const SESSION_NOT_FOUND_PREFIX: &str = "SESSION_NOT_FOUND:";

#[derive(serde::Serialize, serde::Deserialize)]
struct LockInfo {
    expected: i32,
    actual: i32,
}

/// Structured error for a version mismatch, decoded again by `map_db_err`.
pub fn optimistic_lock_err(expected: i32, actual: i32) -> sea_orm::DbErr {
    let payload = serde_json::to_string(&LockInfo { expected, actual })
        .unwrap_or_else(|_| "{}".to_string());
    sea_orm::DbErr::Custom(format!("{OPTIMISTIC_LOCK_PREFIX}{payload}"))
}

pub fn session_not_found_err(id: i64) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!("{SESSION_NOT_FOUND_PREFIX}{id}"))
}

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Table and column from SQLite's "UNIQUE constraint failed: table.column".
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let start = error_msg.find("UNIQUE constraint failed: ")?;
    error_msg[start + "UNIQUE constraint failed: ".len()..]
        .split_whitespace()
        .next()
}

fn unique_violation_to_conflict(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    let sqlite_hit = extract_sqlite_table_column(error_msg) == Some("players.username");
    if sqlite_hit || error_msg.contains("ux_players_username") {
        return Some((ConflictKind::UsernameTaken, "Username already taken"));
    }
    None
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(SESSION_NOT_FOUND_PREFIX) => {
            let id = msg
                .strip_prefix(SESSION_NOT_FOUND_PREFIX)
                .and_then(|raw| raw.parse::<i64>().ok());
            return match id {
                Some(id) => DomainError::session_not_found(id),
                None => DomainError::not_found(NotFoundKind::Session, "Session not found"),
            };
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(OPTIMISTIC_LOCK_PREFIX) => {
            let info = msg
                .strip_prefix(OPTIMISTIC_LOCK_PREFIX)
                .and_then(|json| serde_json::from_str::<LockInfo>(json).ok());

            if let Some(info) = info {
                warn!(
                    trace_id = %trace_id,
                    expected = info.expected,
                    actual = info.actual,
                    "Optimistic lock conflict detected"
                );
                return DomainError::version_conflict(info.expected, info.actual);
            }

            warn!(trace_id = %trace_id, "Optimistic lock conflict detected (version info unavailable)");
            return DomainError::conflict(
                ConflictKind::OptimisticLock,
                "Resource was modified concurrently; please refresh and retry",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Unique constraint violation");
        if let Some((kind, detail)) = unique_violation_to_conflict(&error_msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Foreign key constraint violation");
        return DomainError::validation_other("Foreign key constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %error_msg, "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}
