//! ETag helpers for optimistic concurrency control.
//!
//! A session's ETag carries its version, so clients can echo it back in
//! `If-Match` when submitting a move and in `If-None-Match` when polling.

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Generate an ETag for a session resource.
///
/// Format: `"session-{id}-v{version}"` (with quotes, as required by HTTP)
///
/// # Example
/// ```
/// # use tictactoe_backend::http::etag::session_etag;
/// assert_eq!(session_etag(123, 5), r#""session-123-v5""#);
/// ```
pub fn session_etag(id: i64, version: i32) -> String {
    format!(r#""session-{id}-v{version}""#)
}

/// Parse the version from an ETag for session `session_id`.
///
/// Accepts `"session-{id}-v{version}"`, quoted or bare, with an optional
/// weak prefix `W/`.
///
/// # Errors
/// `AppError::bad_request` with `ErrorCode::InvalidHeader` when the value is
/// malformed, names another session, or the version is not an integer.
pub fn parse_session_version_from_etag(s: &str, session_id: i64) -> Result<i32, AppError> {
    let s = s.trim();
    let s = s.strip_prefix("W/").unwrap_or(s).trim_matches('"');

    let rest = s.strip_prefix("session-").ok_or_else(|| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid ETag format: expected \"session-{{id}}-v{{version}}\", got: \"{s}\""),
        )
    })?;

    let (id_str, version_str) = rest.rsplit_once("-v").ok_or_else(|| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid ETag format: missing version marker, got: \"{s}\""),
        )
    })?;

    if id_str.parse::<i64>().ok() != Some(session_id) {
        return Err(AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("ETag \"{s}\" does not belong to session {session_id}"),
        ));
    }

    version_str.parse::<i32>().map_err(|_| {
        AppError::bad_request(
            ErrorCode::InvalidHeader,
            format!("Invalid ETag format: version must be a valid integer, got: \"{version_str}\""),
        )
    })
}

/// True when an `If-None-Match` value matches `etag` (`*` or any listed tag).
pub fn if_none_match_matches(header_value: &str, etag: &str) -> bool {
    let bare = etag.trim_matches('"');
    header_value.split(',').map(str::trim).any(|candidate| {
        candidate == "*"
            || candidate.strip_prefix("W/").unwrap_or(candidate).trim_matches('"') == bare
    })
}
