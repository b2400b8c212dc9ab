use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Session id taken from the `{session_id}` route segment.
///
/// Only the shape is checked here; existence is decided by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionId(pub i64);

/// Player id taken from the `{player_id}` route segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerId(pub i64);

fn positive_segment(
    req: &HttpRequest,
    name: &str,
    label: &str,
    code: ErrorCode,
) -> Result<i64, AppError> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| AppError::bad_request(code, format!("Missing {name} parameter")))?;

    let id = raw
        .parse::<i64>()
        .map_err(|_| AppError::bad_request(code, format!("Invalid {label} id: {raw}")))?;

    if id <= 0 {
        return Err(AppError::bad_request(
            code,
            format!("{label} id must be positive, got: {id}"),
        ));
    }
    Ok(id)
}

impl FromRequest for SessionId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            positive_segment(req, "session_id", "Session", ErrorCode::InvalidSessionId)
                .map(SessionId),
        )
    }
}

impl FromRequest for PlayerId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            positive_segment(req, "player_id", "Player", ErrorCode::InvalidPlayerId).map(PlayerId),
        )
    }
}
