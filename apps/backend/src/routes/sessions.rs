//! Session routes: create, list, read, join and play.

use actix_web::http::header::{ETAG, IF_MATCH, IF_NONE_MATCH};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{Board, GameStatus, Marker, Move};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{SessionId, ValidatedJson};
use crate::http::etag::{if_none_match_matches, parse_session_version_from_etag, session_etag};
use crate::repos::Session;
use crate::services::Seats;
use crate::state::app_state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSessionRequest {
    pub player_x_id: Option<i64>,
    pub player_o_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct JoinSessionRequest {
    pub player_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

/// Body of a move submission. Exactly one of `marker` and `player_id` is set.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub row: i32,
    pub col: i32,
    pub marker: Option<Marker>,
    pub player_id: Option<i64>,
    /// Ignored when an `If-Match` header is present.
    pub expected_version: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: i64,
    /// Row strings over `.`, `X` and `O`, top row first.
    pub board: Vec<String>,
    pub turn: Marker,
    pub status: GameStatus,
    pub moves: Vec<Move>,
    pub move_count: usize,
    pub version: i32,
    pub player_x_id: Option<i64>,
    pub player_o_id: Option<i64>,
    pub winner_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

fn board_rows(board: &Board) -> Vec<String> {
    let encoded = board.encode();
    encoded
        .as_bytes()
        .chunks(3)
        .map(|row| String::from_utf8_lossy(row).into_owned())
        .collect()
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            board: board_rows(&session.board),
            turn: session.turn,
            status: session.status,
            move_count: session.moves.len(),
            winner_id: session.winning_player(),
            moves: session.moves,
            version: session.version,
            player_x_id: session.player_x,
            player_o_id: session.player_o,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

fn with_etag(status: StatusCode, session: Session) -> HttpResponse {
    let etag = session_etag(session.id, session.version);
    HttpResponse::build(status)
        .insert_header((ETAG, etag))
        .json(SessionResponse::from(session))
}

/// POST /api/sessions
async fn create_session(
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreateSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let session = app_state
        .session_service()
        .create_session_with_seats(Seats {
            x: body.player_x_id,
            o: body.player_o_id,
        })
        .await?;

    Ok(with_etag(StatusCode::CREATED, session))
}

/// GET /api/sessions
async fn list_sessions(
    app_state: web::Data<AppState>,
    query: web::Query<ListSessionsQuery>,
) -> Result<HttpResponse, AppError> {
    let sessions: Vec<SessionResponse> = app_state
        .session_service()
        .list_sessions(query.offset, query.limit)
        .await?
        .into_iter()
        .map(SessionResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(sessions))
}

/// POST /api/sessions/{session_id}/join
async fn join_session(
    session_id: SessionId,
    app_state: web::Data<AppState>,
    body: ValidatedJson<JoinSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let session = app_state
        .session_service()
        .join_session(session_id.0, body.player_id)
        .await?;
    Ok(with_etag(StatusCode::OK, session))
}

/// GET /api/sessions/{session_id}
///
/// `If-None-Match` with the current ETag yields `304 Not Modified`.
async fn get_session(
    http_req: HttpRequest,
    session_id: SessionId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session = app_state.session_service().get_session(session_id.0).await?;
    let etag = session_etag(session.id, session.version);

    let not_modified = http_req
        .headers()
        .get(IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| if_none_match_matches(v, &etag));

    if not_modified {
        return Ok(HttpResponse::build(StatusCode::NOT_MODIFIED)
            .insert_header((ETAG, etag))
            .finish());
    }

    Ok(with_etag(StatusCode::OK, session))
}

/// Expected version from `If-Match`, falling back to the body. The header
/// must carry this session's ETag.
fn expected_version(
    http_req: &HttpRequest,
    session_id: i64,
    body: &MoveRequest,
) -> Result<i32, AppError> {
    if let Some(value) = http_req.headers().get(IF_MATCH) {
        let raw = value.to_str().map_err(|_| {
            AppError::bad_request(ErrorCode::InvalidHeader, "If-Match header is not valid ASCII")
        })?;
        return parse_session_version_from_etag(raw, session_id);
    }

    body.expected_version.ok_or_else(|| {
        AppError::precondition_required(
            "Supply the session version via If-Match or expected_version",
        )
    })
}

/// POST /api/sessions/{session_id}/moves
async fn submit_move(
    http_req: HttpRequest,
    session_id: SessionId,
    app_state: web::Data<AppState>,
    body: ValidatedJson<MoveRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let expected = expected_version(&http_req, session_id.0, &body)?;
    let service = app_state.session_service();

    let session = match (body.marker, body.player_id) {
        (Some(marker), None) => {
            service
                .submit_move(session_id.0, Move::new(body.row, body.col, marker), expected)
                .await?
        }
        (None, Some(player_id)) => {
            service
                .submit_player_move(session_id.0, player_id, body.row, body.col, expected)
                .await?
        }
        _ => {
            return Err(AppError::bad_request(
                ErrorCode::BadRequest,
                "Provide exactly one of marker or player_id",
            ))
        }
    };

    Ok(with_etag(StatusCode::OK, session))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_session))
        .route("", web::get().to(list_sessions))
        .route("/{session_id}", web::get().to(get_session))
        .route("/{session_id}/join", web::post().to(join_session))
        .route("/{session_id}/moves", web::post().to(submit_move));
}
