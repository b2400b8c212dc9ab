//! Player registry routes.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::{PlayerId, ValidatedJson};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ListPlayersQuery {
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

async fn create_player(
    app_state: web::Data<AppState>,
    body: ValidatedJson<CreatePlayerRequest>,
) -> Result<HttpResponse, AppError> {
    let player = app_state
        .player_service()
        .create_player(&body.username)
        .await?;
    Ok(HttpResponse::Created().json(player))
}

async fn list_players(
    app_state: web::Data<AppState>,
    query: web::Query<ListPlayersQuery>,
) -> Result<HttpResponse, AppError> {
    let players = app_state
        .player_service()
        .list_players(query.offset, query.limit)
        .await?;
    Ok(HttpResponse::Ok().json(players))
}

async fn get_player(
    app_state: web::Data<AppState>,
    player_id: PlayerId,
) -> Result<HttpResponse, AppError> {
    let player = app_state.player_service().get_player(player_id.0).await?;
    Ok(HttpResponse::Ok().json(player))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_player))
        .route("", web::get().to(list_players))
        .route("/{player_id}", web::get().to(get_player));
}
