use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::services::DEFAULT_LEADERBOARD_LIMIT;
use crate::state::app_state::AppState;

/// GET /api/leaderboard/wins
async fn top_by_wins(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let entries = app_state
        .leaderboard_service()
        .top_by_wins(DEFAULT_LEADERBOARD_LIMIT)
        .await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// GET /api/leaderboard/efficiency
async fn top_by_efficiency(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let entries = app_state
        .leaderboard_service()
        .top_by_efficiency(DEFAULT_LEADERBOARD_LIMIT)
        .await?;
    Ok(HttpResponse::Ok().json(entries))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/wins", web::get().to(top_by_wins))
        .route("/efficiency", web::get().to(top_by_efficiency));
}
