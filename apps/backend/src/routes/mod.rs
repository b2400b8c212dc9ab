use actix_web::web;

pub mod health;
pub mod leaderboard;
pub mod players;
pub mod sessions;

/// Register every route. `main` and the HTTP tests share this.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes))
        .service(web::scope("/api/players").configure(players::configure_routes))
        .service(web::scope("/api/sessions").configure(sessions::configure_routes))
        .service(web::scope("/api/leaderboard").configure(leaderboard::configure_routes));
}
