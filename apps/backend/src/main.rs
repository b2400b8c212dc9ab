use actix_web::{web, App, HttpServer};
use tictactoe_backend::config::db::DbKind;
use tictactoe_backend::infra::state::build_state;
use tictactoe_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use tictactoe_backend::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
    {
        Ok(port) => port,
        Err(_) => {
            error!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        }
    };

    let db_kind = match DbKind::from_env() {
        Ok(kind) => kind,
        Err(e) => {
            error!(error = %e, "Invalid database configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_state().with_db(db_kind).build().await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, db_kind = %db_kind, "Failed to build application state");
            std::process::exit(1);
        }
    };
    info!(db_kind = %db_kind, "Database ready");

    let data = web::Data::new(app_state);

    info!(%host, port, "Starting tic-tac-toe backend");
    HttpServer::new(move || {
        App::new()
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap(StructuredLogger)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
