use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{db_url, DbKind};
use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_INTERVAL_MS: u64 = 500;

/// Retry a connection attempt with fixed interval delays.
/// Returns the error of the last attempt once all retries are exhausted.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "Connection retry succeeded");
                }
                return Ok(result);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                warn!(attempt, max_attempts, interval_ms, error = %e, "Connection attempt failed");
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}

fn connect_options(kind: DbKind, url: String) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);
    if kind == DbKind::SqliteMemory {
        // every pooled connection would otherwise open its own empty database
        opts.max_connections(1).min_connections(1);
    }
    opts
}

/// Open a connection for the given kind. Does NOT run migrations.
///
/// Postgres connects with a bounded retry; SQLite connects once.
pub async fn connect_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let url = db_url(kind)?;
    let attempts = if kind.is_sqlite() { 1 } else { CONNECT_ATTEMPTS };

    let conn = retry_connection(
        || {
            let opts = connect_options(kind, url.clone());
            async move { Database::connect(opts).await.map_err(AppError::from) }
        },
        attempts,
        CONNECT_INTERVAL_MS,
    )
    .await?;

    info!(db_kind = %kind, "Database connected");
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(kind).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    Ok(conn)
}
