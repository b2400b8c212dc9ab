use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Which database engine backs the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    /// On-disk SQLite database at `SQLITE_PATH`
    SqliteFile,
    /// Private in-memory SQLite database (tests and demos)
    SqliteMemory,
}

impl DbKind {
    /// Read `DB_KIND`, defaulting to Postgres.
    pub fn from_env() -> Result<Self, AppError> {
        match env::var("DB_KIND") {
            Ok(raw) => raw.parse(),
            Err(_) => Ok(DbKind::Postgres),
        }
    }

    pub fn is_sqlite(self) -> bool {
        matches!(self, DbKind::SqliteFile | DbKind::SqliteMemory)
    }
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite" => Ok(DbKind::SqliteFile),
            "sqlite-memory" => Ok(DbKind::SqliteMemory),
            other => Err(AppError::config(format!(
                "Unknown DB_KIND '{other}' (expected postgres, sqlite-file or sqlite-memory)"
            ))),
        }
    }
}

impl fmt::Display for DbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DbKind::Postgres => "postgres",
            DbKind::SqliteFile => "sqlite-file",
            DbKind::SqliteMemory => "sqlite-memory",
        })
    }
}

/// Builds a database URL from environment variables for the given kind
pub fn db_url(kind: DbKind) -> Result<String, AppError> {
    match kind {
        DbKind::Postgres => {
            let host = host();
            let port = port();
            let db_name = must_var("DB_NAME")?;
            let username = must_var("DB_USER")?;
            let password = must_var("DB_PASSWORD")?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
        DbKind::SqliteFile => {
            let path = env::var("SQLITE_PATH").unwrap_or_else(|_| "tictactoe.sqlite".to_string());
            Ok(format!("sqlite://{path}?mode=rwc"))
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

/// Get database host from environment (defaults to localhost)
fn host() -> String {
    env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string())
}

/// Get database port from environment (defaults to 5432)
fn port() -> String {
    env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string())
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
