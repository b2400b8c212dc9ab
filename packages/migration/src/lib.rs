pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DatabaseBackend, Statement};
pub use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseConnection};

mod m20251016_000001_init; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20251016_000001_init::Migration)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

/// Run one migration command against an open connection.
/// Shared by the backend bootstrap, the CLI and tests.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let before = snapshot(db).await?;
    tracing::info!(
        ?command,
        backend = %before.backend,
        database = %before.name,
        defined = before.defined,
        applied = before.applied,
        "Running migration command"
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            if command != MigrationCommand::Status {
                let after = snapshot(db).await?;
                tracing::info!(?command, applied = after.applied, "Migration command finished");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(?command, error = %e, "Migration command failed");
            Err(e)
        }
    }
}

#[derive(Debug)]
struct MigrationSnapshot {
    backend: String,
    name: String,
    applied: usize,
    defined: usize,
}

async fn snapshot(db: &DatabaseConnection) -> Result<MigrationSnapshot, DbErr> {
    let backend = db.get_database_backend();

    let query = match backend {
        DatabaseBackend::Postgres => Some("SELECT current_database() AS name"),
        DatabaseBackend::Sqlite => {
            Some("SELECT file AS name FROM pragma_database_list WHERE name = 'main'")
        }
        _ => None,
    };

    let name = match query {
        Some(sql) => db
            .query_one(Statement::from_string(backend, sql))
            .await?
            .and_then(|row| row.try_get::<String>("", "name").ok())
            .map(|name| if name.is_empty() { ":memory:".to_string() } else { name })
            .unwrap_or_else(|| "<unknown>".to_string()),
        None => "<unsupported>".to_string(),
    };

    Ok(MigrationSnapshot {
        backend: format!("{backend:?}"),
        name,
        applied: count_applied_migrations(db).await.unwrap_or(0),
        defined: Migrator::migrations().len(),
    })
}

/// Number of applied migrations; 0 when the migration table does not exist yet.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Name of the most recently applied migration, if any.
pub async fn get_latest_migration_version(
    db: &DatabaseConnection,
) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
