use clap::{Parser, ValueEnum};
use migration::{migrate, MigrationCommand};
use tictactoe_backend::config::db::DbKind;
use tictactoe_backend::infra::db::connect_db;

#[derive(Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Reset => MigrationCommand::Reset,
            Command::Refresh => MigrationCommand::Refresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

/// In-memory SQLite is not offered: the database would vanish when the command exits.
#[derive(Clone, Copy, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Tic-tac-toe database migration tool")]
struct Args {
    /// Migration command to run
    #[arg(value_enum)]
    command: Command,

    /// Database type
    #[arg(short, long, value_enum, default_value = "postgres")]
    db: Db,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let db_kind = match args.db {
        Db::Postgres => DbKind::Postgres,
        Db::SqliteFile => DbKind::SqliteFile,
    };

    let conn = match connect_db(db_kind).await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Failed to connect to {db_kind}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate(&conn, args.command.into()).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
