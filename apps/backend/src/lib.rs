#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod infra;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;


pub use config::db::{db_url, DbKind};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use infra::db::{bootstrap_db, connect_db};
pub use infra::state::{build_state, StateBuilder};
pub use middleware::{RequestTrace, StructuredLogger, TraceSpan};
pub use state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
