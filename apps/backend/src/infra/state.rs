use crate::config::db::DbKind;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;

/// Builder for [`AppState`], shared by `main` and the tests.
///
/// Without a database kind the state is served from the in-process store.
#[derive(Debug, Default)]
pub struct StateBuilder {
    db_kind: Option<DbKind>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        match self.db_kind {
            // single entrypoint: connect + migrate
            Some(kind) => Ok(AppState::new(bootstrap_db(kind).await?)),
            None => Ok(AppState::in_memory()),
        }
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
