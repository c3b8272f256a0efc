//! Shared helpers for integration tests.

pub mod factory;

use backend::config::db::DbProfile;
use backend::infra::state::build_state;
use backend::{AppError, AppState};

/// Fresh application state over an isolated in-memory SQLite database with
/// the schema migrated.
pub async fn build_test_state() -> Result<AppState, AppError> {
    build_state().with_db(DbProfile::Test).build().await
}

// Auto-initialize logging for integration tests
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
