use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::game::GameConfig;
use crate::realtime::broker::RealtimeBroker;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Realtime fan-out broker
    pub broker: Arc<RealtimeBroker>,
    /// Room coordination knobs
    pub config: GameConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: GameConfig) -> Self {
        Self {
            db: Some(db),
            broker: Arc::new(RealtimeBroker::new()),
            config,
        }
    }

    /// Create a new AppState without a database connection (for testing)
    pub fn without_db(config: GameConfig) -> Self {
        Self {
            db: None,
            broker: Arc::new(RealtimeBroker::new()),
            config,
        }
    }
}
