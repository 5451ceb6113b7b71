//! # State Module
//!
//! Manages application state for the terminal app.
//!
//! ## Why Multiple State Types?
//! Each command function takes only the states it needs, so the signature
//! says what a command can touch. `AppState` just bundles them for the
//! router and the shell.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌────────────┐ ┌──────────────────┐ │
//! │  │   DbState    │ │  ShopState   │ │ Session    │ │  InsightState    │ │
//! │  │              │ │              │ │ State      │ │                  │ │
//! │  │  Database    │ │  Arc<Mutex<  │ │ Arc<Atomic │ │  service +       │ │
//! │  │  (SQLite     │ │   ShopData   │ │   Bool>>   │ │  latest report   │ │
//! │  │   pool)      │ │  >>          │ │            │ │                  │ │
//! │  └──────────────┘ └──────────────┘ └────────────┘ └──────────────────┘ │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  ConfigState: store name, PIN, thresholds, AI settings           │  │
//! │  │  (read-only after startup)                                        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • ShopState: one mutation at a time, write-through under the lock     │
//! │  • SessionState: atomic flag                                           │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod insights;
mod session;
mod shop;

pub use config::ConfigState;
pub use db::DbState;
pub use insights::InsightState;
pub use session::SessionState;
pub use shop::ShopState;

use std::path::PathBuf;

use fiado_ai::InsightService;
use fiado_core::ShopData;
use fiado_db::{Database, DbConfig};

use crate::error::ApiError;

/// Every state the app holds, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: ConfigState,
    pub db: DbState,
    pub shop: ShopState,
    pub session: SessionState,
    pub insights: InsightState,
}

impl AppState {
    /// Builds the states from an open database and its loaded collections.
    pub fn new(config: ConfigState, db: DbState, shop: ShopData) -> Self {
        let insights = InsightState::new(InsightService::from_config(&config.insight));
        AppState {
            config,
            db,
            shop: ShopState::new(shop),
            session: SessionState::new(),
            insights,
        }
    }

    /// In-memory database with seed data, insights disabled.
    #[cfg(test)]
    pub async fn for_tests() -> Self {
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database");
        let shop = db.shop().load().await.expect("seed load");
        AppState::new(ConfigState::default(), DbState::new(db, ":memory:"), shop)
    }

    /// Opens the database at `path` and loads the collections.
    pub async fn open(config: ConfigState, path: PathBuf) -> Result<Self, ApiError> {
        let db = Database::new(DbConfig::new(path.clone())).await?;
        let shop = db.shop().load().await?;
        Ok(AppState::new(config, DbState::new(db, path), shop))
    }
}
