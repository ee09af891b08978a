//! Application state shared by all handlers: the storage handle and game settings.
//!
//! With DATABASE_URL set the store is PostgreSQL (migrations run at startup);
//! otherwise an in-memory store seeded with the built-in players and colleges.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{AppConfig, GameSettings};
use crate::store::{GameStore, MemoryStore, PgStore, StoreError};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GameStore>,
    pub settings: GameSettings,
    pub database_configured: bool,
}

impl AppState {
    #[instrument(level = "info", skip_all)]
    pub async fn from_config(cfg: &AppConfig) -> Result<Self, StoreError> {
        let (store, database_configured): (Arc<dyn GameStore>, bool) = match &cfg.database_url {
            Some(url) => {
                let pg = PgStore::connect(url, cfg.db_max_connections, cfg.query_timeout).await?;
                (Arc::new(pg), true)
            }
            None => (Arc::new(MemoryStore::seeded()), false),
        };

        let players = store.count_players().await?;
        let colleges = store.count_colleges().await?;
        info!(target: "ydkb_backend", backend = store.backend(), players, colleges, "Startup store inventory");

        Ok(Self::new(store, cfg.game.clone(), database_configured))
    }

    pub fn new(store: Arc<dyn GameStore>, settings: GameSettings, database_configured: bool) -> Self {
        Self { store, settings, database_configured }
    }

    /// State over the seeded in-memory store with default settings.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::seeded()), GameSettings::default(), false)
    }
}
