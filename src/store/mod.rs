//! Storage seam over the `players`, `colleges` and `daily_challenges` tables.
//!
//! `PgStore` talks to PostgreSQL through a sqlx pool; `MemoryStore` keeps the
//! same tables in memory (local runs without a database, and tests).

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Challenge, College, Difficulty, NewChallenge, Player};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("query timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid row: {0}")]
    InvalidRow(String),
}

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Short label for diagnostics ("postgres", "memory").
    fn backend(&self) -> &'static str;

    async fn player_ids_by_difficulty(
        &self,
        difficulty: Difficulty,
        limit: i64,
    ) -> Result<Vec<i64>, StoreError>;

    /// Batch load; unknown ids are silently absent from the result.
    async fn players_by_ids(&self, ids: &[i64]) -> Result<Vec<Player>, StoreError>;

    async fn list_players(&self, limit: i64) -> Result<Vec<Player>, StoreError>;

    async fn count_players(&self) -> Result<i64, StoreError>;

    async fn challenge_by_date(&self, date: NaiveDate) -> Result<Option<Challenge>, StoreError>;

    /// Fails with `StoreError::Conflict` if a challenge already exists for the date.
    async fn insert_challenge(&self, new: NewChallenge) -> Result<Challenge, StoreError>;

    /// Returns whether a row was deleted.
    async fn delete_challenge(&self, id: i64) -> Result<bool, StoreError>;

    /// Newest `challenge_date` first.
    async fn recent_challenges(&self, limit: i64) -> Result<Vec<Challenge>, StoreError>;

    /// Case-insensitive substring match on the college name, ordered by name.
    async fn search_colleges(&self, term: &str, limit: i64) -> Result<Vec<College>, StoreError>;

    async fn list_colleges(&self, limit: i64) -> Result<Vec<College>, StoreError>;

    async fn count_colleges(&self) -> Result<i64, StoreError>;
}
