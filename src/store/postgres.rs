//! PostgreSQL implementation of `GameStore` on a sqlx pool.
//!
//! Every query runs under the configured timeout; an elapsed timeout is
//! reported as `StoreError::Timeout`.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, instrument};

use super::{GameStore, StoreError};
use crate::domain::{Challenge, College, Difficulty, NewChallenge, Player};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

#[derive(sqlx::FromRow)]
struct PlayerRow {
    id: i64,
    name: String,
    college: String,
    position: String,
    difficulty: String,
    team: Option<String>,
    jersey_number: Option<i32>,
    ppg: Option<f64>,
}

impl TryFrom<PlayerRow> for Player {
    type Error = StoreError;

    fn try_from(row: PlayerRow) -> Result<Self, Self::Error> {
        let difficulty = Difficulty::try_from(row.difficulty.as_str())
            .map_err(|e| StoreError::InvalidRow(format!("player {}: {e}", row.id)))?;
        Ok(Player {
            id: row.id,
            name: row.name,
            college: row.college,
            position: row.position,
            difficulty,
            team: row.team,
            jersey_number: row.jersey_number,
            ppg: row.ppg,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ChallengeRow {
    id: i64,
    challenge_date: NaiveDate,
    easy_player_id: i64,
    hard_player_id: i64,
    hof_player_id: i64,
    created_at: DateTime<Utc>,
}

impl From<ChallengeRow> for Challenge {
    fn from(row: ChallengeRow) -> Self {
        Challenge {
            id: row.id,
            challenge_date: row.challenge_date,
            easy_player_id: row.easy_player_id,
            hard_player_id: row.hard_player_id,
            hof_player_id: row.hof_player_id,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CollegeRow {
    id: i64,
    name: String,
}

impl From<CollegeRow> for College {
    fn from(row: CollegeRow) -> Self {
        College { id: row.id, name: row.name }
    }
}

const PLAYER_COLUMNS: &str = "id, name, college, position, difficulty, team, jersey_number, ppg";
const CHALLENGE_COLUMNS: &str =
    "id, challenge_date, easy_player_id, hard_player_id, hof_player_id, created_at";

impl PgStore {
    /// Connect, run the embedded migrations and return the store.
    #[instrument(level = "info", skip(url))]
    pub async fn connect(
        url: &str,
        max_connections: u32,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(timeout)
            .connect(url)
            .await?;

        sqlx::migrate!().run(&pool).await?;
        info!(target: "ydkb_backend", max_connections, "PostgreSQL pool ready, migrations applied");

        Ok(Self { pool, timeout })
    }

    async fn timed<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => res.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }
}

/// Escape LIKE wildcards so the search term is matched literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn into_players(rows: Vec<PlayerRow>) -> Result<Vec<Player>, StoreError> {
    rows.into_iter().map(Player::try_from).collect()
}

#[async_trait]
impl GameStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn player_ids_by_difficulty(
        &self,
        difficulty: Difficulty,
        limit: i64,
    ) -> Result<Vec<i64>, StoreError> {
        self.timed(
            sqlx::query_scalar("SELECT id FROM players WHERE difficulty = $1 ORDER BY id LIMIT $2")
                .bind(difficulty.as_str())
                .bind(limit)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn players_by_ids(&self, ids: &[i64]) -> Result<Vec<Player>, StoreError> {
        let query = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ANY($1)");
        let rows: Vec<PlayerRow> = self
            .timed(sqlx::query_as(&query).bind(ids).fetch_all(&self.pool))
            .await?;
        into_players(rows)
    }

    async fn list_players(&self, limit: i64) -> Result<Vec<Player>, StoreError> {
        let query = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY id LIMIT $1");
        let rows: Vec<PlayerRow> = self
            .timed(sqlx::query_as(&query).bind(limit).fetch_all(&self.pool))
            .await?;
        into_players(rows)
    }

    async fn count_players(&self) -> Result<i64, StoreError> {
        self.timed(sqlx::query_scalar("SELECT COUNT(*) FROM players").fetch_one(&self.pool))
            .await
    }

    async fn challenge_by_date(&self, date: NaiveDate) -> Result<Option<Challenge>, StoreError> {
        let query =
            format!("SELECT {CHALLENGE_COLUMNS} FROM daily_challenges WHERE challenge_date = $1");
        let row: Option<ChallengeRow> = self
            .timed(sqlx::query_as(&query).bind(date).fetch_optional(&self.pool))
            .await?;
        Ok(row.map(Challenge::from))
    }

    #[instrument(level = "debug", skip(self))]
    async fn insert_challenge(&self, new: NewChallenge) -> Result<Challenge, StoreError> {
        let query = format!(
            "INSERT INTO daily_challenges (challenge_date, easy_player_id, hard_player_id, hof_player_id) \
             VALUES ($1, $2, $3, $4) RETURNING {CHALLENGE_COLUMNS}"
        );
        let res: Result<ChallengeRow, StoreError> = self
            .timed(
                sqlx::query_as(&query)
                    .bind(new.challenge_date)
                    .bind(new.easy_player_id)
                    .bind(new.hard_player_id)
                    .bind(new.hof_player_id)
                    .fetch_one(&self.pool),
            )
            .await;

        match res {
            Ok(row) => Ok(row.into()),
            Err(StoreError::Database(sqlx::Error::Database(db))) if db.is_unique_violation() => {
                Err(StoreError::Conflict(format!(
                    "challenge already exists for {}",
                    new.challenge_date
                )))
            }
            Err(e) => Err(e),
        }
    }

    async fn delete_challenge(&self, id: i64) -> Result<bool, StoreError> {
        let res = self
            .timed(
                sqlx::query("DELETE FROM daily_challenges WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn recent_challenges(&self, limit: i64) -> Result<Vec<Challenge>, StoreError> {
        let query = format!(
            "SELECT {CHALLENGE_COLUMNS} FROM daily_challenges ORDER BY challenge_date DESC LIMIT $1"
        );
        let rows: Vec<ChallengeRow> = self
            .timed(sqlx::query_as(&query).bind(limit).fetch_all(&self.pool))
            .await?;
        Ok(rows.into_iter().map(Challenge::from).collect())
    }

    async fn search_colleges(&self, term: &str, limit: i64) -> Result<Vec<College>, StoreError> {
        let rows: Vec<CollegeRow> = self
            .timed(
                sqlx::query_as(
                    "SELECT id, name FROM colleges WHERE name ILIKE $1 ESCAPE '\\' ORDER BY name LIMIT $2",
                )
                .bind(like_pattern(term))
                .bind(limit)
                .fetch_all(&self.pool),
            )
            .await?;
        Ok(rows.into_iter().map(College::from).collect())
    }

    async fn list_colleges(&self, limit: i64) -> Result<Vec<College>, StoreError> {
        let rows: Vec<CollegeRow> = self
            .timed(
                sqlx::query_as("SELECT id, name FROM colleges ORDER BY id LIMIT $1")
                    .bind(limit)
                    .fetch_all(&self.pool),
            )
            .await?;
        Ok(rows.into_iter().map(College::from).collect())
    }

    async fn count_colleges(&self) -> Result<i64, StoreError> {
        self.timed(sqlx::query_scalar("SELECT COUNT(*) FROM colleges").fetch_one(&self.pool))
            .await
    }
}
