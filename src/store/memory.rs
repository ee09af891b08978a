//! In-memory implementation of `GameStore`.
//!
//! Tables are plain collections behind `tokio::sync::RwLock`. Used when no
//! DATABASE_URL is configured, and by the tests.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::instrument;

use super::{GameStore, StoreError};
use crate::domain::{Challenge, College, Difficulty, NewChallenge, Player};
use crate::seeds::{seed_colleges, seed_players};

#[derive(Clone, Default)]
pub struct MemoryStore {
    players: Arc<RwLock<BTreeMap<i64, Player>>>,
    colleges: Arc<RwLock<Vec<College>>>,
    challenges: Arc<RwLock<BTreeMap<i64, Challenge>>>,
    next_challenge_id: Arc<RwLock<i64>>,
}

impl MemoryStore {
    pub fn new(players: Vec<Player>, colleges: Vec<College>) -> Self {
        Self {
            players: Arc::new(RwLock::new(players.into_iter().map(|p| (p.id, p)).collect())),
            colleges: Arc::new(RwLock::new(colleges)),
            challenges: Arc::new(RwLock::new(BTreeMap::new())),
            next_challenge_id: Arc::new(RwLock::new(0)),
        }
    }

    /// Store preloaded with the built-in players and colleges.
    pub fn seeded() -> Self {
        Self::new(seed_players(), seed_colleges())
    }

    pub async fn challenge_count(&self) -> usize {
        self.challenges.read().await.len()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn player_ids_by_difficulty(
        &self,
        difficulty: Difficulty,
        limit: i64,
    ) -> Result<Vec<i64>, StoreError> {
        let players = self.players.read().await;
        Ok(players
            .values()
            .filter(|p| p.difficulty == difficulty)
            .map(|p| p.id)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn players_by_ids(&self, ids: &[i64]) -> Result<Vec<Player>, StoreError> {
        let players = self.players.read().await;
        Ok(players
            .values()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list_players(&self, limit: i64) -> Result<Vec<Player>, StoreError> {
        let players = self.players.read().await;
        Ok(players.values().take(limit.max(0) as usize).cloned().collect())
    }

    async fn count_players(&self) -> Result<i64, StoreError> {
        Ok(self.players.read().await.len() as i64)
    }

    async fn challenge_by_date(&self, date: NaiveDate) -> Result<Option<Challenge>, StoreError> {
        let challenges = self.challenges.read().await;
        Ok(challenges.values().find(|c| c.challenge_date == date).cloned())
    }

    #[instrument(level = "debug", skip(self))]
    async fn insert_challenge(&self, new: NewChallenge) -> Result<Challenge, StoreError> {
        // Both locks held so the uniqueness check and the insert are atomic.
        let mut challenges = self.challenges.write().await;
        let mut next_id = self.next_challenge_id.write().await;

        if challenges.values().any(|c| c.challenge_date == new.challenge_date) {
            return Err(StoreError::Conflict(format!(
                "challenge already exists for {}",
                new.challenge_date
            )));
        }

        *next_id += 1;
        let challenge = Challenge {
            id: *next_id,
            challenge_date: new.challenge_date,
            easy_player_id: new.easy_player_id,
            hard_player_id: new.hard_player_id,
            hof_player_id: new.hof_player_id,
            created_at: Utc::now(),
        };
        challenges.insert(challenge.id, challenge.clone());
        Ok(challenge)
    }

    async fn delete_challenge(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.challenges.write().await.remove(&id).is_some())
    }

    async fn recent_challenges(&self, limit: i64) -> Result<Vec<Challenge>, StoreError> {
        let challenges = self.challenges.read().await;
        let mut rows: Vec<Challenge> = challenges.values().cloned().collect();
        rows.sort_by(|a, b| b.challenge_date.cmp(&a.challenge_date));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn search_colleges(&self, term: &str, limit: i64) -> Result<Vec<College>, StoreError> {
        let needle = term.to_lowercase();
        let colleges = self.colleges.read().await;
        let mut found: Vec<College> = colleges
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found.truncate(limit.max(0) as usize);
        Ok(found)
    }

    async fn list_colleges(&self, limit: i64) -> Result<Vec<College>, StoreError> {
        let colleges = self.colleges.read().await;
        Ok(colleges.iter().take(limit.max(0) as usize).cloned().collect())
    }

    async fn count_colleges(&self) -> Result<i64, StoreError> {
        Ok(self.colleges.read().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn new_challenge(d: &str) -> NewChallenge {
        NewChallenge {
            challenge_date: date(d),
            easy_player_id: 1,
            hard_player_id: 10,
            hof_player_id: 11,
        }
    }

    #[tokio::test]
    async fn second_insert_for_same_date_conflicts() {
        let store = MemoryStore::default();
        store.insert_challenge(new_challenge("2024-02-15")).await.unwrap();

        let err = store.insert_challenge(new_challenge("2024-02-15")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.challenge_count().await, 1);
    }

    #[tokio::test]
    async fn recent_challenges_are_newest_first() {
        let store = MemoryStore::default();
        for d in ["2024-02-14", "2024-02-16", "2024-02-15"] {
            store.insert_challenge(new_challenge(d)).await.unwrap();
        }

        let recent = store.recent_challenges(2).await.unwrap();
        let dates: Vec<_> = recent.iter().map(|c| c.challenge_date).collect();
        assert_eq!(dates, vec![date("2024-02-16"), date("2024-02-15")]);
    }

    #[tokio::test]
    async fn college_search_is_case_insensitive() {
        let store = MemoryStore::seeded();
        let found = store.search_colleges("STANford", 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Stanford University");
    }
}
