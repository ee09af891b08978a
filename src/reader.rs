//! Loading a day's challenge and shaping it into question/options/correct-index.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::GameSettings;
use crate::domain::{Challenge, Player};
use crate::error::ChallengeError;
use crate::store::GameStore;

/// The three tier players referenced by a challenge.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TierPlayers {
  pub easy: Player,
  pub hard: Player,
  pub hof: Player,
}

impl TierPlayers {
  /// Players in tier order, without repeating the Hall-of-Fame fallback.
  pub fn distinct(&self) -> Vec<&Player> {
    let mut out: Vec<&Player> = Vec::with_capacity(3);
    for p in [&self.easy, &self.hard, &self.hof] {
      if !out.iter().any(|seen| seen.id == p.id) {
        out.push(p);
      }
    }
    out
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DailyChallenge {
  pub date: NaiveDate,
  pub challenge_id: i64,
  pub players: TierPlayers,
  pub question: String,
  pub options: Vec<Player>,
  pub correct_option: usize,
}

/// Match players from one batch query to the challenge slots.
pub fn assign_tiers(challenge: &Challenge, players: &[Player]) -> Option<TierPlayers> {
  let find = |id: i64| players.iter().find(|p| p.id == id).cloned();
  Some(TierPlayers {
    easy: find(challenge.easy_player_id)?,
    hard: find(challenge.hard_player_id)?,
    hof: find(challenge.hof_player_id)?,
  })
}

pub async fn load_tier_players(
  store: &dyn GameStore,
  challenge: &Challenge,
) -> Result<TierPlayers, ChallengeError> {
  let players = store.players_by_ids(&challenge.player_ids()).await?;
  assign_tiers(challenge, &players).ok_or(ChallengeError::MissingPlayers)
}

/// Options list and the index of the question subject (the Easy player).
pub fn build_options(players: &TierPlayers, shuffle: bool) -> (Vec<Player>, usize) {
  let mut options: Vec<Player> = players.distinct().into_iter().cloned().collect();
  if shuffle {
    options.shuffle(&mut rand::thread_rng());
  }
  let correct = options
    .iter()
    .position(|p| p.id == players.easy.id)
    .unwrap_or_default();
  (options, correct)
}

#[instrument(level = "info", skip(store, settings), fields(%date))]
pub async fn load_daily(
  store: &dyn GameStore,
  date: NaiveDate,
  settings: &GameSettings,
) -> Result<DailyChallenge, ChallengeError> {
  let challenge = store
    .challenge_by_date(date)
    .await?
    .ok_or(ChallengeError::NotFound(date))?;

  let players = load_tier_players(store, &challenge).await?;
  let (options, correct_option) = build_options(&players, settings.shuffle_options);
  debug!(target: "challenge", %date, id = challenge.id, options = options.len(), correct_option, "Daily challenge loaded");

  Ok(DailyChallenge {
    date,
    challenge_id: challenge.id,
    players,
    question: settings.question.clone(),
    options,
    correct_option,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Difficulty, NewChallenge};
  use crate::store::MemoryStore;

  fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
  }

  async fn store_with(easy: i64, hard: i64, hof: i64) -> MemoryStore {
    let store = MemoryStore::seeded();
    store
      .insert_challenge(NewChallenge {
        challenge_date: date("2024-02-15"),
        easy_player_id: easy,
        hard_player_id: hard,
        hof_player_id: hof,
      })
      .await
      .unwrap();
    store
  }

  #[tokio::test]
  async fn shapes_options_in_tier_order() {
    let store = store_with(1, 10, 20).await;
    let daily = load_daily(&store, date("2024-02-15"), &GameSettings::default()).await.unwrap();

    let ids: Vec<i64> = daily.options.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 10, 20]);
    assert_eq!(daily.correct_option, 0);
    assert_eq!(daily.players.easy.college, "Davidson College");
    assert_eq!(daily.players.hof.difficulty, Difficulty::HallOfFame);
    assert_eq!(daily.question, "Which college did this player attend?");
  }

  #[tokio::test]
  async fn hof_fallback_collapses_options() {
    let store = store_with(2, 11, 11).await;
    let daily = load_daily(&store, date("2024-02-15"), &GameSettings::default()).await.unwrap();
    assert_eq!(daily.options.len(), 2);
    assert_eq!(daily.players.hard, daily.players.hof);
  }

  #[tokio::test]
  async fn shuffled_options_still_point_at_easy_player() {
    let store = store_with(3, 12, 21).await;
    let settings = GameSettings { shuffle_options: true, ..GameSettings::default() };
    for _ in 0..10 {
      let daily = load_daily(&store, date("2024-02-15"), &settings).await.unwrap();
      assert_eq!(daily.options[daily.correct_option].id, 3);
    }
  }

  #[tokio::test]
  async fn missing_row_is_not_found() {
    let store = MemoryStore::seeded();
    let err = load_daily(&store, date("2030-01-01"), &GameSettings::default()).await.unwrap_err();
    assert!(matches!(err, ChallengeError::NotFound(_)));
  }

  #[tokio::test]
  async fn unknown_player_is_reported() {
    let store = store_with(1, 10, 999).await;
    let err = load_daily(&store, date("2024-02-15"), &GameSettings::default()).await.unwrap_err();
    assert!(matches!(err, ChallengeError::MissingPlayers));
  }
}
