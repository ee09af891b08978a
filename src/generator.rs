//! Daily challenge generation.
//!
//! One Easy and one Hard player are drawn uniformly at random from up to
//! `candidate_pool_limit` ids per tier. The Hall-of-Fame slot is drawn from the
//! Hard pool without the chosen Hard player and falls back to that same player
//! when the pool holds a single id.

use chrono::{Days, NaiveDate};
use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::GameSettings;
use crate::domain::{Challenge, Difficulty, NewChallenge};
use crate::error::ChallengeError;
use crate::store::{GameStore, StoreError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerPicks {
  pub easy: i64,
  pub hard: i64,
  pub hof: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Generated {
  Existing(Challenge),
  Created(Challenge),
}

impl Generated {
  pub fn challenge(&self) -> &Challenge {
    match self {
      Generated::Existing(c) | Generated::Created(c) => c,
    }
  }

  pub fn is_created(&self) -> bool {
    matches!(self, Generated::Created(_))
  }
}

/// Pick one id per tier. Pure: all randomness comes from `rng`.
pub fn pick_players<R: Rng + ?Sized>(
  easy_pool: &[i64],
  hard_pool: &[i64],
  rng: &mut R,
) -> Result<PlayerPicks, ChallengeError> {
  let easy = *easy_pool.choose(rng).ok_or(ChallengeError::EmptyPool(Difficulty::Easy))?;
  let hard = *hard_pool.choose(rng).ok_or(ChallengeError::EmptyPool(Difficulty::Hard))?;

  let hof_candidates: Vec<i64> = hard_pool.iter().copied().filter(|id| *id != hard).collect();
  let hof = hof_candidates.choose(rng).copied().unwrap_or(hard);

  Ok(PlayerPicks { easy, hard, hof })
}

async fn candidate_pool(
  store: &dyn GameStore,
  tier: Difficulty,
  limit: i64,
) -> Result<Vec<i64>, ChallengeError> {
  store
    .player_ids_by_difficulty(tier, limit)
    .await
    .map_err(|source| ChallengeError::PoolQuery { tier, source })
}

/// Make sure a challenge exists for `date`. Calling it again for the same date
/// returns the stored row unchanged.
#[instrument(level = "info", skip(store, settings), fields(%date))]
pub async fn ensure_challenge(
  store: &dyn GameStore,
  date: NaiveDate,
  settings: &GameSettings,
) -> Result<Generated, ChallengeError> {
  if let Some(existing) = store.challenge_by_date(date).await? {
    info!(target: "challenge", %date, id = existing.id, "Challenge already exists");
    return Ok(Generated::Existing(existing));
  }

  let easy_pool = candidate_pool(store, Difficulty::Easy, settings.candidate_pool_limit).await?;
  let hard_pool = candidate_pool(store, Difficulty::Hard, settings.candidate_pool_limit).await?;
  let picks = pick_players(&easy_pool, &hard_pool, &mut rand::thread_rng())?;

  let new = NewChallenge {
    challenge_date: date,
    easy_player_id: picks.easy,
    hard_player_id: picks.hard,
    hof_player_id: picks.hof,
  };

  match store.insert_challenge(new).await {
    Ok(created) => {
      info!(target: "challenge", %date, id = created.id, easy = picks.easy, hard = picks.hard, hof = picks.hof, "Challenge created");
      Ok(Generated::Created(created))
    }
    Err(StoreError::Conflict(reason)) => {
      // Lost a race against another creator for the same date.
      warn!(target: "challenge", %date, %reason, "Insert conflicted; returning stored challenge");
      match store.challenge_by_date(date).await? {
        Some(existing) => Ok(Generated::Existing(existing)),
        None => Err(ChallengeError::Insert(StoreError::Conflict(reason))),
      }
    }
    Err(e) => Err(ChallengeError::Insert(e)),
  }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
  Created,
  Existing,
  Error,
}

#[derive(Clone, Debug, Serialize)]
pub struct DayOutcome {
  pub date: NaiveDate,
  pub status: DayStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub challenge_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

/// Ensure challenges for the `days` dates following `from`. Errors are recorded
/// per date; the loop never stops early.
#[instrument(level = "info", skip(store, settings), fields(%from, days))]
pub async fn ensure_week(
  store: &dyn GameStore,
  from: NaiveDate,
  days: u32,
  settings: &GameSettings,
) -> Vec<DayOutcome> {
  let mut outcomes = Vec::with_capacity(days as usize);
  for offset in 1..=u64::from(days) {
    let Some(date) = from.checked_add_days(Days::new(offset)) else {
      break;
    };
    let outcome = match ensure_challenge(store, date, settings).await {
      Ok(generated) => DayOutcome {
        date,
        status: if generated.is_created() { DayStatus::Created } else { DayStatus::Existing },
        challenge_id: Some(generated.challenge().id),
        error: None,
      },
      Err(e) => {
        warn!(target: "challenge", %date, error = %e, "Challenge creation failed");
        DayOutcome { date, status: DayStatus::Error, challenge_id: None, error: Some(e.to_string()) }
      }
    };
    outcomes.push(outcome);
  }
  outcomes
}
