//! Domain models used by the backend: difficulty tiers, players, colleges and daily challenges.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Difficulty tier of a player pool. Each tier has its own attempt budget.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
  Easy,
  Hard,
  #[serde(rename = "Hall of Fame")]
  HallOfFame,
}

impl Difficulty {
  pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Hard, Difficulty::HallOfFame];

  /// Label stored in the `players.difficulty` column.
  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Easy => "Easy",
      Difficulty::Hard => "Hard",
      Difficulty::HallOfFame => "Hall of Fame",
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
#[error("unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

impl TryFrom<&str> for Difficulty {
  type Error = UnknownDifficulty;

  fn try_from(s: &str) -> Result<Self, Self::Error> {
    match s.trim().to_ascii_lowercase().as_str() {
      "easy" => Ok(Difficulty::Easy),
      "hard" => Ok(Difficulty::Hard),
      "hall of fame" | "hall_of_fame" | "hof" => Ok(Difficulty::HallOfFame),
      _ => Err(UnknownDifficulty(s.to_string())),
    }
  }
}

/// Reference data: an athlete and the college they attended.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Player {
  pub id: i64,
  pub name: String,
  pub college: String,
  pub position: String,
  pub difficulty: Difficulty,
  #[serde(default)] pub team: Option<String>,
  #[serde(default)] pub jersey_number: Option<i32>,
  #[serde(default)] pub ppg: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct College {
  pub id: i64,
  pub name: String,
}

/// One row of `daily_challenges`: a player per tier for a calendar date.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Challenge {
  pub id: i64,
  pub challenge_date: NaiveDate,
  pub easy_player_id: i64,
  pub hard_player_id: i64,
  pub hof_player_id: i64,
  pub created_at: DateTime<Utc>,
}

impl Challenge {
  pub fn player_ids(&self) -> [i64; 3] {
    [self.easy_player_id, self.hard_player_id, self.hof_player_id]
  }

  pub fn player_id_for(&self, difficulty: Difficulty) -> i64 {
    match difficulty {
      Difficulty::Easy => self.easy_player_id,
      Difficulty::Hard => self.hard_player_id,
      Difficulty::HallOfFame => self.hof_player_id,
    }
  }
}

/// Insert payload for a challenge; the store assigns `id` and `created_at`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewChallenge {
  pub challenge_date: NaiveDate,
  pub easy_player_id: i64,
  pub hard_player_id: i64,
  pub hof_player_id: i64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn difficulty_labels_round_trip() {
    for d in Difficulty::ALL {
      assert_eq!(Difficulty::try_from(d.as_str()).unwrap(), d);
    }
    assert_eq!(Difficulty::try_from("HOF").unwrap(), Difficulty::HallOfFame);
    assert!(Difficulty::try_from("medium").is_err());
  }

  #[test]
  fn hall_of_fame_serializes_with_spaces() {
    let json = serde_json::to_string(&Difficulty::HallOfFame).unwrap();
    assert_eq!(json, "\"Hall of Fame\"");
  }
}
