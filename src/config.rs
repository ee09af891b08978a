//! Runtime configuration: server/database settings from the environment plus
//! optional game tuning loaded from TOML.
//!
//! See `GameSettings` for the expected TOML schema (`[game]` table).

use std::{path::PathBuf, str::FromStr, time::Duration};

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::Difficulty;

#[derive(Clone, Debug)]
pub struct AppConfig {
  pub port: u16,
  /// Absent means "run on the in-memory seeded store".
  pub database_url: Option<String>,
  pub db_max_connections: u32,
  pub query_timeout: Duration,
  pub static_dir: PathBuf,
  pub game: GameSettings,
}

#[derive(Clone, Debug, Deserialize, Default)]
struct GameConfigFile {
  #[serde(default)]
  game: GameSettings,
}

/// Game tuning accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameSettings {
  /// How many candidate ids are fetched per tier when generating a challenge.
  pub candidate_pool_limit: i64,
  pub college_search_min_len: usize,
  pub college_search_limit: i64,
  pub shuffle_options: bool,
  pub question: String,
  pub week_ahead_days: u32,
  pub recent_challenges_limit: i64,
  pub attempts: AttemptLimits,
}

impl Default for GameSettings {
  fn default() -> Self {
    Self {
      candidate_pool_limit: 100,
      college_search_min_len: 2,
      college_search_limit: 10,
      shuffle_options: false,
      question: "Which college did this player attend?".into(),
      week_ahead_days: 7,
      recent_challenges_limit: 10,
      attempts: AttemptLimits::default(),
    }
  }
}

/// Maximum number of guesses per tier.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AttemptLimits {
  pub easy: u32,
  pub hard: u32,
  pub hall_of_fame: u32,
}

impl Default for AttemptLimits {
  fn default() -> Self {
    Self { easy: 5, hard: 4, hall_of_fame: 3 }
  }
}

impl AttemptLimits {
  pub fn for_difficulty(&self, difficulty: Difficulty) -> u32 {
    match difficulty {
      Difficulty::Easy => self.easy,
      Difficulty::Hard => self.hard,
      Difficulty::HallOfFame => self.hall_of_fame,
    }
  }
}

impl AppConfig {
  /// Build the configuration from env; game settings come from GAME_CONFIG_PATH when set.
  pub fn from_env() -> Self {
    let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty());
    if database_url.is_none() {
      warn!(target: "ydkb_backend", "DATABASE_URL not set; using the in-memory seeded store");
    }

    Self {
      port: env_or("PORT", 3000),
      database_url,
      db_max_connections: env_or("DB_MAX_CONNECTIONS", 5),
      query_timeout: Duration::from_secs(env_or("QUERY_TIMEOUT_SECS", 10)),
      static_dir: std::env::var("STATIC_DIR").map(PathBuf::from).unwrap_or_else(|_| "./static".into()),
      game: load_game_settings_from_env().unwrap_or_default(),
    }
  }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T
where
  T::Err: std::fmt::Display,
{
  match std::env::var(key) {
    Ok(raw) => match raw.trim().parse() {
      Ok(v) => v,
      Err(e) => {
        warn!(target: "ydkb_backend", %key, value = %raw, error = %e, "Invalid value; using default");
        default
      }
    },
    Err(_) => default,
  }
}

/// Parse game settings from a TOML document with a `[game]` table.
pub fn parse_game_settings(src: &str) -> Result<GameSettings, toml::de::Error> {
  toml::from_str::<GameConfigFile>(src).map(|f| f.game)
}

/// Attempt to load `GameSettings` from GAME_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_game_settings_from_env() -> Option<GameSettings> {
  let path = std::env::var("GAME_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_game_settings(&s) {
      Ok(settings) => {
        info!(target: "ydkb_backend", %path, "Loaded game config (TOML)");
        Some(settings)
      }
      Err(e) => {
        error!(target: "ydkb_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "ydkb_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_toml_keeps_defaults() {
    let settings = parse_game_settings(
      r#"
        [game]
        shuffle_options = true

        [game.attempts]
        hard = 2
      "#,
    )
    .unwrap();

    assert!(settings.shuffle_options);
    assert_eq!(settings.candidate_pool_limit, 100);
    assert_eq!(settings.attempts, AttemptLimits { easy: 5, hard: 2, hall_of_fame: 3 });
  }

  #[test]
  fn empty_document_is_default() {
    let settings = parse_game_settings("").unwrap();
    assert_eq!(settings.college_search_min_len, 2);
    assert_eq!(settings.attempts.for_difficulty(Difficulty::HallOfFame), 3);
  }
}
