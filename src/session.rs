//! Client-side game session: attempts, guesses and feedback for one
//! (date, player) pairing, persisted to key/value storage on every transition.
//!
//! Saved state lives under `game-<date>-<playerId>` as JSON:
//! `{attempts, correctGuess, gaveUp, guesses, gameComplete, feedback}`.
//!
//! Status transitions:
//!   Idle --select_difficulty--> Playing (or the rehydrated terminal state)
//!   Playing --correct guess--> Won
//!   Playing --last attempt wrong--> Lost
//!   Playing --give_up--> GaveUp

use std::{
  collections::HashMap,
  fs,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AttemptLimits;
use crate::domain::{Challenge, Difficulty};
use crate::hint::{generate_hint, is_correct_guess, CORRECT_FEEDBACK};

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("storage io error: {0}")]
  Io(#[from] io::Error),
  #[error("storage lock poisoned")]
  Poisoned,
}

#[derive(Debug, Error)]
pub enum SessionError {
  #[error("no game in progress (status: {0:?})")]
  NotPlaying(GameStatus),
  #[error("failed to encode game state: {0}")]
  Encode(#[from] serde_json::Error),
  #[error(transparent)]
  Storage(#[from] StorageError),
}

/// Browser-style local storage: string keys to string values.
pub trait LocalStorage {
  fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
  fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
  fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Default)]
pub struct MemoryStorage {
  items: Mutex<HashMap<String, String>>,
}

impl LocalStorage for MemoryStorage {
  fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
    let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
    Ok(items.get(key).cloned())
  }

  fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
    let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
    items.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove_item(&self, key: &str) -> Result<(), StorageError> {
    let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
    items.remove(key);
    Ok(())
  }
}

/// One `<key>.json` file per item inside a directory.
pub struct FileStorage {
  dir: PathBuf,
}

impl FileStorage {
  pub fn new(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
    fs::create_dir_all(dir.as_ref())?;
    Ok(Self { dir: dir.as_ref().to_path_buf() })
  }

  fn path_for(&self, key: &str) -> PathBuf {
    let safe: String = key
      .chars()
      .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
      .collect();
    self.dir.join(format!("{safe}.json"))
  }
}

impl LocalStorage for FileStorage {
  fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
    match fs::read_to_string(self.path_for(key)) {
      Ok(s) => Ok(Some(s)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
    fs::write(self.path_for(key), value)?;
    Ok(())
  }

  fn remove_item(&self, key: &str) -> Result<(), StorageError> {
    match fs::remove_file(self.path_for(key)) {
      Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
      _ => Ok(()),
    }
  }
}

pub fn storage_key(date: NaiveDate, player_id: i64) -> String {
  format!("game-{}-{}", date.format("%Y-%m-%d"), player_id)
}

/// Persisted shape of a session.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
  pub attempts: u32,
  pub correct_guess: bool,
  pub gave_up: bool,
  #[serde(default)]
  pub guesses: Vec<String>,
  pub game_complete: bool,
  #[serde(default)]
  pub feedback: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
  Idle,
  Playing,
  Won,
  Lost,
  GaveUp,
}

impl GameStatus {
  pub fn is_terminal(&self) -> bool {
    matches!(self, GameStatus::Won | GameStatus::Lost | GameStatus::GaveUp)
  }

  fn from_saved(saved: &SavedGame) -> Self {
    if saved.correct_guess {
      GameStatus::Won
    } else if saved.gave_up {
      GameStatus::GaveUp
    } else if saved.game_complete {
      GameStatus::Lost
    } else {
      GameStatus::Playing
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
  Correct,
  Incorrect { hint: String, attempts_remaining: u32 },
  /// Last attempt used; the game is lost.
  OutOfAttempts { hint: String },
  /// Same guess already made; nothing changed.
  Duplicate,
}

struct ActiveGame {
  difficulty: Difficulty,
  player_id: i64,
  max_attempts: u32,
}

pub struct GameSession<S: LocalStorage> {
  storage: S,
  date: NaiveDate,
  limits: AttemptLimits,
  status: GameStatus,
  active: Option<ActiveGame>,
  state: SavedGame,
}

impl<S: LocalStorage> GameSession<S> {
  pub fn new(storage: S, date: NaiveDate, limits: AttemptLimits) -> Self {
    Self {
      storage,
      date,
      limits,
      status: GameStatus::Idle,
      active: None,
      state: SavedGame::default(),
    }
  }

  pub fn status(&self) -> GameStatus {
    self.status
  }

  pub fn state(&self) -> &SavedGame {
    &self.state
  }

  pub fn difficulty(&self) -> Option<Difficulty> {
    self.active.as_ref().map(|a| a.difficulty)
  }

  pub fn max_attempts(&self) -> u32 {
    self.active.as_ref().map(|a| a.max_attempts).unwrap_or(0)
  }

  pub fn attempts_remaining(&self) -> u32 {
    self.max_attempts().saturating_sub(self.state.attempts)
  }

  pub fn into_storage(self) -> S {
    self.storage
  }

  fn key(&self) -> Option<String> {
    self.active.as_ref().map(|a| storage_key(self.date, a.player_id))
  }

  fn persist(&self) -> Result<(), SessionError> {
    if let Some(key) = self.key() {
      let json = serde_json::to_string(&self.state)?;
      self.storage.set_item(&key, &json)?;
      debug!(target: "ydkb_backend", %key, status = ?self.status, "Game state saved");
    }
    Ok(())
  }

  /// Start (or resume) the game for one tier's player.
  pub fn select_difficulty(
    &mut self,
    difficulty: Difficulty,
    player_id: i64,
  ) -> Result<GameStatus, SessionError> {
    let key = storage_key(self.date, player_id);
    let saved = match self.storage.get_item(&key)? {
      Some(raw) => serde_json::from_str::<SavedGame>(&raw).unwrap_or_else(|e| {
        warn!(target: "ydkb_backend", %key, error = %e, "Discarding unreadable game state");
        SavedGame::default()
      }),
      None => SavedGame::default(),
    };

    let max_attempts = self.limits.for_difficulty(difficulty);
    let mut saved = saved;
    if !saved.game_complete && saved.attempts >= max_attempts {
      // Saved under a larger budget; no attempts left under this one.
      warn!(target: "ydkb_backend", %key, attempts = saved.attempts, max_attempts, "Saved game has no attempts left");
      saved.game_complete = true;
    }

    self.active = Some(ActiveGame { difficulty, player_id, max_attempts });
    self.status = GameStatus::from_saved(&saved);
    self.state = saved;
    self.persist()?;
    Ok(self.status)
  }

  /// Start (or resume) the game for the given tier of a daily challenge.
  pub fn select_challenge_tier(
    &mut self,
    challenge: &Challenge,
    difficulty: Difficulty,
  ) -> Result<GameStatus, SessionError> {
    self.select_difficulty(difficulty, challenge.player_id_for(difficulty))
  }

  pub fn make_guess(&mut self, guess: &str, answer: &str) -> Result<GuessOutcome, SessionError> {
    if self.status != GameStatus::Playing {
      return Err(SessionError::NotPlaying(self.status));
    }
    if self.state.guesses.iter().any(|g| g == guess) {
      return Ok(GuessOutcome::Duplicate);
    }

    self.state.guesses.push(guess.to_string());
    self.state.attempts += 1;

    let outcome = if is_correct_guess(guess, answer) {
      self.state.feedback.push(CORRECT_FEEDBACK.to_string());
      self.state.correct_guess = true;
      self.state.game_complete = true;
      self.status = GameStatus::Won;
      GuessOutcome::Correct
    } else {
      let hint = generate_hint(guess, answer);
      self.state.feedback.push(hint.clone());
      if self.state.attempts >= self.max_attempts() {
        self.state.game_complete = true;
        self.status = GameStatus::Lost;
        GuessOutcome::OutOfAttempts { hint }
      } else {
        GuessOutcome::Incorrect { hint, attempts_remaining: self.attempts_remaining() }
      }
    };

    self.persist()?;
    Ok(outcome)
  }

  /// Ends a game in progress; terminal states are returned unchanged.
  pub fn give_up(&mut self) -> Result<GameStatus, SessionError> {
    match self.status {
      GameStatus::Playing => {
        self.state.gave_up = true;
        self.state.game_complete = true;
        self.status = GameStatus::GaveUp;
        self.persist()?;
        Ok(self.status)
      }
      GameStatus::Idle => Err(SessionError::NotPlaying(GameStatus::Idle)),
      terminal => Ok(terminal),
    }
  }

  /// Forget the saved state for the current player and start over.
  pub fn reset(&mut self) -> Result<GameStatus, SessionError> {
    let Some(key) = self.key() else {
      return Err(SessionError::NotPlaying(self.status));
    };
    self.storage.remove_item(&key)?;
    self.state = SavedGame::default();
    self.status = GameStatus::Playing;
    Ok(self.status)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ANSWER: &str = "Davidson College";

  fn date() -> NaiveDate {
    "2024-02-15".parse().unwrap()
  }

  fn session() -> GameSession<MemoryStorage> {
    GameSession::new(MemoryStorage::default(), date(), AttemptLimits::default())
  }

  #[test]
  fn key_format() {
    assert_eq!(storage_key(date(), 42), "game-2024-02-15-42");
  }

  #[test]
  fn correct_guess_wins_case_insensitively() {
    let mut s = session();
    assert_eq!(s.select_difficulty(Difficulty::Easy, 1).unwrap(), GameStatus::Playing);
    assert_eq!(s.make_guess("davidson college", ANSWER).unwrap(), GuessOutcome::Correct);
    assert_eq!(s.status(), GameStatus::Won);
    assert_eq!(s.state().feedback, vec!["Correct!".to_string()]);
    assert!(matches!(s.make_guess("x", ANSWER), Err(SessionError::NotPlaying(GameStatus::Won))));
  }

  #[test]
  fn exhausting_attempts_loses() {
    let mut s = session();
    s.select_difficulty(Difficulty::HallOfFame, 20).unwrap();
    let max = s.max_attempts();
    assert_eq!(max, 3);

    for i in 0..max {
      let outcome = s.make_guess(&format!("Wrong {i}"), ANSWER).unwrap();
      if i + 1 < max {
        assert!(matches!(outcome, GuessOutcome::Incorrect { .. }));
      } else {
        assert!(matches!(outcome, GuessOutcome::OutOfAttempts { .. }));
      }
    }

    assert_eq!(s.status(), GameStatus::Lost);
    assert!(s.state().game_complete);
    assert!(!s.state().correct_guess);
    assert_eq!(s.state().attempts, max);
  }

  #[test]
  fn duplicate_guess_does_not_cost_an_attempt() {
    let mut s = session();
    s.select_difficulty(Difficulty::Hard, 10).unwrap();
    s.make_guess("Gonzaga", ANSWER).unwrap();
    assert_eq!(s.make_guess("Gonzaga", ANSWER).unwrap(), GuessOutcome::Duplicate);
    assert_eq!(s.state().attempts, 1);
    assert_eq!(s.attempts_remaining(), 3);
  }

  #[test]
  fn give_up_is_terminal_with_attempts_left() {
    let mut s = session();
    s.select_difficulty(Difficulty::Easy, 1).unwrap();
    s.make_guess("Gonzaga", ANSWER).unwrap();
    assert_eq!(s.give_up().unwrap(), GameStatus::GaveUp);
    assert!(s.status().is_terminal());
    assert!(s.state().gave_up && s.state().game_complete);
    // A second give-up leaves the terminal state alone.
    assert_eq!(s.give_up().unwrap(), GameStatus::GaveUp);
  }

  #[test]
  fn give_up_without_a_game_is_rejected() {
    let mut s = session();
    assert!(matches!(s.give_up(), Err(SessionError::NotPlaying(GameStatus::Idle))));
  }

  #[test]
  fn saved_state_round_trips_through_storage() {
    let mut s = session();
    s.select_difficulty(Difficulty::Easy, 1).unwrap();
    s.make_guess("Gonzaga", ANSWER).unwrap();
    s.make_guess("Harvard University", ANSWER).unwrap();
    let before = s.state().clone();

    let storage = s.into_storage();
    let mut reloaded = GameSession::new(storage, date(), AttemptLimits::default());
    assert_eq!(reloaded.select_difficulty(Difficulty::Easy, 1).unwrap(), GameStatus::Playing);

    assert_eq!(reloaded.state(), &before);
    assert_eq!(reloaded.state().guesses, vec!["Gonzaga", "Harvard University"]);
    assert_eq!(reloaded.state().feedback.len(), 2);
  }

  #[test]
  fn saved_json_uses_camel_case_keys() {
    let mut s = session();
    s.select_difficulty(Difficulty::Easy, 1).unwrap();
    s.give_up().unwrap();

    let raw = s.into_storage().get_item("game-2024-02-15-1").unwrap().unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["gaveUp"], true);
    assert_eq!(v["gameComplete"], true);
    assert_eq!(v["correctGuess"], false);
  }

  #[test]
  fn terminal_state_is_rehydrated() {
    let storage = MemoryStorage::default();
    storage
      .set_item(
        "game-2024-02-15-1",
        r#"{"attempts":5,"correctGuess":false,"gaveUp":false,"guesses":[],"gameComplete":true,"feedback":[]}"#,
      )
      .unwrap();
    let mut s = GameSession::new(storage, date(), AttemptLimits::default());
    assert_eq!(s.select_difficulty(Difficulty::Easy, 1).unwrap(), GameStatus::Lost);
  }

  #[test]
  fn saved_game_over_the_budget_is_lost() {
    let storage = MemoryStorage::default();
    storage
      .set_item(
        "game-2024-02-15-20",
        r#"{"attempts":3,"correctGuess":false,"gaveUp":false,"guesses":["a","b","c"],"gameComplete":false,"feedback":[]}"#,
      )
      .unwrap();
    let mut s = GameSession::new(storage, date(), AttemptLimits::default());
    assert_eq!(s.select_difficulty(Difficulty::HallOfFame, 20).unwrap(), GameStatus::Lost);
    assert!(s.state().game_complete);
    assert_eq!(s.attempts_remaining(), 0);

    assert!(matches!(s.make_guess("d", ANSWER), Err(SessionError::NotPlaying(GameStatus::Lost))));
    assert_eq!(s.state().attempts, 3);

    let raw = s.into_storage().get_item("game-2024-02-15-20").unwrap().unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["gameComplete"], true);
  }

  #[test]
  fn lowered_limit_ends_a_resumed_game() {
    let mut s = session();
    s.select_difficulty(Difficulty::Easy, 1).unwrap();
    for guess in ["a", "b", "c"] {
      s.make_guess(guess, ANSWER).unwrap();
    }

    let limits = AttemptLimits { easy: 2, ..AttemptLimits::default() };
    let mut s = GameSession::new(s.into_storage(), date(), limits);
    assert_eq!(s.select_difficulty(Difficulty::Easy, 1).unwrap(), GameStatus::Lost);
    assert_eq!(s.state().attempts, 3);
  }

  #[test]
  fn challenge_tier_selects_that_tiers_player() {
    let challenge = Challenge {
      id: 7,
      challenge_date: date(),
      easy_player_id: 1,
      hard_player_id: 10,
      hof_player_id: 20,
      created_at: chrono::Utc::now(),
    };
    let mut s = session();
    s.select_challenge_tier(&challenge, Difficulty::HallOfFame).unwrap();
    s.make_guess("Gonzaga", "Indiana State University").unwrap();
    assert_eq!(s.difficulty(), Some(Difficulty::HallOfFame));
    assert_eq!(s.max_attempts(), 3);

    let storage = s.into_storage();
    assert!(storage.get_item("game-2024-02-15-20").unwrap().is_some());
    assert!(storage.get_item("game-2024-02-15-1").unwrap().is_none());
  }

  #[test]
  fn corrupt_saved_state_is_discarded() {
    let storage = MemoryStorage::default();
    storage.set_item("game-2024-02-15-1", "{not json").unwrap();
    let mut s = GameSession::new(storage, date(), AttemptLimits::default());
    assert_eq!(s.select_difficulty(Difficulty::Easy, 1).unwrap(), GameStatus::Playing);
    assert_eq!(s.state(), &SavedGame::default());
  }

  #[test]
  fn reset_clears_storage() {
    let mut s = session();
    s.select_difficulty(Difficulty::Easy, 1).unwrap();
    s.make_guess("Gonzaga", ANSWER).unwrap();
    assert_eq!(s.reset().unwrap(), GameStatus::Playing);
    assert_eq!(s.state().attempts, 0);
    assert!(s.into_storage().get_item("game-2024-02-15-1").unwrap().is_none());
  }

  #[test]
  fn file_storage_persists_between_instances() {
    let dir = tempfile::tempdir().unwrap();
    {
      let mut s = GameSession::new(FileStorage::new(dir.path()).unwrap(), date(), AttemptLimits::default());
      s.select_difficulty(Difficulty::Hard, 10).unwrap();
      s.make_guess("Gonzaga", "Weber State University").unwrap();
    }
    let mut s = GameSession::new(FileStorage::new(dir.path()).unwrap(), date(), AttemptLimits::default());
    s.select_difficulty(Difficulty::Hard, 10).unwrap();
    assert_eq!(s.state().guesses, vec!["Gonzaga"]);
    assert!(dir.path().join("game-2024-02-15-10.json").exists());
  }
}
