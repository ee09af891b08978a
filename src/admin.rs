//! Admin operations: recent challenges with their players, and deletion.

use tracing::{info, instrument};

use crate::domain::Player;
use crate::protocol::ChallengeWithPlayersOut;
use crate::store::{GameStore, StoreError};

/// Newest challenges first, each joined with its tier players.
/// Players that no longer exist are reported as `None`.
#[instrument(level = "info", skip(store))]
pub async fn recent_challenges(
  store: &dyn GameStore,
  limit: i64,
) -> Result<Vec<ChallengeWithPlayersOut>, StoreError> {
  let challenges = store.recent_challenges(limit).await?;

  let mut ids: Vec<i64> = challenges.iter().flat_map(|c| c.player_ids()).collect();
  ids.sort_unstable();
  ids.dedup();
  let players = if ids.is_empty() { Vec::new() } else { store.players_by_ids(&ids).await? };

  let find = |id: i64| -> Option<Player> { players.iter().find(|p| p.id == id).cloned() };

  Ok(challenges
    .into_iter()
    .map(|c| ChallengeWithPlayersOut {
      easy_player: find(c.easy_player_id),
      hard_player: find(c.hard_player_id),
      hof_player: find(c.hof_player_id),
      challenge: c,
    })
    .collect())
}

#[instrument(level = "info", skip(store))]
pub async fn delete_challenge(store: &dyn GameStore, id: i64) -> Result<bool, StoreError> {
  let deleted = store.delete_challenge(id).await?;
  info!(target: "challenge", id, deleted, "Challenge delete requested");
  Ok(deleted)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::NewChallenge;
  use crate::store::MemoryStore;

  #[tokio::test]
  async fn listing_joins_players() {
    let store = MemoryStore::seeded();
    store
      .insert_challenge(NewChallenge {
        challenge_date: "2024-02-15".parse().unwrap(),
        easy_player_id: 1,
        hard_player_id: 10,
        hof_player_id: 404,
      })
      .await
      .unwrap();

    let rows = recent_challenges(&store, 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].easy_player.as_ref().map(|p| p.name.as_str()), Some("Stephen Curry"));
    assert!(rows[0].hof_player.is_none());
  }

  #[tokio::test]
  async fn delete_reports_missing_rows() {
    let store = MemoryStore::seeded();
    let c = store
      .insert_challenge(NewChallenge {
        challenge_date: "2024-02-15".parse().unwrap(),
        easy_player_id: 1,
        hard_player_id: 10,
        hof_player_id: 11,
      })
      .await
      .unwrap();

    assert!(delete_challenge(&store, c.id).await.unwrap());
    assert!(!delete_challenge(&store, c.id).await.unwrap());
  }
}
