//! Seed data for the in-memory store.

use crate::domain::{College, Difficulty, Player};

fn player(
  id: i64,
  name: &str,
  college: &str,
  position: &str,
  difficulty: Difficulty,
  team: &str,
  jersey_number: i32,
  ppg: f64,
) -> Player {
  Player {
    id,
    name: name.into(),
    college: college.into(),
    position: position.into(),
    difficulty,
    team: Some(team.into()),
    jersey_number: Some(jersey_number),
    ppg: Some(ppg),
  }
}

/// Minimal player pool: enough for every tier so the app is playable without a database.
pub fn seed_players() -> Vec<Player> {
  use Difficulty::*;
  vec![
    player(1, "Stephen Curry", "Davidson College", "PG", Easy, "Golden State Warriors", 30, 24.8),
    player(2, "Kevin Durant", "University of Texas at Austin", "SF", Easy, "Phoenix Suns", 35, 27.3),
    player(3, "Zion Williamson", "Duke University", "PF", Easy, "New Orleans Pelicans", 1, 24.7),
    player(4, "Jayson Tatum", "Duke University", "SF", Easy, "Boston Celtics", 0, 23.1),
    player(10, "Damian Lillard", "Weber State University", "PG", Hard, "Milwaukee Bucks", 0, 25.1),
    player(11, "Khris Middleton", "Texas A&M University", "SF", Hard, "Milwaukee Bucks", 22, 18.7),
    player(12, "Pascal Siakam", "New Mexico State University", "PF", Hard, "Indiana Pacers", 43, 17.9),
    player(20, "Michael Jordan", "University of North Carolina", "SG", HallOfFame, "Chicago Bulls", 23, 30.1),
    player(21, "Larry Bird", "Indiana State University", "SF", HallOfFame, "Boston Celtics", 33, 24.3),
  ]
}

pub fn seed_colleges() -> Vec<College> {
  [
    "Harvard University",
    "Stanford University",
    "Massachusetts Institute of Technology",
    "Yale University",
    "Princeton University",
    "University of California, Berkeley",
    "University of Michigan",
    "Duke University",
    "Columbia University",
    "University of Pennsylvania",
    "Cornell University",
    "University of Chicago",
    "Northwestern University",
    "Johns Hopkins University",
    "California Institute of Technology",
    "University of California, Los Angeles",
    "University of Wisconsin-Madison",
    "University of Texas at Austin",
    "New York University",
    "University of Washington",
    "Davidson College",
    "Weber State University",
    "Texas A&M University",
    "New Mexico State University",
    "University of North Carolina",
    "Indiana State University",
  ]
  .into_iter()
  .enumerate()
  .map(|(i, name)| College { id: i as i64 + 1, name: name.into() })
  .collect()
}
