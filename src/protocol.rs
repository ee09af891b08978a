//! Public protocol structs for the HTTP endpoints (serde ready).
//! Field names match what the web client already reads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Challenge, College, Player};
use crate::generator::DayOutcome;
use crate::reader::{DailyChallenge, TierPlayers};

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct CreateChallengeOut {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<Challenge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<TierPlayers>,
}

/// Option card shown to the player.
#[derive(Debug, Serialize)]
pub struct OptionOut {
    pub id: i64,
    pub name: String,
    pub team: Option<String>,
    pub position: String,
    pub jersey_number: Option<i32>,
    pub ppg: Option<f64>,
    pub college: String,
}

impl From<&Player> for OptionOut {
    fn from(p: &Player) -> Self {
        OptionOut {
            id: p.id,
            name: p.name.clone(),
            team: p.team.clone(),
            position: p.position.clone(),
            jersey_number: p.jersey_number,
            ppg: p.ppg,
            college: p.college.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DailyChallengeOut {
    pub date: NaiveDate,
    pub challenge_id: i64,
    pub players: TierPlayers,
    pub question: String,
    pub options: Vec<OptionOut>,
    #[serde(rename = "correctOption")]
    pub correct_option: usize,
}

impl From<DailyChallenge> for DailyChallengeOut {
    fn from(d: DailyChallenge) -> Self {
        DailyChallengeOut {
            date: d.date,
            challenge_id: d.challenge_id,
            options: d.options.iter().map(OptionOut::from).collect(),
            players: d.players,
            question: d.question,
            correct_option: d.correct_option,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HintIn {
    #[serde(default)]
    pub guess: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HintOut {
    pub hint: String,
}

#[derive(Debug, Deserialize)]
pub struct CollegeQuery {
    pub search: Option<String>,
}

pub type CollegesOut = Vec<College>;

#[derive(Debug, Serialize)]
pub struct TableReport<T: Serialize> {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    pub sample: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct TablesOut {
    pub players: TableReport<Player>,
    pub colleges: TableReport<College>,
    #[serde(rename = "dailyChallenges")]
    pub daily_challenges: TableReport<Challenge>,
}

#[derive(Debug, Serialize)]
pub struct EnvOut {
    pub database: &'static str,
    /// Storage backend in use ("postgres" or "memory").
    pub mode: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TestConnectionOut {
    pub success: bool,
    pub connection: &'static str,
    pub tables: TablesOut,
    pub env: EnvOut,
}

#[derive(Debug, Serialize)]
pub struct TestConnectionFailedOut {
    pub success: bool,
    pub error: String,
    pub details: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// Admin listing row: the challenge plus its players, when they still exist.
#[derive(Debug, Serialize)]
pub struct ChallengeWithPlayersOut {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub easy_player: Option<Player>,
    pub hard_player: Option<Player>,
    pub hof_player: Option<Player>,
}

#[derive(Debug, Serialize)]
pub struct MessageOut {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct WeekOut {
    pub success: bool,
    pub message: String,
    pub results: Vec<DayOutcome>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
