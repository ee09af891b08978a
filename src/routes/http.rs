//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs its parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{rejection::JsonRejection, Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{error, info, instrument, warn};

use crate::admin;
use crate::error::AppError;
use crate::generator::{ensure_challenge, ensure_week, DayStatus, Generated};
use crate::hint::generate_hint;
use crate::protocol::*;
use crate::reader::{load_daily, load_tier_players};
use crate::state::AppState;
use crate::util::{date_or_today, today, trunc_for_log};

const MAX_ADMIN_LIMIT: i64 = 100;
const DIAGNOSTIC_SAMPLE: i64 = 5;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_create_challenge(
  State(state): State<Arc<AppState>>,
  Query(q): Query<DateQuery>,
) -> Response {
  let date = match date_or_today(q.date.as_deref()) {
    Ok(d) => d,
    Err(e) => {
      let out = CreateChallengeOut { error: Some(e), ..Default::default() };
      return (StatusCode::BAD_REQUEST, Json(out)).into_response();
    }
  };

  match ensure_challenge(state.store.as_ref(), date, &state.settings).await {
    Ok(Generated::Existing(challenge)) => Json(CreateChallengeOut {
      success: false,
      message: Some("Challenge already exists for this date".into()),
      challenge: Some(challenge),
      ..Default::default()
    })
    .into_response(),
    Ok(Generated::Created(challenge)) => {
      let out = match load_tier_players(state.store.as_ref(), &challenge).await {
        Ok(players) => CreateChallengeOut {
          success: true,
          message: Some("Challenge created successfully".into()),
          challenge: Some(challenge),
          players: Some(players),
          ..Default::default()
        },
        Err(e) => {
          warn!(target: "challenge", %date, error = %e, "Created challenge but player lookup failed");
          CreateChallengeOut {
            success: true,
            message: Some("Challenge created but failed to fetch player details".into()),
            challenge: Some(challenge),
            ..Default::default()
          }
        }
      };
      info!(target: "challenge", %date, "HTTP create_challenge served");
      Json(out).into_response()
    }
    Err(e) => {
      error!(target: "challenge", %date, error = %e, "HTTP create_challenge failed");
      let out = CreateChallengeOut { error: Some(e.to_string()), ..Default::default() };
      (StatusCode::INTERNAL_SERVER_ERROR, Json(out)).into_response()
    }
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_daily_challenge(
  State(state): State<Arc<AppState>>,
  Query(q): Query<DateQuery>,
) -> Result<Json<DailyChallengeOut>, AppError> {
  let date = date_or_today(q.date.as_deref()).map_err(AppError::BadRequest)?;
  let daily = load_daily(state.store.as_ref(), date, &state.settings).await?;
  info!(target: "challenge", %date, id = daily.challenge_id, "HTTP daily_challenge served");
  Ok(Json(daily.into()))
}

#[instrument(level = "info", skip(body))]
pub async fn http_post_hint(
  body: Result<Json<HintIn>, JsonRejection>,
) -> Result<Json<HintOut>, AppError> {
  let Json(body) = body.map_err(|rejection| {
    warn!(target: "challenge", error = %rejection.body_text(), "Rejected hint body");
    AppError::BadRequest("Missing guess or answer".into())
  })?;
  let (guess, answer) = match (body.guess, body.answer) {
    (Some(g), Some(a)) if !g.is_empty() && !a.is_empty() => (g, a),
    _ => return Err(AppError::BadRequest("Missing guess or answer".into())),
  };
  let hint = generate_hint(&guess, &answer);
  info!(target: "challenge", guess = %trunc_for_log(&guess, 64), "HTTP hint served");
  Ok(Json(HintOut { hint }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_colleges(
  State(state): State<Arc<AppState>>,
  Query(q): Query<CollegeQuery>,
) -> Result<Json<CollegesOut>, AppError> {
  let term = q.search.unwrap_or_default();
  if term.chars().count() < state.settings.college_search_min_len {
    return Ok(Json(Vec::new()));
  }
  let found = state.store.search_colleges(&term, state.settings.college_search_limit).await?;
  Ok(Json(found))
}

#[instrument(level = "info", skip(state))]
pub async fn http_test_connection(State(state): State<Arc<AppState>>) -> Response {
  let store = state.store.as_ref();

  let (players_count, players_sample) =
    match tokio::try_join!(store.count_players(), store.list_players(DIAGNOSTIC_SAMPLE)) {
      Ok(v) => v,
      Err(e) => {
        error!(target: "ydkb_backend", error = %e, "Players table unreachable");
        let out = TestConnectionFailedOut {
          success: false,
          error: e.to_string(),
          details: "Failed to query players table",
        };
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(out)).into_response();
      }
    };

  let colleges = match tokio::try_join!(store.count_colleges(), store.list_colleges(DIAGNOSTIC_SAMPLE)) {
    Ok((count, sample)) => TableReport { exists: true, count: Some(count), sample },
    Err(e) => {
      warn!(target: "ydkb_backend", error = %e, "Colleges table unreachable");
      TableReport { exists: false, count: Some(0), sample: Vec::new() }
    }
  };

  let daily_challenges = match store.recent_challenges(1).await {
    Ok(sample) => TableReport { exists: true, count: None, sample },
    Err(e) => {
      warn!(target: "ydkb_backend", error = %e, "Daily challenges table unreachable");
      TableReport { exists: false, count: None, sample: Vec::new() }
    }
  };

  Json(TestConnectionOut {
    success: true,
    connection: "Successful",
    tables: TablesOut {
      players: TableReport { exists: true, count: Some(players_count), sample: players_sample },
      colleges,
      daily_challenges,
    },
    env: EnvOut {
      database: if state.database_configured { "Defined" } else { "Missing" },
      mode: store.backend(),
    },
  })
  .into_response()
}

#[instrument(level = "info", skip(state))]
pub async fn http_admin_list(
  State(state): State<Arc<AppState>>,
  Query(q): Query<LimitQuery>,
) -> Result<Json<Vec<ChallengeWithPlayersOut>>, AppError> {
  let limit = q.limit.unwrap_or(state.settings.recent_challenges_limit).clamp(1, MAX_ADMIN_LIMIT);
  let rows = admin::recent_challenges(state.store.as_ref(), limit).await?;
  Ok(Json(rows))
}

#[instrument(level = "info", skip(state))]
pub async fn http_admin_delete(
  State(state): State<Arc<AppState>>,
  Path(id): Path<i64>,
) -> Result<Json<MessageOut>, AppError> {
  if !admin::delete_challenge(state.store.as_ref(), id).await? {
    return Err(AppError::NotFound(format!("Challenge {id} not found")));
  }
  Ok(Json(MessageOut { success: true, message: "Challenge deleted successfully".into() }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_admin_week(State(state): State<Arc<AppState>>) -> Json<WeekOut> {
  let results = ensure_week(
    state.store.as_ref(),
    today(),
    state.settings.week_ahead_days,
    &state.settings,
  )
  .await;

  let errors = results.iter().filter(|r| r.status == DayStatus::Error).count();
  let verified = results.len() - errors;
  info!(target: "challenge", verified, errors, "HTTP admin week served");

  Json(WeekOut {
    success: errors == 0,
    message: format!("Created/verified {verified} challenges. Errors: {errors}"),
    results,
  })
}
