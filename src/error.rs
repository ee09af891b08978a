//! Error types for challenge operations and the HTTP boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::error;

use crate::domain::Difficulty;
use crate::protocol::ErrorOut;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ChallengeError {
    #[error("Failed to fetch {0} players: No players found")]
    EmptyPool(Difficulty),

    #[error("Failed to fetch {tier} players: {source}")]
    PoolQuery {
        tier: Difficulty,
        #[source]
        source: StoreError,
    },

    #[error("Failed to create challenge: {0}")]
    Insert(#[source] StoreError),

    #[error("No challenge found for {0}")]
    NotFound(NaiveDate),

    #[error("Missing player data for challenge")]
    MissingPlayers,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Challenge(#[from] ChallengeError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::Challenge(ChallengeError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Challenge(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Challenge(ChallengeError::NotFound(_)) => {
                "No challenge found for this date".into()
            }
            AppError::Challenge(ChallengeError::Store(_)) => "Error loading challenge data".into(),
            AppError::Store(_) => "Database request failed".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(target: "ydkb_backend", error = %self, "Request failed");
        }
        (status, Json(ErrorOut { error: self.public_message() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404_with_generic_message() {
        let err = AppError::from(ChallengeError::NotFound("2024-02-15".parse().unwrap()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "No challenge found for this date");
    }

    #[test]
    fn empty_pool_names_the_tier() {
        let err = AppError::from(ChallengeError::EmptyPool(Difficulty::Hard));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Failed to fetch Hard players: No players found");
    }

    #[test]
    fn bad_request_is_400() {
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    }
}
