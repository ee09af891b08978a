//! YallDontKnowBall · daily college trivia backend
//!
//! - Axum HTTP API over the `players`, `colleges` and `daily_challenges` tables
//! - PostgreSQL via sqlx, or an in-memory seeded store when no database is configured
//! - Static SPA fallback (./static/index.html)

pub mod admin;
pub mod config;
pub mod domain;
pub mod error;
pub mod generator;
pub mod hint;
pub mod protocol;
pub mod reader;
pub mod routes;
pub mod seeds;
pub mod session;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod util;
