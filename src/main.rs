//! YallDontKnowBall backend binary.
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   DATABASE_URL       : PostgreSQL url; in-memory seeded store when absent
//!   DB_MAX_CONNECTIONS : pool size (default 5)
//!   QUERY_TIMEOUT_SECS : per-query timeout (default 10)
//!   STATIC_DIR         : SPA directory (default ./static)
//!   GAME_CONFIG_PATH   : path to TOML game settings
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use ydkb_backend::config::AppConfig;
use ydkb_backend::routes::build_router;
use ydkb_backend::state::AppState;
use ydkb_backend::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = AppConfig::from_env();
  let state = Arc::new(AppState::from_config(&cfg).await?);

  let app = build_router(state, &cfg.static_dir);

  let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "ydkb_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "ydkb_backend", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  info!(target: "ydkb_backend", "Shutdown signal received");
}
