use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database answered a probe query.
    pub db_healthy: bool,
    /// Scan stations currently attached to the event feed.
    pub stations_connected: usize,
    /// Distinct drafts the mutation-lock registry has served.
    pub drafts_tracked: usize,
}

/// GET /health -- database reachability plus the live workflow signals a
/// deployment dashboard watches (attached stations, drafts seen).
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = smartpack_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        stations_connected: state.ws_manager.connection_count().await,
        drafts_tracked: state.draft_locks.len().await,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
