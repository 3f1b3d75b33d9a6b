pub mod assets;
pub mod booking;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy (`{module}` is `systemin`, `systemdefective` or
/// `systemout`):
///
/// ```text
/// /ws                              WebSocket event channel
///
/// /assets                          registry lookup (GET)
///
/// /{module}/init-booking           create/reclaim a draft (POST)
/// /{module}/detail                 booking + ledger snapshot (GET)
/// /{module}/list                   ledger only (GET)
/// /{module}/bookings               module list view (GET)
/// /{module}/generate-ref           reference number (POST)
/// /{module}/confirm                save header (POST)
/// /{module}/finalize               finalize (POST)
/// /{module}/unlock                 reopen finalized (POST, capability-gated)
/// /{module}/cancel                 cancel empty draft (POST)
/// /{module}/confirm-output         hard-finalize (POST)
/// /{module}/scan                   record a scan (POST)
/// /{module}/return                 bulk return by entry ids (POST)
/// /{module}/return-single          return one asset by code (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .merge(assets::router())
        .merge(booking::router())
}
