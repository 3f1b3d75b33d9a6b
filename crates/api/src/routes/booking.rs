use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{booking, scan};
use crate::state::AppState;

/// Mount the per-module booking workflow routes. The `{module}` path
/// segment deserializes into `ModuleKind`, so an unknown module name is a
/// 400 before any handler runs.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{module}/init-booking", post(booking::init_booking))
        .route("/{module}/detail", get(booking::booking_detail))
        .route("/{module}/list", get(booking::ledger_list))
        .route("/{module}/bookings", get(booking::booking_list))
        .route("/{module}/generate-ref", post(booking::generate_ref))
        .route("/{module}/confirm", post(booking::confirm_header))
        .route("/{module}/finalize", post(booking::finalize))
        .route("/{module}/unlock", post(booking::unlock))
        .route("/{module}/cancel", post(booking::cancel))
        .route("/{module}/confirm-output", post(booking::confirm_output))
        .route("/{module}/scan", post(scan::scan))
        .route("/{module}/return", post(scan::return_assets))
        .route("/{module}/return-single", post(scan::return_single))
}
