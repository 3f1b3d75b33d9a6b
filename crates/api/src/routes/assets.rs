use axum::routing::get;
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Mount the asset registry routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/assets", get(assets::lookup))
}
