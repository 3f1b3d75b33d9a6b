use std::sync::Arc;

use crate::config::ServerConfig;
use crate::locks::DraftLocks;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: smartpack_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (scan station clients).
    pub ws_manager: Arc<WsManager>,
    /// Event bus for publishing booking events.
    pub event_bus: Arc<smartpack_events::EventBus>,
    /// Per-draft mutation locks.
    pub draft_locks: Arc<DraftLocks>,
}
