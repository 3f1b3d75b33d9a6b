//! Keep-alive pings for long-lived scan-station sessions.
//!
//! Scan stations sit behind warehouse NAT gear that silently drops idle
//! TCP connections; periodic Ping frames keep the sessions alive and let
//! the station's browser notice a dead link without waiting for the next
//! booking event.

use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

/// Spawn the keep-alive task. `interval_secs` comes from
/// `ServerConfig::ws_heartbeat_secs`.
///
/// The task runs for the life of the process; `main` aborts the returned
/// handle during shutdown after the manager has closed every session.
pub fn start_heartbeat(ws_manager: Arc<WsManager>, interval_secs: u64) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

        loop {
            interval.tick().await;
            let stations = ws_manager.connection_count().await;
            if stations == 0 {
                continue;
            }
            tracing::debug!(stations, "pinging connected scan stations");
            ws_manager.ping_all().await;
        }
    })
}
