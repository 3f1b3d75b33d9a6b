//! Bridge from the event bus to the WebSocket sessions.
//!
//! A single task subscribes to the bus and fans every event out to all
//! connected sessions as a JSON Text frame. Clients filter on `channel`
//! and `draft_id` themselves, so the server keeps no per-session
//! subscription state.

use std::sync::Arc;

use smartpack_events::EventBus;
use tokio::sync::broadcast::error::RecvError;

use crate::ws::manager::WsManager;

/// Spawn the broadcaster task.
///
/// Runs until the event bus is dropped (broadcast channel closed). A
/// `Lagged` error means this task fell behind the publish rate; the skipped
/// events are logged and lost, and clients resynchronize via the detail
/// endpoint on their next interaction.
pub fn start_broadcaster(
    ws_manager: Arc<WsManager>,
    event_bus: Arc<EventBus>,
) -> tokio::task::JoinHandle<()> {
    let mut rx = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let delivered = ws_manager.broadcast_event(&event).await;
                    tracing::debug!(
                        channel = %event.channel,
                        action = ?event.action,
                        draft_id = %event.draft_id,
                        delivered,
                        "Broadcast booking event"
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event broadcaster lagged; events dropped");
                }
                Err(RecvError::Closed) => {
                    tracing::info!("Event bus closed, stopping broadcaster");
                    break;
                }
            }
        }
    })
}
