//! WebSocket upgrade endpoint for the booking event feed.
//!
//! A connected client (a scan station or a list view) receives every
//! serialized `BookingEvent` and filters by `channel` / `draft_id` on its
//! side. The feed is outbound-only: inbound frames are connection
//! maintenance, never commands.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::manager::WsManager;

/// GET /api/v1/ws -- upgrade to the event feed.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_station(socket, state.ws_manager))
}

/// Drive one station session until either side hangs up.
///
/// One loop multiplexes the manager's outbound event queue and the
/// station's inbound frames; when the manager shuts down (its queue
/// closes after the Close frame is flushed) or the station disconnects,
/// the session is deregistered.
async fn serve_station(socket: WebSocket, ws_manager: Arc<WsManager>) {
    let station_id = uuid::Uuid::new_v4().to_string();
    let mut events = ws_manager.add(station_id.clone()).await;
    tracing::info!(station_id = %station_id, "scan station connected");

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outbound = events.recv() => {
                let Some(frame) = outbound else {
                    // Manager dropped the session (shutdown or replacement).
                    break;
                };
                if sink.send(frame).await.is_err() {
                    tracing::debug!(station_id = %station_id, "station sink closed");
                    break;
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Pong(_))) => {
                        tracing::trace!(station_id = %station_id, "keep-alive pong");
                    }
                    // The feed carries no inbound commands.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(station_id = %station_id, error = %e, "station receive error");
                        break;
                    }
                }
            }
        }
    }

    ws_manager.remove(&station_id).await;
    tracing::info!(station_id = %station_id, "scan station disconnected");
}
