//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::protocol::InboundEvent;

use super::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

pub async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this client to receive messages and register
    // the connection under a fresh server-side identity.
    let connection_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::unbounded_channel();
    state.registry.register(connection_id, tx).await;
    tracing::info!("Client '{}' connected and registered", connection_id);

    let state_clone = state.clone();

    // Task reading frames from this client. Frames are processed one at
    // a time: the router's fan-out for an event finishes before the next
    // frame is read, so a connection's stream stays FIFO.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match serde_json::from_str::<InboundEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            // Malformed frames are dropped; the
                            // connection keeps reading.
                            tracing::warn!(
                                "Dropping malformed frame from '{}': {}",
                                connection_id,
                                e
                            );
                            continue;
                        }
                    };

                    state_clone.router.handle_event(connection_id, event).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Task forwarding events from the router to this client's socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Idempotent: a failed delivery may already have removed this client.
    state.registry.unregister(connection_id).await;
    tracing::info!(
        "Client '{}' disconnected and removed from registry",
        connection_id
    );
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "connections": state.registry.count().await,
    }))
}
