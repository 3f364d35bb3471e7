//! WebSocket endpoint for real-time clients
//!
//! Each connection gets an opaque id for the socket's lifetime. The select
//! loop forwards server broadcasts out (skipping frames the connection itself
//! originated) and feeds inbound client frames to the bus. A failed send
//! deregisters only this connection; the publish path never notices.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use shared::message::{BusMessage, HubEvent};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::core::ServerState;

/// GET /ws — upgrade to WebSocket
pub async fn ws_handler(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

async fn handle_connection(socket: WebSocket, state: ServerState) {
    let conn_id = Uuid::new_v4().to_string();
    let bus = state.bus.clone();

    bus.register(&conn_id);
    let mut rx = bus.subscribe();
    let shutdown = bus.shutdown_token().clone();
    let (mut ws_sink, mut ws_stream) = socket.split();

    loop {
        tokio::select! {
            // Server shutting down
            _ = shutdown.cancelled() => {
                tracing::debug!(conn = %conn_id, "Connection handler shutting down");
                break;
            }

            // Outbound: bus broadcast → this client
            out = rx.recv() => {
                match out {
                    Ok(msg) => {
                        // Loopback avoidance for relayed client frames
                        if msg.source.as_deref() == Some(conn_id.as_str()) {
                            continue;
                        }
                        let text = match msg.event.to_text() {
                            Ok(text) => text,
                            Err(e) => {
                                tracing::warn!(conn = %conn_id, "Failed to serialize event: {}", e);
                                continue;
                            }
                        };
                        if ws_sink.send(Message::Text(text.into())).await.is_err() {
                            tracing::info!(conn = %conn_id, "Send failed, dropping connection");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(conn = %conn_id, skipped, "Connection lagged behind broadcast");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            // Inbound: client frame → bus
            inbound = ws_stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        match HubEvent::from_text(&text) {
                            Ok(event) => {
                                bus.send_to_server(BusMessage::from_client(&conn_id, event));
                            }
                            Err(e) => {
                                tracing::warn!(conn = %conn_id, "Invalid client frame: {}", e);
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = ws_sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(conn = %conn_id, "Client closed connection");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(conn = %conn_id, "WebSocket error: {}", e);
                        break;
                    }
                    _ => {} // Binary, Pong — ignore
                }
            }
        }
    }

    // Send Close frame (best-effort) and drop the registration
    let _ = ws_sink.close().await;
    bus.deregister(&conn_id);
}
