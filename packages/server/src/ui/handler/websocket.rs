//! WebSocket connection handlers — the connection gateway.
//!
//! Each connection is a small state machine: unregistered on connect,
//! registered after a valid `register` event. The gateway assigns a
//! connection id at upgrade, pushes the initial snapshots, then dispatches
//! inbound events to the usecases and serializes their snapshots back out.
//! No inbound payload can take the relay down: unparseable frames are
//! dropped with a log line and coerced-empty events are ignored.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::{
        ChatMessageDto, ClientEvent, HistoryMessage, LastSeenMessage, PresenceMessage, SeenMessage,
        TypingMessage,
    },
    ui::state::AppState,
    usecase::{InitialSnapshot, RegisterError, SendMessageError},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Connection ids are server-assigned; clients never choose them.
    let connection_id = ConnectionId::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This handles the outbound flow: frames produced by broadcasts (via the
/// rx channel) are sent to this client's WebSocket connection.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (mut sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive broadcasts, register
    // it with the pusher and take the initial snapshots.
    let (tx, rx) = mpsc::unbounded_channel();
    let snapshot = state
        .connect_usecase
        .execute(connection_id.clone(), tx)
        .await;
    tracing::info!("Connection '{}' established", connection_id);

    // Send the initial state: history, last-seen ledger, presence, typing.
    let initial_ok = send_initial_snapshot(&mut sender, &connection_id, snapshot).await;

    if initial_ok {
        let connection_id_for_recv = connection_id.clone();
        let state_for_recv = state.clone();

        // Spawn a task to receive events from this client
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
                        let event = match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(event) => event,
                            Err(e) => {
                                tracing::warn!("Dropping unparseable event: {}", e);
                                continue;
                            }
                        };
                        dispatch_event(&state_for_recv, &connection_id_for_recv, event).await;
                    }
                    Message::Ping(_) => {
                        tracing::debug!("Received ping");
                        // Ping/pong is handled automatically by the WebSocket protocol
                    }
                    Message::Close(_) => {
                        tracing::info!("Connection '{}' requested close", connection_id_for_recv);
                        break;
                    }
                    _ => {}
                }
            }
        });

        // Spawn a task to forward broadcasts to this client
        let mut send_task = pusher_loop(rx, sender);

        // If any one of the tasks completes, abort the other
        tokio::select! {
            _ = &mut recv_task => send_task.abort(),
            _ = &mut send_task => recv_task.abort(),
        };
    }

    // Disconnect: update ledger and registries, then notify the remaining
    // connections (ledger first, then presence and typing).
    let outcome = state.disconnect_usecase.execute(connection_id.clone()).await;

    if let Some(ledger) = outcome.last_seen {
        let ledger_json = serde_json::to_string(&LastSeenMessage::from(ledger)).unwrap();
        state.disconnect_usecase.broadcast(&ledger_json).await;
    }

    let presence_json = serde_json::to_string(&PresenceMessage::from(outcome.presence)).unwrap();
    state.disconnect_usecase.broadcast(&presence_json).await;

    let typing_json = serde_json::to_string(&TypingMessage::from(outcome.typing)).unwrap();
    state.disconnect_usecase.broadcast(&typing_json).await;

    tracing::info!("Connection '{}' disconnected", connection_id);
}

/// Send the four initial snapshot frames to a newly connected client.
///
/// Returns false if the socket died mid-send; the caller then skips straight
/// to disconnect handling.
async fn send_initial_snapshot(
    sender: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    connection_id: &ConnectionId,
    snapshot: InitialSnapshot,
) -> bool {
    let frames = [
        serde_json::to_string(&HistoryMessage::from(snapshot.history)).unwrap(),
        serde_json::to_string(&LastSeenMessage::from(snapshot.last_seen)).unwrap(),
        serde_json::to_string(&PresenceMessage::from(snapshot.presence)).unwrap(),
        serde_json::to_string(&TypingMessage::from(snapshot.typing)).unwrap(),
    ];

    for frame in frames {
        if let Err(e) = sender.send(Message::Text(frame.into())).await {
            tracing::error!(
                "Failed to send initial snapshot to '{}': {}",
                connection_id,
                e
            );
            return false;
        }
    }

    tracing::info!("Sent initial snapshot to '{}'", connection_id);
    true
}

/// Dispatch one inbound event to its usecase and fan out the result.
async fn dispatch_event(state: &Arc<AppState>, connection_id: &ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::Register { name } => {
            match state
                .register_usecase
                .execute(connection_id.clone(), &name)
                .await
            {
                Ok(presence) => {
                    let json = serde_json::to_string(&PresenceMessage::from(presence)).unwrap();
                    state.register_usecase.broadcast_presence(&json).await;
                    tracing::info!("Connection '{}' registered a display name", connection_id);
                }
                Err(RegisterError::EmptyName) => {
                    tracing::debug!(
                        "Ignoring registration with empty name from '{}'",
                        connection_id
                    );
                }
            }
        }
        ClientEvent::Message {
            name,
            text,
            timestamp,
        } => {
            match state
                .send_message_usecase
                .execute(connection_id.clone(), &name, &text, timestamp)
                .await
            {
                Ok(message) => {
                    let json = serde_json::to_string(&ChatMessageDto::from(message)).unwrap();
                    state.send_message_usecase.broadcast_message(&json).await;
                }
                Err(SendMessageError::EmptyText) => {
                    tracing::debug!("Dropping empty message from '{}'", connection_id);
                }
            }
        }
        ClientEvent::Typing { name, typing } => {
            let entries = state
                .typing_usecase
                .execute(connection_id.clone(), &name, typing)
                .await;
            let json = serde_json::to_string(&TypingMessage::from(entries)).unwrap();
            state.typing_usecase.broadcast_typing(&json).await;
        }
        ClientEvent::Seen { name, timestamp } => {
            let receipt = state
                .seen_usecase
                .execute(connection_id.clone(), &name, timestamp);
            let json = serde_json::to_string(&SeenMessage::from(receipt)).unwrap();
            state
                .seen_usecase
                .broadcast_to_others(connection_id, &json)
                .await;
        }
    }
}
