//! WebSocket connection handler.
//!
//! Drives one connection through the protocol:
//! `Connecting` (token check, before the upgrade) → `Authenticated` (typed
//! commands dispatched one by one) → `Closed` (always unregisters exactly once).

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{
        Command, ConnectionId, RoomId, ServerEvent, UserId,
        event::{ROOM_LIMIT_MESSAGE, SEND_FAILED_MESSAGE},
    },
    infrastructure::dto::conversion::decode_command,
    ui::state::AppState,
    usecase::JoinRoomError,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Bearer token, used when no `Authorization` header is present
    pub token: Option<String>,
    /// Room to join right after the connection is acknowledged
    #[serde(rename = "roomId")]
    pub room_id: Option<String>,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme name is matched case-insensitively (RFC 7235).
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token.trim())
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    // Connecting: verify before upgrading, so a rejected peer never touches the registry
    let token = bearer_token(&headers).or(query.token.as_deref());
    let user_id = match state.connect_user_usecase.authenticate(token) {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::warn!("Rejecting WebSocket connection: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let initial_room = match query.room_id.map(RoomId::new).transpose() {
        Ok(room_id) => room_id,
        Err(e) => {
            tracing::warn!(%user_id, "Rejecting WebSocket connection: invalid roomId: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id, initial_room)))
}

/// Spawns a task that drains this connection's outbound queue into the WebSocket sink.
///
/// Other connections never write to this socket directly; they only enqueue
/// frames through the MessagePusher.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    user_id: UserId,
    initial_room: Option<RoomId>,
) {
    let (tx, rx) = mpsc::channel(state.outbound_capacity);

    // Authenticated: register and acknowledge
    let connection_id = match state
        .connect_user_usecase
        .execute(user_id.clone(), tx)
        .await
    {
        Ok(connection_id) => connection_id,
        Err(e) => {
            tracing::error!(%user_id, "Failed to register connection: {}", e);
            return;
        }
    };
    tracing::info!(%connection_id, %user_id, "Client connected");

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    if let Some(room_id) = initial_room {
        dispatch_command(&state, connection_id, Command::JoinRoom { room_id }).await;
    }

    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(%connection_id, "WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match decode_command(text.as_str()) {
                    Ok(command) => dispatch_command(&state_clone, connection_id, command).await,
                    Err(e) => {
                        tracing::warn!(%connection_id, "Ignoring frame: {}", e);
                    }
                },
                Message::Binary(_) => {
                    tracing::warn!(%connection_id, "Ignoring binary frame");
                }
                Message::Close(_) => {
                    tracing::info!(%connection_id, "Client requested close");
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Closed: unregister exactly once, whichever side ended the connection
    let left_rooms = state
        .disconnect_user_usecase
        .execute(&connection_id)
        .await
        .map(|entry| entry.rooms.len())
        .unwrap_or_default();
    tracing::info!(%connection_id, %user_id, left_rooms, "Client disconnected");
}

/// Dispatch one decoded command. Errors are contained to this command and
/// reported, if at all, only to this connection.
async fn dispatch_command(state: &Arc<AppState>, connection_id: ConnectionId, command: Command) {
    match command {
        Command::JoinRoom { room_id } => {
            match state
                .join_room_usecase
                .execute(&connection_id, room_id)
                .await
            {
                Ok(()) => {}
                Err(JoinRoomError::RoomLimitExceeded { limit }) => {
                    tracing::warn!(%connection_id, limit, "Room limit exceeded");
                    notify_error(state, connection_id, ROOM_LIMIT_MESSAGE).await;
                }
                Err(e) => tracing::warn!(%connection_id, "Failed to join room: {}", e),
            }
        }
        Command::LeaveRoom { room_id } => {
            if let Err(e) = state
                .leave_room_usecase
                .execute(&connection_id, &room_id)
                .await
            {
                tracing::warn!(%connection_id, "Failed to leave room: {}", e);
            }
        }
        Command::SendMessage { room_id, content } => {
            // A started broadcast runs to completion even if this connection closes meanwhile
            let relay_state = state.clone();
            let relay = tokio::spawn(async move {
                relay_state
                    .send_message_usecase
                    .execute(&connection_id, room_id, content)
                    .await
            });

            match relay.await {
                Ok(Ok(message_id)) => {
                    tracing::debug!(%connection_id, %message_id, "Message sent");
                }
                Ok(Err(e)) => {
                    tracing::warn!(%connection_id, "Failed to send message: {}", e);
                    notify_error(state, connection_id, SEND_FAILED_MESSAGE).await;
                }
                Err(e) => {
                    tracing::error!(%connection_id, "Relay task failed: {}", e);
                    notify_error(state, connection_id, SEND_FAILED_MESSAGE).await;
                }
            }
        }
        Command::Unrecognized => {
            tracing::debug!(%connection_id, "Ignoring unrecognized command type");
        }
    }
}

async fn notify_error(state: &AppState, connection_id: ConnectionId, message: &str) {
    if let Err(e) = state
        .message_pusher
        .push_to(&connection_id, &ServerEvent::error(message))
        .await
    {
        tracing::warn!(%connection_id, "Failed to push error notification: {}", e);
    }
}
