//! WebSocket connection handlers.
//!
//! The WebSocket carries the "live subscription" role of the reactive
//! store: on connect the client receives a snapshot of the room (live
//! messages + active presence), after which message and presence deltas
//! are pushed as they happen. The client keeps its presence fresh with
//! heartbeat frames; last-write-wins, so a reconnect simply overwrites
//! the previous channel and record.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{DeleteMode, MessageContent, MessageId, MessageKind, RoomId, UserId, Username},
    infrastructure::dto::websocket::{
        ChatBroadcastMessage, InboundFrame, MessageType, ParticipantJoinedMessage,
        ParticipantLeftMessage, RoomConnectedMessage,
    },
    ui::state::AppState,
};

use serde::Deserialize;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub room_id: String,
    pub user_id: String,
    pub username: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> Domain Models
    let room_id = RoomId::new(query.room_id.clone()).map_err(|_| {
        tracing::warn!("Invalid room_id format: '{}'", query.room_id);
        StatusCode::BAD_REQUEST
    })?;
    let user_id = UserId::try_from(query.user_id.clone()).map_err(|_| {
        tracing::warn!("Invalid user_id format: '{}'", query.user_id);
        StatusCode::BAD_REQUEST
    })?;
    let username = Username::try_from(query.username.clone()).map_err(|_| {
        tracing::warn!("Invalid username format: '{}'", query.username);
        StatusCode::BAD_REQUEST
    })?;

    // Join the room: the first heartbeat upserts the presence record
    let joined = state
        .heartbeat_usecase
        .execute(room_id.clone(), user_id.clone(), username.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to join room '{}': {}", room_id.as_str(), e);
            StatusCode::SERVICE_UNAVAILABLE
        })?;

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    state.message_pusher.register_client(user_id.clone(), tx).await;

    tracing::info!(
        "Client '{}' connected to room '{}'",
        user_id.as_str(),
        room_id.as_str()
    );

    let last_seen = joined.last_seen.value();
    Ok(ws.on_upgrade(move |socket| {
        handle_socket(socket, state, room_id, user_id, username, rx, last_seen)
    }))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Broadcast targets: the room's active participants except the given user.
async fn other_active_participants(
    state: &AppState,
    room_id: &RoomId,
    exclude_user: &UserId,
) -> Vec<UserId> {
    match state.list_active_presence_usecase.execute(room_id).await {
        Ok(records) => records
            .into_iter()
            .filter(|r| &r.user_id != exclude_user)
            .map(|r| r.user_id)
            .collect(),
        Err(e) => {
            tracing::warn!("Failed to list presence for broadcast: {}", e);
            Vec::new()
        }
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room_id: RoomId,
    user_id: UserId,
    username: Username,
    rx: mpsc::UnboundedReceiver<String>,
    last_seen: i64,
) {
    let (mut sender, mut receiver) = socket.split();

    // Send the room snapshot (live messages + active presence) to the newly
    // connected client
    {
        let messages = match state.list_messages_usecase.execute(&room_id).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!("Failed to load messages for snapshot: {}", e);
                return;
            }
        };
        let participants = match state.list_active_presence_usecase.execute(&room_id).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Failed to load presence for snapshot: {}", e);
                return;
            }
        };

        // Domain Model から DTO への変換
        let room_msg = RoomConnectedMessage {
            r#type: MessageType::RoomConnected,
            room_id: room_id.as_str().to_string(),
            messages: messages.into_iter().map(Into::into).collect(),
            participants: participants.into_iter().map(Into::into).collect(),
        };

        let room_json = serde_json::to_string(&room_msg).expect("snapshot serializes");
        if let Err(e) = sender.send(Message::Text(room_json.into())).await {
            tracing::error!(
                "Failed to send room snapshot to '{}': {}",
                user_id.as_str(),
                e
            );
            return;
        }
        tracing::info!("Sent room snapshot to '{}'", user_id.as_str());
    }

    // Broadcast participant-joined to the other active participants
    {
        let joined_msg = ParticipantJoinedMessage {
            r#type: MessageType::ParticipantJoined,
            user_id: user_id.as_str().to_string(),
            username: username.as_str().to_string(),
            last_seen,
        };
        let joined_json = serde_json::to_string(&joined_msg).expect("frame serializes");
        let targets = other_active_participants(&state, &room_id, &user_id).await;
        if let Err(e) = state.message_pusher.broadcast(targets, &joined_json).await {
            tracing::warn!("Failed to broadcast participant-joined: {}", e);
        }
    }

    let state_clone = state.clone();
    let room_id_clone = room_id.clone();
    let user_id_clone = user_id.clone();
    let username_clone = username.clone();

    // Spawn a task to receive frames from this client
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
                    let frame = match serde_json::from_str::<InboundFrame>(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::warn!("Failed to parse inbound frame: {}", e);
                            continue;
                        }
                    };

                    match frame {
                        InboundFrame::Chat {
                            content,
                            kind,
                            delete_mode,
                            reply_to,
                        } => {
                            handle_chat_frame(
                                &state_clone,
                                &room_id_clone,
                                &user_id_clone,
                                &username_clone,
                                content,
                                kind,
                                delete_mode,
                                reply_to,
                            )
                            .await;
                        }
                        InboundFrame::Heartbeat => {
                            if let Err(e) = state_clone
                                .heartbeat_usecase
                                .execute(
                                    room_id_clone.clone(),
                                    user_id_clone.clone(),
                                    username_clone.clone(),
                                )
                                .await
                            {
                                tracing::warn!("Failed to record heartbeat: {}", e);
                            }
                        }
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", user_id_clone.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to receive messages from other clients and send to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Disconnection: unregister, delete the presence record, notify the room
    state.message_pusher.unregister_client(&user_id).await;
    if let Err(e) = state.leave_room_usecase.execute(&room_id, &user_id).await {
        tracing::warn!("Failed to remove presence on disconnect: {}", e);
    }
    tracing::info!(
        "Client '{}' disconnected from room '{}'",
        user_id.as_str(),
        room_id.as_str()
    );

    let left_msg = ParticipantLeftMessage {
        r#type: MessageType::ParticipantLeft,
        user_id: user_id.as_str().to_string(),
        left_at: state.clock.now_millis(),
    };
    let left_json = serde_json::to_string(&left_msg).expect("frame serializes");
    let targets = other_active_participants(&state, &room_id, &user_id).await;
    if let Err(e) = state.message_pusher.broadcast(targets, &left_json).await {
        tracing::warn!("Failed to broadcast participant-left: {}", e);
    }
}

/// Validate a chat frame, store the message, and broadcast it.
#[allow(clippy::too_many_arguments)]
async fn handle_chat_frame(
    state: &AppState,
    room_id: &RoomId,
    user_id: &UserId,
    username: &Username,
    content: String,
    kind: Option<String>,
    delete_mode: Option<String>,
    reply_to: Option<String>,
) {
    let content = match MessageContent::try_from(content) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Invalid message content: {}", e);
            return;
        }
    };
    let kind = match kind.as_deref().map(MessageKind::parse) {
        Some(Ok(kind)) => kind,
        Some(Err(e)) => {
            tracing::warn!("Invalid message kind: {}", e);
            return;
        }
        None => MessageKind::Text,
    };
    let delete_mode = match delete_mode.as_deref().map(DeleteMode::parse) {
        Some(Ok(mode)) => mode,
        Some(Err(e)) => {
            tracing::warn!("Invalid delete mode: {}", e);
            return;
        }
        None => DeleteMode::default(),
    };
    let reply_to = match reply_to.map(MessageId::new) {
        Some(Ok(id)) => Some(id),
        Some(Err(e)) => {
            tracing::warn!("Invalid reply_to id: {}", e);
            return;
        }
        None => None,
    };

    match state
        .send_message_usecase
        .execute(
            room_id.clone(),
            user_id.clone(),
            username.clone(),
            content,
            kind,
            delete_mode,
            reply_to,
        )
        .await
    {
        Ok((stored, targets)) => {
            let broadcast = ChatBroadcastMessage {
                r#type: MessageType::Chat,
                message: stored.into(),
            };
            let json = serde_json::to_string(&broadcast).expect("frame serializes");
            if let Err(e) = state.send_message_usecase.broadcast(targets, &json).await {
                tracing::warn!("Failed to broadcast message: {}", e);
            }
        }
        Err(e) => {
            tracing::warn!("Failed to send message: {}", e);
        }
    }
}
