//! HTTP API endpoint handlers.
//!
//! Thin layer: parse the DTO into domain value objects, dispatch to the
//! use case, map the use-case error onto a status code: 401 password
//! required, 403 invalid password / not authorized, 404 not found,
//! 409 conflicting handshake state.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::domain::{
    DeleteMode, MessageContent, MessageId, MessageKind, RoomId, UserId, Username,
};
use crate::infrastructure::dto::http::{
    AcceptedConnectionDto, ActivePresenceDto, ChatMessageDto, ConnectionRequestDto,
    CreateConnectionRequest, DeleteRoomRequest, GetProfilesRequest, HeartbeatRequest,
    PresenceDto, ProfileDto, ReactionRequest, ResolveConnectionRequest, ResolveRoomRequest,
    RoomDto, SendMessageRequest, SweepResponse, UpsertProfileRequest,
};
use crate::infrastructure::dto::websocket::{ChatBroadcastMessage, MessageType};
use crate::ui::state::AppState;
use crate::usecase::{
    DeleteMessageError, DeleteRoomError, RequestConnectionError, ResolveConnectionError,
    ResolveRoomError,
};

// ========================================
// Parsing helpers (DTO string -> Domain Model)
// ========================================

fn parse_user_id(value: String) -> Result<UserId, StatusCode> {
    UserId::new(value).map_err(|_| StatusCode::BAD_REQUEST)
}

fn parse_username(value: String) -> Result<Username, StatusCode> {
    Username::new(value).map_err(|_| StatusCode::BAD_REQUEST)
}

fn parse_room_id(value: String) -> Result<RoomId, StatusCode> {
    RoomId::new(value).map_err(|_| StatusCode::BAD_REQUEST)
}

fn parse_message_id(value: String) -> Result<MessageId, StatusCode> {
    MessageId::new(value).map_err(|_| StatusCode::BAD_REQUEST)
}

fn internal_error(context: &str, e: impl std::fmt::Display) -> StatusCode {
    tracing::error!("{}: {}", context, e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

// ========================================
// Rooms
// ========================================

/// Resolve a topic to a room: join the existing room or create a new one.
pub async fn resolve_room(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResolveRoomRequest>,
) -> Result<Json<RoomDto>, StatusCode> {
    let requesting_user = match req.user_id {
        Some(id) => Some(parse_user_id(id)?),
        None => None,
    };

    match state
        .resolve_room_usecase
        .execute(&req.topic, req.password.as_deref(), requesting_user)
        .await
    {
        Ok(room) => Ok(Json(room.into())),
        Err(ResolveRoomError::PasswordRequired) => Err(StatusCode::UNAUTHORIZED),
        Err(ResolveRoomError::InvalidPassword) => Err(StatusCode::FORBIDDEN),
        Err(ResolveRoomError::InvalidTopic(_)) => Err(StatusCode::BAD_REQUEST),
        Err(e) => Err(internal_error("Failed to resolve room", e)),
    }
}

/// Get the list of active rooms (most recently created first)
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RoomDto>>, StatusCode> {
    let rooms = state
        .list_rooms_usecase
        .execute()
        .await
        .map_err(|e| internal_error("Failed to list rooms", e))?;

    // Domain Model から DTO への変換
    Ok(Json(rooms.into_iter().map(Into::into).collect()))
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDto>, StatusCode> {
    let room_id = parse_room_id(room_id)?;
    match state.list_rooms_usecase.find(&room_id).await {
        Ok(Some(room)) => Ok(Json(room.into())),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(internal_error("Failed to get room detail", e)),
    }
}

/// Delete a room (creator only; messages are left to expire on their own)
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(req): Json<DeleteRoomRequest>,
) -> Result<StatusCode, StatusCode> {
    let room_id = parse_room_id(room_id)?;
    let user_id = parse_user_id(req.user_id)?;

    match state.delete_room_usecase.execute(&room_id, &user_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(DeleteRoomError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
        Err(DeleteRoomError::NotAuthorized) => Err(StatusCode::FORBIDDEN),
        Err(e) => Err(internal_error("Failed to delete room", e)),
    }
}

// ========================================
// Messages
// ========================================

/// List the live messages of a room (expired rows are filtered out)
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<ChatMessageDto>>, StatusCode> {
    let room_id = parse_room_id(room_id)?;
    let messages = state
        .list_messages_usecase
        .execute(&room_id)
        .await
        .map_err(|e| internal_error("Failed to list messages", e))?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// Send a message and broadcast it to the room's live subscribers
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ChatMessageDto>, StatusCode> {
    let room_id = parse_room_id(room_id)?;
    let sender = parse_user_id(req.sender_id)?;
    let sender_name = parse_username(req.sender_name)?;
    let content = MessageContent::new(req.content).map_err(|_| StatusCode::BAD_REQUEST)?;
    let kind = match req.kind.as_deref() {
        Some(value) => MessageKind::parse(value).map_err(|_| StatusCode::BAD_REQUEST)?,
        None => MessageKind::Text,
    };
    let delete_mode = match req.delete_mode.as_deref() {
        Some(value) => DeleteMode::parse(value).map_err(|_| StatusCode::BAD_REQUEST)?,
        None => DeleteMode::default(),
    };
    let reply_to = match req.reply_to {
        Some(id) => Some(parse_message_id(id)?),
        None => None,
    };

    let (stored, targets) = state
        .send_message_usecase
        .execute(room_id, sender, sender_name, content, kind, delete_mode, reply_to)
        .await
        .map_err(|e| internal_error("Failed to send message", e))?;

    // ライブ購読への配信（失敗しても送信自体は成立している）
    let broadcast = ChatBroadcastMessage {
        r#type: MessageType::Chat,
        message: stored.clone().into(),
    };
    let json = serde_json::to_string(&broadcast)
        .map_err(|e| internal_error("Failed to serialize broadcast", e))?;
    if let Err(e) = state.send_message_usecase.broadcast(targets, &json).await {
        tracing::warn!("Failed to broadcast message: {}", e);
    }

    Ok(Json(stored.into()))
}

/// Delete a message unconditionally
///
/// Restricting deletion to the author is the caller's concern.
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let message_id = parse_message_id(message_id)?;
    match state.delete_message_usecase.execute(&message_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(DeleteMessageError::MessageNotFound) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(internal_error("Failed to delete message", e)),
    }
}

/// Add a reaction (idempotent; no-op when the message is gone)
pub async fn add_reaction(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<String>,
    Json(req): Json<ReactionRequest>,
) -> Result<StatusCode, StatusCode> {
    let message_id = parse_message_id(message_id)?;
    let user_id = parse_user_id(req.user_id)?;
    state
        .react_message_usecase
        .add(&message_id, &req.emoji, user_id)
        .await
        .map_err(|e| internal_error("Failed to add reaction", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a reaction (idempotent; no-op when never added or message gone)
pub async fn remove_reaction(
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<String>,
    Json(req): Json<ReactionRequest>,
) -> Result<StatusCode, StatusCode> {
    let message_id = parse_message_id(message_id)?;
    let user_id = parse_user_id(req.user_id)?;
    state
        .react_message_usecase
        .remove(&message_id, &req.emoji, &user_id)
        .await
        .map_err(|e| internal_error("Failed to remove reaction", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Batch-delete expired messages (also triggered by the external job runner)
pub async fn sweep_expired(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SweepResponse>, StatusCode> {
    let deleted = state
        .sweep_expired_usecase
        .execute()
        .await
        .map_err(|e| internal_error("Failed to sweep expired messages", e))?;
    Ok(Json(SweepResponse { deleted }))
}

// ========================================
// Presence
// ========================================

/// List the room's presence records within the activity window
pub async fn list_active_presence(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<ActivePresenceDto>, StatusCode> {
    let room_id = parse_room_id(room_id)?;
    let records = state
        .list_active_presence_usecase
        .execute(&room_id)
        .await
        .map_err(|e| internal_error("Failed to list presence", e))?;

    let active: Vec<PresenceDto> = records.into_iter().map(Into::into).collect();
    let count = active.len();
    Ok(Json(ActivePresenceDto { active, count }))
}

/// Join / heartbeat: upsert the caller's presence record
pub async fn heartbeat(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Json(req): Json<HeartbeatRequest>,
) -> Result<Json<PresenceDto>, StatusCode> {
    let room_id = parse_room_id(room_id)?;
    let user_id = parse_user_id(req.user_id)?;
    let username = parse_username(req.username)?;

    let record = state
        .heartbeat_usecase
        .execute(room_id, user_id, username)
        .await
        .map_err(|e| internal_error("Failed to record heartbeat", e))?;
    Ok(Json(record.into()))
}

/// Explicit leave: delete the presence record
pub async fn leave_room(
    State(state): State<Arc<AppState>>,
    Path((room_id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, StatusCode> {
    let room_id = parse_room_id(room_id)?;
    let user_id = parse_user_id(user_id)?;
    state
        .leave_room_usecase
        .execute(&room_id, &user_id)
        .await
        .map_err(|e| internal_error("Failed to leave room", e))?;
    Ok(StatusCode::NO_CONTENT)
}

// ========================================
// Connections
// ========================================

/// Create a pending connection request
pub async fn create_connection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateConnectionRequest>,
) -> Result<Json<ConnectionRequestDto>, StatusCode> {
    let from_user = parse_user_id(req.from_user)?;
    let to_user = parse_user_id(req.to_user)?;

    match state
        .request_connection_usecase
        .execute(from_user, to_user, req.context_topic)
        .await
    {
        Ok(request) => Ok(Json(request.into())),
        Err(RequestConnectionError::AlreadyPending) => Err(StatusCode::CONFLICT),
        Err(RequestConnectionError::SelfPair) => Err(StatusCode::BAD_REQUEST),
        Err(e) => Err(internal_error("Failed to create connection request", e)),
    }
}

fn map_resolve_connection_error(e: ResolveConnectionError) -> StatusCode {
    match e {
        ResolveConnectionError::RequestNotFound => StatusCode::NOT_FOUND,
        ResolveConnectionError::NotAuthorized => StatusCode::FORBIDDEN,
        ResolveConnectionError::NotPending => StatusCode::CONFLICT,
        ResolveConnectionError::Repository(e) => {
            internal_error("Failed to resolve connection request", e)
        }
    }
}

/// Accept a pending request; returns the provisioned private room
pub async fn accept_connection(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<String>,
    Json(req): Json<ResolveConnectionRequest>,
) -> Result<Json<AcceptedConnectionDto>, StatusCode> {
    let request_id = crate::domain::RequestId::new(request_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let acting_user = parse_user_id(req.user_id)?;

    let private_room_id = state
        .resolve_connection_usecase
        .accept(&request_id, &acting_user)
        .await
        .map_err(map_resolve_connection_error)?;

    Ok(Json(AcceptedConnectionDto {
        request_id: request_id.as_str().to_string(),
        private_room_id: private_room_id.into_string(),
    }))
}

/// Reject a pending request (no side effects)
pub async fn reject_connection(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<String>,
    Json(req): Json<ResolveConnectionRequest>,
) -> Result<StatusCode, StatusCode> {
    let request_id = crate::domain::RequestId::new(request_id).map_err(|_| StatusCode::BAD_REQUEST)?;
    let acting_user = parse_user_id(req.user_id)?;

    state
        .resolve_connection_usecase
        .reject(&request_id, &acting_user)
        .await
        .map_err(map_resolve_connection_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Pending requests addressed to the user
pub async fn list_incoming_connections(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ConnectionRequestDto>>, StatusCode> {
    let user_id = parse_user_id(user_id)?;
    let requests = state
        .list_connections_usecase
        .incoming(&user_id)
        .await
        .map_err(|e| internal_error("Failed to list incoming connections", e))?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// Pending requests sent by the user
pub async fn list_sent_connections(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ConnectionRequestDto>>, StatusCode> {
    let user_id = parse_user_id(user_id)?;
    let requests = state
        .list_connections_usecase
        .sent(&user_id)
        .await
        .map_err(|e| internal_error("Failed to list sent connections", e))?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// Accepted requests the user is a party to
pub async fn list_accepted_connections(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ConnectionRequestDto>>, StatusCode> {
    let user_id = parse_user_id(user_id)?;
    let requests = state
        .list_connections_usecase
        .accepted(&user_id)
        .await
        .map_err(|e| internal_error("Failed to list accepted connections", e))?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

// ========================================
// Profiles
// ========================================

/// Get a user profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileDto>, StatusCode> {
    let user_id = parse_user_id(user_id)?;
    match state.get_profile_usecase.execute(&user_id).await {
        Ok(Some(profile)) => Ok(Json(profile.into())),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(internal_error("Failed to get profile", e)),
    }
}

/// Batch-get user profiles (missing ids are simply absent from the result)
pub async fn get_profiles(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetProfilesRequest>,
) -> Result<Json<Vec<ProfileDto>>, StatusCode> {
    let mut user_ids = Vec::with_capacity(req.user_ids.len());
    for id in req.user_ids {
        user_ids.push(parse_user_id(id)?);
    }
    let profiles = state
        .get_profile_usecase
        .execute_many(&user_ids)
        .await
        .map_err(|e| internal_error("Failed to get profiles", e))?;
    Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

/// Create or patch a user profile
pub async fn upsert_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<UpsertProfileRequest>,
) -> Result<Json<ProfileDto>, StatusCode> {
    let user_id = parse_user_id(user_id)?;
    let display_name = match req.display_name {
        Some(name) => Some(parse_username(name)?),
        None => None,
    };

    let profile = state
        .upsert_profile_usecase
        .execute(user_id, display_name, req.avatar)
        .await
        .map_err(|e| internal_error("Failed to upsert profile", e))?;
    Ok(Json(profile.into()))
}
