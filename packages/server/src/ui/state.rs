//! Server state shared across handlers.

use std::sync::Arc;

use utakata_shared::time::Clock;

use crate::domain::MessagePusher;
use crate::usecase::{
    DeleteMessageUseCase, DeleteRoomUseCase, GetProfileUseCase, HeartbeatUseCase,
    LeaveRoomUseCase, ListActivePresenceUseCase, ListConnectionsUseCase, ListMessagesUseCase,
    ListRoomsUseCase, ReactMessageUseCase, RequestConnectionUseCase, ResolveConnectionUseCase,
    ResolveRoomUseCase, SendMessageUseCase, SweepExpiredUseCase, UpsertProfileUseCase,
};

/// Shared application state: every use case the handlers dispatch to.
pub struct AppState {
    pub resolve_room_usecase: Arc<ResolveRoomUseCase>,
    pub delete_room_usecase: Arc<DeleteRoomUseCase>,
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub list_messages_usecase: Arc<ListMessagesUseCase>,
    pub react_message_usecase: Arc<ReactMessageUseCase>,
    pub delete_message_usecase: Arc<DeleteMessageUseCase>,
    pub sweep_expired_usecase: Arc<SweepExpiredUseCase>,
    pub heartbeat_usecase: Arc<HeartbeatUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub list_active_presence_usecase: Arc<ListActivePresenceUseCase>,
    pub request_connection_usecase: Arc<RequestConnectionUseCase>,
    pub resolve_connection_usecase: Arc<ResolveConnectionUseCase>,
    pub list_connections_usecase: Arc<ListConnectionsUseCase>,
    pub get_profile_usecase: Arc<GetProfileUseCase>,
    pub upsert_profile_usecase: Arc<UpsertProfileUseCase>,
    /// ライブ購読クライアントの登録・解除に使用（配信は UseCase 経由）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub clock: Arc<dyn Clock>,
}
