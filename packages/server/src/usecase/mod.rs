//! UseCase 層
//!
//! 1 ユースケース 1 struct。Repository / PasswordHasher / MessagePusher の
//! trait に依存し、具体的な実装（Infrastructure 層）には依存しません。

pub mod delete_message;
pub mod delete_room;
pub mod error;
pub mod get_profile;
pub mod heartbeat;
pub mod leave_room;
pub mod list_active_presence;
pub mod list_connections;
pub mod list_messages;
pub mod list_rooms;
pub mod react_message;
pub mod request_connection;
pub mod resolve_connection;
pub mod resolve_room;
pub mod send_message;
pub mod sweep_expired;
pub mod upsert_profile;

pub use delete_message::DeleteMessageUseCase;
pub use delete_room::DeleteRoomUseCase;
pub use error::{
    DeleteMessageError, DeleteRoomError, RequestConnectionError, ResolveConnectionError,
    ResolveRoomError,
};
pub use get_profile::GetProfileUseCase;
pub use heartbeat::HeartbeatUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use list_active_presence::ListActivePresenceUseCase;
pub use list_connections::ListConnectionsUseCase;
pub use list_messages::ListMessagesUseCase;
pub use list_rooms::ListRoomsUseCase;
pub use react_message::ReactMessageUseCase;
pub use request_connection::{HandshakePolicy, RequestConnectionUseCase};
pub use resolve_connection::ResolveConnectionUseCase;
pub use resolve_room::ResolveRoomUseCase;
pub use send_message::SendMessageUseCase;
pub use sweep_expired::SweepExpiredUseCase;
pub use upsert_profile::UpsertProfileUseCase;
