//! ドメイン層
//!
//! Utakata のビジネスルール（ルーム解決、メッセージの TTL、プレゼンス、
//! ハンドシェイク）を表現する層。外部 I/O を持たず、データアクセスは
//! Repository trait として自身で定義します（依存性の逆転）。

pub mod entity;
pub mod error;
pub mod password;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{
    ChatMessage, ConnectionRequest, PresenceRecord, PrivateRoom, ReplySnapshot, RequestStatus,
    Room, UserProfile, ACTIVITY_WINDOW_MILLIS,
};
pub use error::{DomainError, RepositoryError};
pub use password::{PasswordHashError, PasswordHasher};
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use repository::{
    ConnectionRepository, MessageRepository, PresenceRepository, ProfileRepository, RoomRepository,
};
pub use value_object::{
    DeleteMode, MessageContent, MessageId, MessageIdFactory, MessageKind, RequestId,
    RequestIdFactory, RoomId, RoomIdFactory, Slug, Timestamp, UserId, UserPair, Username,
};
