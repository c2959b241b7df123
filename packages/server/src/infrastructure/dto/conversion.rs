//! ドメインモデルと DTO の変換ロジック

use utakata_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::entity;
use crate::infrastructure::dto::http as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<entity::Room> for dto::RoomDto {
    fn from(model: entity::Room) -> Self {
        Self {
            id: model.id.into_string(),
            topic: model.topic,
            slug: model.slug.as_str().to_string(),
            is_active: model.is_active,
            is_locked: model.is_locked,
            created_by: model.created_by.map(|id| id.into_string()),
            created_at: timestamp_to_jst_rfc3339(model.created_at.value()),
        }
    }
}

impl From<entity::ReplySnapshot> for dto::ReplySnapshotDto {
    fn from(model: entity::ReplySnapshot) -> Self {
        Self {
            message_id: model.message_id.as_str().to_string(),
            sender_name: model.sender_name.into_string(),
            content: model.content.into_string(),
            kind: model.kind.as_str().to_string(),
        }
    }
}

impl From<entity::ChatMessage> for dto::ChatMessageDto {
    fn from(model: entity::ChatMessage) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            room_id: model.room_id.into_string(),
            sender_id: model.from.into_string(),
            sender_name: model.sender_name.into_string(),
            content: model.content.into_string(),
            kind: model.kind.as_str().to_string(),
            created_at: model.created_at.value(),
            delete_mode: model.delete_mode.as_str().to_string(),
            expire_at: model.expire_at.map(|t| t.value()),
            reply_to: model.reply_to.map(Into::into),
            reactions: model
                .reactions
                .into_iter()
                .map(|(emoji, users)| {
                    (
                        emoji,
                        users.into_iter().map(|u| u.into_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl From<entity::PresenceRecord> for dto::PresenceDto {
    fn from(model: entity::PresenceRecord) -> Self {
        Self {
            user_id: model.user_id.into_string(),
            username: model.username.into_string(),
            last_seen: model.last_seen.value(),
        }
    }
}

impl From<entity::RequestStatus> for String {
    fn from(status: entity::RequestStatus) -> Self {
        match status {
            entity::RequestStatus::Pending => "pending".to_string(),
            entity::RequestStatus::Accepted => "accepted".to_string(),
            entity::RequestStatus::Rejected => "rejected".to_string(),
        }
    }
}

impl From<entity::ConnectionRequest> for dto::ConnectionRequestDto {
    fn from(model: entity::ConnectionRequest) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            from_user: model.from_user.into_string(),
            to_user: model.to_user.into_string(),
            context_topic: model.context_topic,
            status: model.status.into(),
            created_at: timestamp_to_jst_rfc3339(model.created_at.value()),
            private_room_id: model.private_room_id.map(|id| id.into_string()),
        }
    }
}

impl From<entity::UserProfile> for dto::ProfileDto {
    fn from(model: entity::UserProfile) -> Self {
        Self {
            user_id: model.user_id.into_string(),
            display_name: model.display_name.map(|name| name.into_string()),
            avatar: model.avatar,
            friends: model
                .friends
                .into_iter()
                .map(|id| id.into_string())
                .collect(),
            updated_at: timestamp_to_jst_rfc3339(model.updated_at.value()),
        }
    }
}
