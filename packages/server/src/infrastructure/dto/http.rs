//! HTTP API の DTO 定義

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ========================================
// Rooms
// ========================================

/// ルーム解決リクエスト
#[derive(Debug, Deserialize)]
pub struct ResolveRoomRequest {
    pub topic: String,
    /// ロック付きルームの参加・作成に使うパスワード
    pub password: Option<String>,
    /// 作成者となるユーザー ID（匿名作成なら省略）
    pub user_id: Option<String>,
}

/// ルーム削除リクエスト
#[derive(Debug, Deserialize)]
pub struct DeleteRoomRequest {
    pub user_id: String,
}

/// ルームの表現
#[derive(Debug, Serialize)]
pub struct RoomDto {
    pub id: String,
    pub topic: String,
    pub slug: String,
    pub is_active: bool,
    pub is_locked: bool,
    pub created_by: Option<String>,
    /// RFC 3339 (JST)
    pub created_at: String,
}

// ========================================
// Messages
// ========================================

/// メッセージ送信リクエスト
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    /// "text" | "voice"（省略時は text）
    pub kind: Option<String>,
    /// "2h" | "24h" | "never" | "seen"（省略時は 2h）
    pub delete_mode: Option<String>,
    /// 返信対象のメッセージ ID
    pub reply_to: Option<String>,
}

/// 返信スナップショットの表現
#[derive(Debug, Clone, Serialize)]
pub struct ReplySnapshotDto {
    pub message_id: String,
    pub sender_name: String,
    pub content: String,
    pub kind: String,
}

/// メッセージの表現
///
/// ライブ購読にも流れるためタイムスタンプはエポックミリ秒のまま返します。
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessageDto {
    pub id: String,
    pub room_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub kind: String,
    pub created_at: i64,
    pub delete_mode: String,
    pub expire_at: Option<i64>,
    pub reply_to: Option<ReplySnapshotDto>,
    /// 絵文字 → リアクションしたユーザー ID のリスト
    pub reactions: BTreeMap<String, Vec<String>>,
}

/// リアクションの追加・削除リクエスト
#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    pub user_id: String,
    pub emoji: String,
}

/// 掃除結果
#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub deleted: usize,
}

// ========================================
// Presence
// ========================================

/// ハートビートリクエスト（join と同一）
#[derive(Debug, Deserialize)]
pub struct HeartbeatRequest {
    pub user_id: String,
    pub username: String,
}

/// 在室レコードの表現
#[derive(Debug, Clone, Serialize)]
pub struct PresenceDto {
    pub user_id: String,
    pub username: String,
    pub last_seen: i64,
}

/// アクティブな在室一覧
#[derive(Debug, Serialize)]
pub struct ActivePresenceDto {
    pub active: Vec<PresenceDto>,
    pub count: usize,
}

// ========================================
// Connections
// ========================================

/// 接続リクエスト作成
#[derive(Debug, Deserialize)]
pub struct CreateConnectionRequest {
    pub from_user: String,
    pub to_user: String,
    pub context_topic: String,
}

/// 接続リクエストの承諾/拒否（操作するユーザー）
#[derive(Debug, Deserialize)]
pub struct ResolveConnectionRequest {
    pub user_id: String,
}

/// 接続リクエストの表現
#[derive(Debug, Serialize)]
pub struct ConnectionRequestDto {
    pub id: String,
    pub from_user: String,
    pub to_user: String,
    pub context_topic: String,
    pub status: String,
    /// RFC 3339 (JST)
    pub created_at: String,
    pub private_room_id: Option<String>,
}

/// 承諾結果（プロビジョニングされたプライベートルーム）
#[derive(Debug, Serialize)]
pub struct AcceptedConnectionDto {
    pub request_id: String,
    pub private_room_id: String,
}

// ========================================
// Profiles
// ========================================

/// プロフィール upsert リクエスト
#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    pub display_name: Option<String>,
    pub avatar: Option<String>,
}

/// 複数プロフィール取得リクエスト
#[derive(Debug, Deserialize)]
pub struct GetProfilesRequest {
    pub user_ids: Vec<String>,
}

/// プロフィールの表現
#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub user_id: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub friends: Vec<String>,
    /// RFC 3339 (JST)
    pub updated_at: String,
}
