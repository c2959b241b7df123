//! WebSocket メッセージの DTO 定義
//!
//! ライブ購読の配信フレーム。接続直後のスナップショット
//! （room-connected）と、その後の差分（chat / participant-joined /
//! participant-left）で構成されます。

use serde::{Deserialize, Serialize};

use super::http::{ChatMessageDto, PresenceDto};

/// フレーム種別
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    RoomConnected,
    Chat,
    Heartbeat,
    ParticipantJoined,
    ParticipantLeft,
}

/// クライアントから届くフレーム
///
/// chat はメッセージ送信、heartbeat は在室更新。
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InboundFrame {
    Chat {
        content: String,
        kind: Option<String>,
        delete_mode: Option<String>,
        reply_to: Option<String>,
    },
    Heartbeat,
}

/// 接続直後に送るスナップショット
#[derive(Debug, Serialize)]
pub struct RoomConnectedMessage {
    pub r#type: MessageType,
    pub room_id: String,
    /// 生存中のメッセージ（(created_at, seq) 昇順）
    pub messages: Vec<ChatMessageDto>,
    /// アクティブな在室レコード
    pub participants: Vec<PresenceDto>,
}

/// 新着メッセージのブロードキャスト
#[derive(Debug, Serialize)]
pub struct ChatBroadcastMessage {
    pub r#type: MessageType,
    pub message: ChatMessageDto,
}

/// 参加通知
#[derive(Debug, Serialize)]
pub struct ParticipantJoinedMessage {
    pub r#type: MessageType,
    pub user_id: String,
    pub username: String,
    pub last_seen: i64,
}

/// 退室通知
#[derive(Debug, Serialize)]
pub struct ParticipantLeftMessage {
    pub r#type: MessageType,
    pub user_id: String,
    pub left_at: i64,
}
