//! エンティティ定義
//!
//! ルーム・メッセージ・プレゼンス・接続リクエスト・プロフィールの
//! ドメインモデル。状態遷移と不変条件はここに集約し、Repository は
//! 保存と検索だけを担当します。

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::error::DomainError;
use super::value_object::{
    DeleteMode, MessageContent, MessageId, MessageKind, RequestId, RoomId, Slug, Timestamp, UserId,
    UserPair, Username,
};

/// プレゼンスのアクティビティウィンドウ（ミリ秒）
///
/// クライアントのハートビート間隔は 5 秒。30 秒のウィンドウなら
/// 5 回分の取りこぼしまでは「在室」と見なされます。
pub const ACTIVITY_WINDOW_MILLIS: i64 = 30_000;

/// トピックで解決される公開ルーム
///
/// ## 不変条件
///
/// - `slug` は `topic` から決定的に導出され、アクティブなルームの中で一意
/// - `is_locked` は作成時に空でないパスワードが与えられた場合のみ true
/// - `password_hash` は `is_locked` のときだけ存在する
#[derive(Debug, Clone, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub topic: String,
    pub slug: Slug,
    pub is_active: bool,
    pub is_locked: bool,
    /// Argon2 PHC 文字列。平文パスワードは保持しない。
    pub password_hash: Option<String>,
    /// 作成者。匿名作成の場合は None。
    pub created_by: Option<UserId>,
    pub created_at: Timestamp,
}

impl Room {
    /// 新しいルームを作成
    ///
    /// `password_hash` の有無から `is_locked` を導出します。
    pub fn new(
        id: RoomId,
        topic: String,
        slug: Slug,
        password_hash: Option<String>,
        created_by: Option<UserId>,
        created_at: Timestamp,
    ) -> Self {
        let is_locked = password_hash.is_some();
        Self {
            id,
            topic,
            slug,
            is_active: true,
            is_locked,
            password_hash,
            created_by,
            created_at,
        }
    }

    /// 指定ユーザーがこのルームを削除できるか（作成者のみ）
    pub fn is_deletable_by(&self, user: &UserId) -> bool {
        self.created_by.as_ref() == Some(user)
    }
}

/// 2 ユーザー専用のプライベートルーム
///
/// 正準順ペアをキーとするため、1 ペアにつき高々 1 ルームという不変条件が
/// キー設計そのもので保証されます。
#[derive(Debug, Clone, Serialize)]
pub struct PrivateRoom {
    pub id: RoomId,
    pub pair: UserPair,
    pub created_at: Timestamp,
}

impl PrivateRoom {
    pub fn new(id: RoomId, pair: UserPair, created_at: Timestamp) -> Self {
        Self {
            id,
            pair,
            created_at,
        }
    }
}

/// 返信対象のスナップショット
///
/// 生きた参照ではなくコピー。参照先が消滅・削除されても返信表示は保たれます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplySnapshot {
    pub message_id: MessageId,
    pub sender_name: Username,
    pub content: MessageContent,
    pub kind: MessageKind,
}

/// チャットメッセージ
///
/// ## 不変条件
///
/// - `expire_at` が存在するなら常に `created_at + delete_mode の TTL` に等しい
/// - 送信後に変化するのは `reactions` だけ（それ以外は不変）
/// - `sender_name` は送信時点のスナップショット（後からの改名は反映しない）
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub from: UserId,
    pub sender_name: Username,
    pub content: MessageContent,
    pub kind: MessageKind,
    pub created_at: Timestamp,
    /// ストアが採番する挿入順。created_at が同時刻のときのタイブレーク。
    pub seq: u64,
    pub delete_mode: DeleteMode,
    pub expire_at: Option<Timestamp>,
    pub reply_to: Option<ReplySnapshot>,
    /// 絵文字 → リアクションしたユーザー集合。集合なので add/remove は自然に冪等。
    pub reactions: BTreeMap<String, BTreeSet<UserId>>,
}

impl ChatMessage {
    /// 新しいメッセージを作成
    ///
    /// `expire_at` は `created_at` と `delete_mode` からここで一度だけ導出されます。
    /// `seq` は Repository が append 時に採番します。
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: MessageId,
        room_id: RoomId,
        from: UserId,
        sender_name: Username,
        content: MessageContent,
        kind: MessageKind,
        delete_mode: DeleteMode,
        reply_to: Option<ReplySnapshot>,
        created_at: Timestamp,
    ) -> Self {
        let expire_at = delete_mode
            .ttl_millis()
            .map(|ttl| created_at.plus_millis(ttl));
        Self {
            id,
            room_id,
            from,
            sender_name,
            content,
            kind,
            created_at,
            seq: 0,
            delete_mode,
            expire_at,
            reply_to,
            reactions: BTreeMap::new(),
        }
    }

    /// 現時点で可視（生存中）のメッセージかどうか
    ///
    /// `expire_at` が無いか、まだ未来であれば生存中。境界（expire_at == now）は
    /// 期限切れ扱いです。
    pub fn is_live(&self, now: Timestamp) -> bool {
        match self.expire_at {
            Some(expire_at) => now < expire_at,
            None => true,
        }
    }

    /// リアクションを追加（冪等）
    ///
    /// すでに同じユーザーが同じ絵文字でリアクション済みなら no-op。
    /// 新規に追加された場合のみ true を返します。
    pub fn add_reaction(&mut self, emoji: &str, user: UserId) -> bool {
        self.reactions.entry(emoji.to_string()).or_default().insert(user)
    }

    /// リアクションを削除（冪等）
    ///
    /// 存在しないリアクションの削除は no-op。空になった絵文字エントリは
    /// マッピングから取り除きます。
    pub fn remove_reaction(&mut self, emoji: &str, user: &UserId) -> bool {
        let Some(users) = self.reactions.get_mut(emoji) else {
            return false;
        };
        let removed = users.remove(user);
        if users.is_empty() {
            self.reactions.remove(emoji);
        }
        removed
    }

    /// 返信用スナップショットを切り出す
    pub fn snapshot(&self) -> ReplySnapshot {
        ReplySnapshot {
            message_id: self.id.clone(),
            sender_name: self.sender_name.clone(),
            content: self.content.clone(),
            kind: self.kind,
        }
    }
}

/// ルーム在室レコード
///
/// (room, user) ごとに高々 1 件。ハートビートのたびに last_seen と
/// username が上書きされる last-write-wins なレコードです。
#[derive(Debug, Clone, Serialize)]
pub struct PresenceRecord {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub username: Username,
    pub last_seen: Timestamp,
}

impl PresenceRecord {
    pub fn new(room_id: RoomId, user_id: UserId, username: Username, last_seen: Timestamp) -> Self {
        Self {
            room_id,
            user_id,
            username,
            last_seen,
        }
    }

    /// アクティビティウィンドウ内のレコードかどうか
    ///
    /// `now - last_seen < ACTIVITY_WINDOW_MILLIS` のとき在室。境界ちょうど
    /// （差がウィンドウに等しい）は在室と見なしません。
    pub fn is_active(&self, now: Timestamp) -> bool {
        now.value() - self.last_seen.value() < ACTIVITY_WINDOW_MILLIS
    }
}

/// 接続リクエストの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

/// 1:1 接続のハンドシェイクリクエスト
///
/// ## 不変条件
///
/// - 状態遷移は `Pending → Accepted` または `Pending → Rejected` の一度きり
/// - `private_room_id` は Accepted になったときだけ設定される
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionRequest {
    pub id: RequestId,
    pub from_user: UserId,
    pub to_user: UserId,
    /// リクエストが発生したルームのトピック（文脈表示用）
    pub context_topic: String,
    pub status: RequestStatus,
    pub created_at: Timestamp,
    pub private_room_id: Option<RoomId>,
}

impl ConnectionRequest {
    pub fn new(
        id: RequestId,
        from_user: UserId,
        to_user: UserId,
        context_topic: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            from_user,
            to_user,
            context_topic,
            status: RequestStatus::Pending,
            created_at,
            private_room_id: None,
        }
    }

    /// リクエストを承諾し、プロビジョニングされたプライベートルームを紐付ける
    ///
    /// Pending 以外からの遷移は不正。
    pub fn accept(&mut self, private_room_id: RoomId) -> Result<(), DomainError> {
        if self.status != RequestStatus::Pending {
            return Err(DomainError::RequestNotPending);
        }
        self.status = RequestStatus::Accepted;
        self.private_room_id = Some(private_room_id);
        Ok(())
    }

    /// リクエストを拒否する（副作用なし）
    pub fn reject(&mut self) -> Result<(), DomainError> {
        if self.status != RequestStatus::Pending {
            return Err(DomainError::RequestNotPending);
        }
        self.status = RequestStatus::Rejected;
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// 指定ユーザーがこのリクエストの当事者かどうか
    pub fn involves(&self, user: &UserId) -> bool {
        &self.from_user == user || &self.to_user == user
    }
}

/// ユーザープロフィール
///
/// ## 不変条件
///
/// - `friends` に重複 ID は含まれない（upsert 時に正規化）
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub display_name: Option<Username>,
    pub avatar: Option<String>,
    pub friends: Vec<UserId>,
    pub updated_at: Timestamp,
}

impl UserProfile {
    pub fn new(user_id: UserId, updated_at: Timestamp) -> Self {
        Self {
            user_id,
            display_name: None,
            avatar: None,
            friends: Vec::new(),
            updated_at,
        }
    }

    /// 部分更新を適用し、updated_at を進める
    ///
    /// None のフィールドは既存値を保持します（クリアではない）。
    pub fn apply_patch(
        &mut self,
        display_name: Option<Username>,
        avatar: Option<String>,
        now: Timestamp,
    ) {
        if let Some(name) = display_name {
            self.display_name = Some(name);
        }
        if let Some(avatar) = avatar {
            self.avatar = Some(avatar);
        }
        self.updated_at = now;
    }

    /// フレンドリストから重複を取り除く（先勝ち、順序保持）
    pub fn normalize_friends(&mut self) {
        let mut seen = BTreeSet::new();
        self.friends.retain(|id| seen.insert(id.clone()));
    }
}
