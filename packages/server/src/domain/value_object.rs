//! Value Object 定義
//!
//! 生の `String` / `i64` をドメインの語彙に持ち上げる薄いラッパー群。
//! コンストラクタで不変条件を検証し、以降は常に正しい値として扱います。

use serde::Serialize;
use uuid::Uuid;

use super::error::DomainError;

/// ユーザー ID（外部の認証基盤が発行する安定 ID）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct UserId(String);

impl UserId {
    /// 新しい UserId を作成（空文字・過長は不正）
    pub fn new(value: String) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.len() > 128 {
            return Err(DomainError::InvalidUserId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 表示用ユーザー名
///
/// メッセージには送信時点の名前がスナップショットとして埋め込まれ、
/// プレゼンスにはハートビートごとに上書きされる（意図した設計判断）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Username(String);

impl Username {
    /// 新しい Username を作成（空文字・64 文字超は不正）
    pub fn new(value: String) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().count() > 64 {
            return Err(DomainError::InvalidUsername(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// ルーム ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidId("room", value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// RoomId の生成ファクトリ（UUID v4）
pub struct RoomIdFactory;

impl RoomIdFactory {
    pub fn generate() -> RoomId {
        RoomId(Uuid::new_v4().to_string())
    }
}

/// メッセージ ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidId("message", value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// MessageId の生成ファクトリ（UUID v4）
pub struct MessageIdFactory;

impl MessageIdFactory {
    pub fn generate() -> MessageId {
        MessageId(Uuid::new_v4().to_string())
    }
}

/// 接続リクエスト ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidId("request", value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// RequestId の生成ファクトリ（UUID v4）
pub struct RequestIdFactory;

impl RequestIdFactory {
    pub fn generate() -> RequestId {
        RequestId(Uuid::new_v4().to_string())
    }
}

/// ルームのスラグ
///
/// 表示用トピックから決定的に導出される URL-safe な一意識別子。
/// 導出規則: trim → 連続空白をハイフン 1 個に畳む → 小文字化。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Slug(String);

impl Slug {
    /// トピック文字列からスラグを導出
    ///
    /// 正規化後に空になるトピック（空白のみ等）は不正。
    pub fn from_topic(topic: &str) -> Result<Self, DomainError> {
        let slug = topic
            .trim()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();
        if slug.is_empty() {
            return Err(DomainError::EmptyTopic);
        }
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// メッセージ本文
///
/// テキストメッセージの本文、またはボイスメッセージのメディア URL。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageContent(String);

impl MessageContent {
    pub const MAX_CHARS: usize = 2000;

    /// 新しい MessageContent を作成（空・2000 文字超は不正）
    pub fn new(value: String) -> Result<Self, DomainError> {
        let chars = value.chars().count();
        if value.trim().is_empty() || chars > Self::MAX_CHARS {
            return Err(DomainError::InvalidMessageContent {
                got: chars,
                max: Self::MAX_CHARS,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// このタイムスタンプに delta ミリ秒を加えた新しいタイムスタンプ
    pub fn plus_millis(&self, delta: i64) -> Self {
        Self(self.0 + delta)
    }
}

/// メッセージ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Voice,
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Voice => "voice",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "text" => Ok(MessageKind::Text),
            "voice" => Ok(MessageKind::Voice),
            other => Err(DomainError::UnknownMessageKind(other.to_string())),
        }
    }
}

/// メッセージの消滅ポリシー
///
/// TTL は送信時点で一度だけ導出され、expire_at として固定されます。
/// `Never` / `Seen` は expire_at を持たない（明示削除まで残る）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeleteMode {
    /// 2 時間で消滅（デフォルト）
    TwoHours,
    /// 24 時間で消滅
    OneDay,
    /// 消滅しない
    Never,
    /// 既読ベース（本サーバーでは Never と同様に TTL なし、ポリシー名のみ保持）
    Seen,
}

impl Default for DeleteMode {
    fn default() -> Self {
        DeleteMode::TwoHours
    }
}

impl DeleteMode {
    /// ポリシー文字列から変換（未知の文字列はエラー）
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "2h" => Ok(DeleteMode::TwoHours),
            "24h" => Ok(DeleteMode::OneDay),
            "never" => Ok(DeleteMode::Never),
            "seen" => Ok(DeleteMode::Seen),
            other => Err(DomainError::UnknownDeleteMode(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DeleteMode::TwoHours => "2h",
            DeleteMode::OneDay => "24h",
            DeleteMode::Never => "never",
            DeleteMode::Seen => "seen",
        }
    }

    /// このポリシーが与える生存時間（ミリ秒）。TTL を持たない場合は None。
    pub fn ttl_millis(&self) -> Option<i64> {
        match self {
            DeleteMode::TwoHours => Some(7_200_000),
            DeleteMode::OneDay => Some(86_400_000),
            DeleteMode::Never | DeleteMode::Seen => None,
        }
    }
}

/// 2 ユーザーの非順序ペア
///
/// コンストラクタで 2 つの ID を正準順（辞書順）に並べ替えるため、
/// (a, b) と (b, a) は同一のペアとして扱われます。プライベートルームの
/// ルックアップはこの正準キー 1 回の探索で済み、双方向からの同時作成で
/// ルームが二重にできる余地がありません。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UserPair {
    first: UserId,
    second: UserId,
}

impl UserPair {
    /// 正準順に並べた非順序ペアを作成（同一ユーザー同士は不正）
    pub fn new(a: UserId, b: UserId) -> Result<Self, DomainError> {
        if a == b {
            return Err(DomainError::SelfPair);
        }
        let (first, second) = if a.as_str() <= b.as_str() {
            (a, b)
        } else {
            (b, a)
        };
        Ok(Self { first, second })
    }

    pub fn first(&self) -> &UserId {
        &self.first
    }

    pub fn second(&self) -> &UserId {
        &self.second
    }

    /// ペアに含まれるユーザーかどうか
    pub fn contains(&self, user: &UserId) -> bool {
        &self.first == user || &self.second == user
    }
}
