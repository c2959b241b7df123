//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! バックエンドのストアは常時利用可能なホスト型データベースとして扱い、
//! 一時的な到達不能は `RepositoryError::Transient` として表面化します
//! （リトライは Infrastructure 層の責務）。

use async_trait::async_trait;

use super::entity::{ChatMessage, ConnectionRequest, PresenceRecord, PrivateRoom, Room, UserProfile};
use super::error::RepositoryError;
use super::value_object::{MessageId, RequestId, RoomId, Slug, Timestamp, UserId, UserPair};

/// Room Repository trait
///
/// 公開ルームとプライベートルームの永続化。スラグとペアキーによる
/// ルックアップがルーム解決の中核です。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームを保存
    async fn insert(&self, room: Room) -> Result<(), RepositoryError>;

    /// ID でルームを取得
    async fn find_by_id(&self, id: &RoomId) -> Result<Option<Room>, RepositoryError>;

    /// スラグでアクティブなルームを取得
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Room>, RepositoryError>;

    /// アクティブなルームを作成日時の新しい順で取得
    async fn list_active(&self) -> Result<Vec<Room>, RepositoryError>;

    /// ルームを削除（メッセージのカスケード削除は行わない）
    async fn delete(&self, id: &RoomId) -> Result<(), RepositoryError>;

    /// プライベートルームを保存
    async fn insert_private(&self, room: PrivateRoom) -> Result<(), RepositoryError>;

    /// 正準順ペアでプライベートルームを取得
    async fn find_private_by_pair(
        &self,
        pair: &UserPair,
    ) -> Result<Option<PrivateRoom>, RepositoryError>;
}

/// Message Repository trait
///
/// ルームごとの追記型メッセージログ。リアクションの add/remove は
/// 保存済みの現在値に対する read-modify-write としてストアロック下で
/// 実行されます（クライアント側キャッシュへの適用は不可）。
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを追記し、挿入順 seq を採番して返す
    async fn append(&self, message: ChatMessage) -> Result<ChatMessage, RepositoryError>;

    /// ID でメッセージを取得
    async fn find(&self, id: &MessageId) -> Result<Option<ChatMessage>, RepositoryError>;

    /// ルームの全メッセージを (created_at, seq) 昇順で取得
    ///
    /// 期限切れのフィルタリングは行いません（UseCase 層の読み取り時
    /// フィルタが担当）。
    async fn list_by_room(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// リアクションを追加（冪等、対象メッセージが無ければ no-op）
    async fn add_reaction(
        &self,
        id: &MessageId,
        emoji: &str,
        user: UserId,
    ) -> Result<(), RepositoryError>;

    /// リアクションを削除（冪等、対象メッセージが無ければ no-op）
    async fn remove_reaction(
        &self,
        id: &MessageId,
        emoji: &str,
        user: &UserId,
    ) -> Result<(), RepositoryError>;

    /// メッセージを無条件に削除
    async fn delete(&self, id: &MessageId) -> Result<(), RepositoryError>;

    /// expire_at が now 以前の全メッセージを一括削除し、削除件数を返す
    async fn delete_expired(&self, now: Timestamp) -> Result<usize, RepositoryError>;
}

/// Presence Repository trait
///
/// (room, user) ごとに高々 1 件の upsert セマンティクス。
/// last-write-wins なので並行更新に調停は不要です。
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// 在室レコードを upsert（join とハートビートの両方がこれ）
    async fn upsert(&self, record: PresenceRecord) -> Result<(), RepositoryError>;

    /// 在室レコードを削除（存在しなくてもエラーにしない）
    async fn remove(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), RepositoryError>;

    /// ルームの全在室レコードを取得（アクティブ判定は UseCase 層）
    async fn list_by_room(&self, room_id: &RoomId) -> Result<Vec<PresenceRecord>, RepositoryError>;
}

/// Connection Repository trait
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 接続リクエストを保存
    async fn insert(&self, request: ConnectionRequest) -> Result<(), RepositoryError>;

    /// ID でリクエストを取得
    async fn find(&self, id: &RequestId) -> Result<Option<ConnectionRequest>, RepositoryError>;

    /// 既存リクエストの状態を上書き保存（存在しなければ NotFound）
    async fn save(&self, request: ConnectionRequest) -> Result<(), RepositoryError>;

    /// 指定ユーザー宛の Pending リクエストを作成日時の新しい順で取得
    async fn list_incoming(&self, user: &UserId)
    -> Result<Vec<ConnectionRequest>, RepositoryError>;

    /// 指定ユーザー発の Pending リクエストを作成日時の新しい順で取得
    async fn list_sent(&self, user: &UserId) -> Result<Vec<ConnectionRequest>, RepositoryError>;

    /// 指定ユーザーが当事者の Accepted リクエストを取得
    async fn list_accepted(&self, user: &UserId)
    -> Result<Vec<ConnectionRequest>, RepositoryError>;

    /// ペア間（方向不問）の Pending リクエストを取得
    async fn find_pending_between(
        &self,
        pair: &UserPair,
    ) -> Result<Option<ConnectionRequest>, RepositoryError>;
}

/// Profile Repository trait
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// プロフィールを取得
    async fn get(&self, user: &UserId) -> Result<Option<UserProfile>, RepositoryError>;

    /// 複数プロフィールを一括取得（存在しない ID は結果から落ちる）
    async fn get_many(&self, users: &[UserId]) -> Result<Vec<UserProfile>, RepositoryError>;

    /// プロフィールを upsert
    async fn upsert(&self, profile: UserProfile) -> Result<(), RepositoryError>;
}
