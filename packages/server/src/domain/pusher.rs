//! MessagePusher trait 定義
//!
//! ライブ購読への配信（メッセージ・プレゼンス変化の push）の抽象化。
//! 具体的な実装（WebSocket）は Infrastructure 層が提供します。

use async_trait::async_trait;
use thiserror::Error;

use super::value_object::UserId;

/// 購読クライアントへの送信チャンネル
pub type PusherChannel = tokio::sync::mpsc::UnboundedSender<String>;

/// メッセージ push のエラー
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MessagePushError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// ライブ購読クライアントへの配信インターフェース
///
/// UseCase 層はこの trait に依存し、WebSocket の生成・管理（UI 層の責務）
/// には関知しません。
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 購読クライアントを登録
    async fn register_client(&self, user_id: UserId, sender: PusherChannel);

    /// 購読クライアントを登録解除
    async fn unregister_client(&self, user_id: &UserId);

    /// 特定のクライアントに送信
    async fn push_to(&self, user_id: &UserId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントに送信（一部の失敗は許容）
    async fn broadcast(&self, targets: Vec<UserId>, content: &str)
    -> Result<(), MessagePushError>;
}
