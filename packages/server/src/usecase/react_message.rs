//! UseCase: リアクション追加・削除
//!
//! リアクションはベストエフォートな社会的装飾であり、対象メッセージが
//! すでに消えていても NotFound にはせず黙って no-op にします
//! （このユースケースで唯一、意図的に握りつぶされる失敗）。

use std::sync::Arc;

use crate::domain::{MessageId, MessageRepository, RepositoryError, UserId};

/// リアクション操作のユースケース
pub struct ReactMessageUseCase {
    /// Repository（メッセージログの抽象化）
    message_repository: Arc<dyn MessageRepository>,
}

impl ReactMessageUseCase {
    /// 新しい ReactMessageUseCase を作成
    pub fn new(message_repository: Arc<dyn MessageRepository>) -> Self {
        Self { message_repository }
    }

    /// リアクションを追加（冪等）
    ///
    /// 集合への挿入なので、同じユーザーが同じ絵文字を二度押しても
    /// 状態は一度押したときと同じです。
    pub async fn add(
        &self,
        message_id: &MessageId,
        emoji: &str,
        user: UserId,
    ) -> Result<(), RepositoryError> {
        self.message_repository.add_reaction(message_id, emoji, user).await
    }

    /// リアクションを削除（冪等）
    ///
    /// 押していないリアクションの削除も no-op として成功します。
    pub async fn remove(
        &self,
        message_id: &MessageId,
        emoji: &str,
        user: &UserId,
    ) -> Result<(), RepositoryError> {
        self.message_repository
            .remove_reaction(message_id, emoji, user)
            .await
    }
}
