//! UseCase: メッセージ削除
//!
//! 無条件削除。自分のメッセージしか消せない等の認可は呼び出し側
//! （UI 層）の責務であり、ストア契約には含まれません。

use std::sync::Arc;

use crate::domain::{MessageId, MessageRepository, RepositoryError};

use super::error::DeleteMessageError;

/// メッセージ削除のユースケース
pub struct DeleteMessageUseCase {
    /// Repository（メッセージログの抽象化）
    message_repository: Arc<dyn MessageRepository>,
}

impl DeleteMessageUseCase {
    /// 新しい DeleteMessageUseCase を作成
    pub fn new(message_repository: Arc<dyn MessageRepository>) -> Self {
        Self { message_repository }
    }

    /// メッセージ削除を実行
    pub async fn execute(&self, message_id: &MessageId) -> Result<(), DeleteMessageError> {
        match self.message_repository.delete(message_id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound(_, _)) => Err(DeleteMessageError::MessageNotFound),
            Err(e) => Err(DeleteMessageError::Repository(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ChatMessage, DeleteMode, MessageContent, MessageIdFactory, MessageKind, RoomIdFactory,
        Timestamp, UserId, Username,
    };
    use crate::infrastructure::repository::InMemoryMessageRepository;

    #[tokio::test]
    async fn test_delete_removes_message() {
        // テスト項目: 削除したメッセージがストアから消える
        // given (前提条件):
        let repository = Arc::new(InMemoryMessageRepository::new());
        let stored = repository
            .append(ChatMessage::new(
                MessageIdFactory::generate(),
                RoomIdFactory::generate(),
                UserId::new("alice".to_string()).unwrap(),
                Username::new("Alice".to_string()).unwrap(),
                MessageContent::new("delete me".to_string()).unwrap(),
                MessageKind::Text,
                DeleteMode::Never,
                None,
                Timestamp::new(1000),
            ))
            .await
            .unwrap();
        let usecase = DeleteMessageUseCase::new(repository.clone());

        // when (操作):
        let result = usecase.execute(&stored.id).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(repository.find(&stored.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_message_is_not_found() {
        // テスト項目: 存在しないメッセージの削除は MessageNotFound になる
        // given (前提条件):
        let usecase = DeleteMessageUseCase::new(Arc::new(InMemoryMessageRepository::new()));

        // when (操作):
        let result = usecase.execute(&MessageIdFactory::generate()).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), DeleteMessageError::MessageNotFound);
    }
}
