//! UseCase: 明示的な退室処理
//!
//! レコードを削除します。退室せず去ったユーザーはウィンドウ外に
//! 老化して不可視になるだけなので、削除は必須ではありません。

use std::sync::Arc;

use crate::domain::{PresenceRepository, RepositoryError, RoomId, UserId};

/// 退室のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（在室レコードの抽象化）
    presence_repository: Arc<dyn PresenceRepository>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(presence_repository: Arc<dyn PresenceRepository>) -> Self {
        Self {
            presence_repository,
        }
    }

    /// 退室を実行（冪等）
    pub async fn execute(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), RepositoryError> {
        self.presence_repository.remove(room_id, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PresenceRecord, RoomIdFactory, Timestamp, Username};
    use crate::infrastructure::repository::InMemoryPresenceRepository;

    #[tokio::test]
    async fn test_leave_removes_presence_record() {
        // テスト項目: 退室で在室レコードが削除される
        // given (前提条件):
        let repository = Arc::new(InMemoryPresenceRepository::new());
        let room_id = RoomIdFactory::generate();
        let alice = UserId::new("alice".to_string()).unwrap();
        repository
            .upsert(PresenceRecord::new(
                room_id.clone(),
                alice.clone(),
                Username::new("Alice".to_string()).unwrap(),
                Timestamp::new(1000),
            ))
            .await
            .unwrap();
        let usecase = LeaveRoomUseCase::new(repository.clone());

        // when (操作):
        usecase.execute(&room_id, &alice).await.unwrap();

        // then (期待する結果):
        assert!(repository.list_by_room(&room_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_leave_twice_is_idempotent() {
        // テスト項目: 二重退室もエラーにならない（冪等性）
        // given (前提条件):
        let repository = Arc::new(InMemoryPresenceRepository::new());
        let usecase = LeaveRoomUseCase::new(repository);
        let room_id = RoomIdFactory::generate();
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作):
        let first = usecase.execute(&room_id, &alice).await;
        let second = usecase.execute(&room_id, &alice).await;

        // then (期待する結果):
        assert!(first.is_ok());
        assert!(second.is_ok());
    }
}
