//! UseCase: ルーム削除処理
//!
//! 作成者のみが削除可能。メッセージのカスケード削除は行わず、
//! 取り残されたメッセージは各自の TTL とスイープに委ねます。

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository, UserId};

use super::error::DeleteRoomError;

/// ルーム削除のユースケース
pub struct DeleteRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    room_repository: Arc<dyn RoomRepository>,
}

impl DeleteRoomUseCase {
    /// 新しい DeleteRoomUseCase を作成
    pub fn new(room_repository: Arc<dyn RoomRepository>) -> Self {
        Self { room_repository }
    }

    /// ルーム削除を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 削除対象のルーム ID
    /// * `requesting_user` - 削除を要求するユーザー
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 削除成功
    /// * `Err(DeleteRoomError)` - ルームが無い、または作成者以外による削除
    pub async fn execute(
        &self,
        room_id: &RoomId,
        requesting_user: &UserId,
    ) -> Result<(), DeleteRoomError> {
        let room = self
            .room_repository
            .find_by_id(room_id)
            .await?
            .ok_or(DeleteRoomError::RoomNotFound)?;

        if !room.is_deletable_by(requesting_user) {
            return Err(DeleteRoomError::NotAuthorized);
        }

        self.room_repository.delete(room_id).await?;
        tracing::info!(
            "Room '{}' deleted by its creator '{}'",
            room.topic,
            requesting_user.as_str()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::password::Argon2PasswordHasher;
    use crate::infrastructure::repository::InMemoryRoomRepository;
    use crate::usecase::ResolveRoomUseCase;
    use utakata_shared::time::FixedClock;

    async fn create_room_owned_by(
        repository: Arc<InMemoryRoomRepository>,
        owner: Option<&str>,
    ) -> RoomId {
        let resolve = ResolveRoomUseCase::new(
            repository,
            Arc::new(Argon2PasswordHasher::new()),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        );
        let owner = owner.map(|id| UserId::new(id.to_string()).unwrap());
        resolve
            .execute("Night Owls", None, owner)
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_creator_can_delete_room() {
        // テスト項目: 作成者による削除が成功し、ルームが解決不能になる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room_id = create_room_owned_by(repository.clone(), Some("alice")).await;
        let usecase = DeleteRoomUseCase::new(repository.clone());
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作):
        let result = usecase.execute(&room_id, &alice).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(repository.find_by_id(&room_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_creator_cannot_delete_room() {
        // テスト項目: 作成者以外による削除は NotAuthorized になる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room_id = create_room_owned_by(repository.clone(), Some("alice")).await;
        let usecase = DeleteRoomUseCase::new(repository.clone());
        let bob = UserId::new("bob".to_string()).unwrap();

        // when (操作):
        let result = usecase.execute(&room_id, &bob).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), DeleteRoomError::NotAuthorized);
        assert!(repository.find_by_id(&room_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_anonymous_room_cannot_be_deleted() {
        // テスト項目: 匿名作成のルームは誰からの削除要求も拒否される
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room_id = create_room_owned_by(repository.clone(), None).await;
        let usecase = DeleteRoomUseCase::new(repository);
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作):
        let result = usecase.execute(&room_id, &alice).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), DeleteRoomError::NotAuthorized);
    }

    #[tokio::test]
    async fn test_deleting_missing_room_is_not_found() {
        // テスト項目: 存在しないルームの削除は RoomNotFound になる
        // given (前提条件):
        let usecase = DeleteRoomUseCase::new(Arc::new(InMemoryRoomRepository::new()));
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作):
        let result = usecase
            .execute(&crate::domain::RoomIdFactory::generate(), &alice)
            .await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), DeleteRoomError::RoomNotFound);
    }
}
