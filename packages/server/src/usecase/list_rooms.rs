//! UseCase: アクティブルーム一覧取得

use std::sync::Arc;

use crate::domain::{RepositoryError, Room, RoomId, RoomRepository};

/// アクティブルーム一覧のユースケース
pub struct ListRoomsUseCase {
    /// Repository（データアクセス層の抽象化）
    room_repository: Arc<dyn RoomRepository>,
}

impl ListRoomsUseCase {
    /// 新しい ListRoomsUseCase を作成
    pub fn new(room_repository: Arc<dyn RoomRepository>) -> Self {
        Self { room_repository }
    }

    /// アクティブなルームを作成日時の新しい順で取得
    pub async fn execute(&self) -> Result<Vec<Room>, RepositoryError> {
        self.room_repository.list_active().await
    }

    /// ID でルームを取得（詳細表示用）
    pub async fn find(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        self.room_repository.find_by_id(room_id).await
    }
}
