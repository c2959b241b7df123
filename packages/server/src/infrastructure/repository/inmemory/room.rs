//! InMemory Room Repository 実装
//!
//! 公開ルームは ID をキーに、プライベートルームは正準順ペアをキーに保持します。
//! スラグによるルックアップは全走査ですが、インメモリ実装では許容範囲です。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    PrivateRoom, RepositoryError, Room, RoomId, RoomRepository, Slug, UserPair,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    rooms: Arc<Mutex<HashMap<String, Room>>>,
    private_rooms: Arc<Mutex<HashMap<UserPair, PrivateRoom>>>,
}

impl InMemoryRoomRepository {
    /// 空のストアを持つ新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(Mutex::new(HashMap::new())),
            private_rooms: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn insert(&self, room: Room) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        rooms.insert(room.id.as_str().to_string(), room);
        Ok(())
    }

    async fn find_by_id(&self, id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms.get(id.as_str()).cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Room>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        Ok(rooms
            .values()
            .find(|room| room.is_active && &room.slug == slug)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<Room>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        let mut active: Vec<Room> = rooms.values().filter(|r| r.is_active).cloned().collect();
        // 新しい順
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn delete(&self, id: &RoomId) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        match rooms.remove(id.as_str()) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound(
                "room",
                id.as_str().to_string(),
            )),
        }
    }

    async fn insert_private(&self, room: PrivateRoom) -> Result<(), RepositoryError> {
        let mut private_rooms = self.private_rooms.lock().await;
        private_rooms.insert(room.pair.clone(), room);
        Ok(())
    }

    async fn find_private_by_pair(
        &self,
        pair: &UserPair,
    ) -> Result<Option<PrivateRoom>, RepositoryError> {
        let private_rooms = self.private_rooms.lock().await;
        Ok(private_rooms.get(pair).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoomIdFactory, Timestamp, UserId};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - スラグによるルックアップ（アクティブなルームのみ対象）
    // - アクティブルーム一覧の並び順（作成日時の新しい順）
    // - 削除時の NotFound エラー
    // - 正準順ペアによるプライベートルームのルックアップ
    //
    // 【なぜこのテストが必要か】
    // - スラグ解決はルームディレクトリ全体の土台
    // - ペアキーの対称性が 1 ペア 1 ルームの不変条件を支える
    // ========================================

    fn room(topic: &str, created_at: i64) -> Room {
        Room::new(
            RoomIdFactory::generate(),
            topic.to_string(),
            Slug::from_topic(topic).unwrap(),
            None,
            None,
            Timestamp::new(created_at),
        )
    }

    #[tokio::test]
    async fn test_find_by_slug_returns_matching_room() {
        // テスト項目: 保存したルームがスラグで見つかる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let night_owls = room("Night Owls", 1000);
        let room_id = night_owls.id.clone();
        repo.insert(night_owls).await.unwrap();

        // when (操作):
        let found = repo
            .find_by_slug(&Slug::from_topic("night owls").unwrap())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(found.unwrap().id, room_id);
    }

    #[tokio::test]
    async fn test_find_by_slug_ignores_inactive_rooms() {
        // テスト項目: 非アクティブなルームはスラグ解決の対象外
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let mut archived = room("Archive", 1000);
        archived.is_active = false;
        repo.insert(archived).await.unwrap();

        // when (操作):
        let found = repo
            .find_by_slug(&Slug::from_topic("Archive").unwrap())
            .await
            .unwrap();

        // then (期待する結果):
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_active_is_most_recent_first() {
        // テスト項目: アクティブルーム一覧が作成日時の新しい順で返る
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.insert(room("Oldest", 1000)).await.unwrap();
        repo.insert(room("Newest", 3000)).await.unwrap();
        repo.insert(room("Middle", 2000)).await.unwrap();

        // when (操作):
        let rooms = repo.list_active().await.unwrap();

        // then (期待する結果):
        let topics: Vec<&str> = rooms.iter().map(|r| r.topic.as_str()).collect();
        assert_eq!(topics, vec!["Newest", "Middle", "Oldest"]);
    }

    #[tokio::test]
    async fn test_delete_missing_room_is_not_found() {
        // テスト項目: 存在しないルームの削除は NotFound になる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let result = repo.delete(&RoomIdFactory::generate()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::NotFound(_, _))));
    }

    #[tokio::test]
    async fn test_private_room_lookup_is_order_insensitive() {
        // テスト項目: (a, b) で保存したプライベートルームが (b, a) でも見つかる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let alice = UserId::new("alice".to_string()).unwrap();
        let bob = UserId::new("bob".to_string()).unwrap();
        let pair = UserPair::new(alice.clone(), bob.clone()).unwrap();
        let private = PrivateRoom::new(RoomIdFactory::generate(), pair, Timestamp::new(1000));
        let private_id = private.id.clone();
        repo.insert_private(private).await.unwrap();

        // when (操作):
        let reversed = UserPair::new(bob, alice).unwrap();
        let found = repo.find_private_by_pair(&reversed).await.unwrap();

        // then (期待する結果):
        assert_eq!(found.unwrap().id, private_id);
    }
}
