//! InMemory Message Repository 実装
//!
//! 追記型のメッセージログ。挿入順 seq はストア側で採番し、
//! created_at が同時刻のメッセージのタイブレークに使います。
//! リアクションの add/remove はストアロック下で保存済みの現在値に
//! 適用されるため、並行リアクションでも更新が失われません。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, MessageId, MessageRepository, RepositoryError, RoomId, Timestamp, UserId,
};

struct MessageStore {
    next_seq: u64,
    by_id: HashMap<String, ChatMessage>,
}

/// インメモリ Message Repository 実装
pub struct InMemoryMessageRepository {
    store: Arc<Mutex<MessageStore>>,
}

impl InMemoryMessageRepository {
    /// 空のストアを持つ新しい InMemoryMessageRepository を作成
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(MessageStore {
                next_seq: 0,
                by_id: HashMap::new(),
            })),
        }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, mut message: ChatMessage) -> Result<ChatMessage, RepositoryError> {
        let mut store = self.store.lock().await;
        message.seq = store.next_seq;
        store.next_seq += 1;
        store
            .by_id
            .insert(message.id.as_str().to_string(), message.clone());
        Ok(message)
    }

    async fn find(&self, id: &MessageId) -> Result<Option<ChatMessage>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store.by_id.get(id.as_str()).cloned())
    }

    async fn list_by_room(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let store = self.store.lock().await;
        let mut messages: Vec<ChatMessage> = store
            .by_id
            .values()
            .filter(|m| &m.room_id == room_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| (a.created_at, a.seq).cmp(&(b.created_at, b.seq)));
        Ok(messages)
    }

    async fn add_reaction(
        &self,
        id: &MessageId,
        emoji: &str,
        user: UserId,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;
        // 対象メッセージが消えていたら no-op（リアクションはベストエフォート）
        if let Some(message) = store.by_id.get_mut(id.as_str()) {
            message.add_reaction(emoji, user);
        }
        Ok(())
    }

    async fn remove_reaction(
        &self,
        id: &MessageId,
        emoji: &str,
        user: &UserId,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;
        if let Some(message) = store.by_id.get_mut(id.as_str()) {
            message.remove_reaction(emoji, user);
        }
        Ok(())
    }

    async fn delete(&self, id: &MessageId) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;
        match store.by_id.remove(id.as_str()) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound(
                "message",
                id.as_str().to_string(),
            )),
        }
    }

    async fn delete_expired(&self, now: Timestamp) -> Result<usize, RepositoryError> {
        let mut store = self.store.lock().await;
        let before = store.by_id.len();
        store
            .by_id
            .retain(|_, message| message.is_live(now));
        Ok(before - store.by_id.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DeleteMode, MessageContent, MessageIdFactory, MessageKind, RoomIdFactory, Username,
    };

    fn message(room_id: &RoomId, text: &str, created_at: i64, mode: DeleteMode) -> ChatMessage {
        ChatMessage::new(
            MessageIdFactory::generate(),
            room_id.clone(),
            UserId::new("alice".to_string()).unwrap(),
            Username::new("Alice".to_string()).unwrap(),
            MessageContent::new(text.to_string()).unwrap(),
            MessageKind::Text,
            mode,
            None,
            Timestamp::new(created_at),
        )
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_seq() {
        // テスト項目: append が挿入順に増加する seq を採番する
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        let room_id = RoomIdFactory::generate();

        // when (操作):
        let first = repo
            .append(message(&room_id, "first", 1000, DeleteMode::TwoHours))
            .await
            .unwrap();
        let second = repo
            .append(message(&room_id, "second", 1000, DeleteMode::TwoHours))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(second.seq > first.seq);
    }

    #[tokio::test]
    async fn test_list_by_room_orders_by_created_at_then_seq() {
        // テスト項目: 一覧が (created_at, seq) 昇順で返る
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        let room_id = RoomIdFactory::generate();
        repo.append(message(&room_id, "late", 2000, DeleteMode::TwoHours))
            .await
            .unwrap();
        repo.append(message(&room_id, "tie-a", 1000, DeleteMode::TwoHours))
            .await
            .unwrap();
        repo.append(message(&room_id, "tie-b", 1000, DeleteMode::TwoHours))
            .await
            .unwrap();

        // when (操作):
        let messages = repo.list_by_room(&room_id).await.unwrap();

        // then (期待する結果):
        let texts: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, vec!["tie-a", "tie-b", "late"]);
    }

    #[tokio::test]
    async fn test_list_by_room_excludes_other_rooms() {
        // テスト項目: 別ルームのメッセージは一覧に含まれない
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        let room_a = RoomIdFactory::generate();
        let room_b = RoomIdFactory::generate();
        repo.append(message(&room_a, "for-a", 1000, DeleteMode::TwoHours))
            .await
            .unwrap();
        repo.append(message(&room_b, "for-b", 1000, DeleteMode::TwoHours))
            .await
            .unwrap();

        // when (操作):
        let messages = repo.list_by_room(&room_a).await.unwrap();

        // then (期待する結果):
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content.as_str(), "for-a");
    }

    #[tokio::test]
    async fn test_reaction_on_missing_message_is_noop() {
        // テスト項目: 存在しないメッセージへのリアクションはエラーにならない
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        let ghost = MessageIdFactory::generate();
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作):
        let add = repo.add_reaction(&ghost, "🔥", alice.clone()).await;
        let remove = repo.remove_reaction(&ghost, "🔥", &alice).await;

        // then (期待する結果):
        assert!(add.is_ok());
        assert!(remove.is_ok());
    }

    #[tokio::test]
    async fn test_reaction_applies_to_stored_state() {
        // テスト項目: リアクションが保存済みの現在値に適用される
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        let room_id = RoomIdFactory::generate();
        let stored = repo
            .append(message(&room_id, "hello", 1000, DeleteMode::TwoHours))
            .await
            .unwrap();
        let alice = UserId::new("alice".to_string()).unwrap();
        let bob = UserId::new("bob".to_string()).unwrap();

        // when (操作): 2 ユーザーが同じ絵文字でリアクション
        repo.add_reaction(&stored.id, "🔥", alice).await.unwrap();
        repo.add_reaction(&stored.id, "🔥", bob).await.unwrap();

        // then (期待する結果): どちらの更新も失われない
        let found = repo.find(&stored.id).await.unwrap().unwrap();
        assert_eq!(found.reactions.get("🔥").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_message_is_not_found() {
        // テスト項目: 存在しないメッセージの削除は NotFound になる
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();

        // when (操作):
        let result = repo.delete(&MessageIdFactory::generate()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::NotFound(_, _))));
    }

    #[tokio::test]
    async fn test_delete_expired_removes_only_expired_rows() {
        // テスト項目: 一括削除が期限切れの行だけを物理削除し件数を返す
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        let room_id = RoomIdFactory::generate();
        let t0 = 1_700_000_000_000;
        repo.append(message(&room_id, "expiring", t0, DeleteMode::TwoHours))
            .await
            .unwrap();
        repo.append(message(&room_id, "fresh", t0 + 7_000_000, DeleteMode::TwoHours))
            .await
            .unwrap();
        repo.append(message(&room_id, "keeper", t0, DeleteMode::Never))
            .await
            .unwrap();

        // when (操作): 最初のメッセージの期限ちょうどに掃除
        let deleted = repo
            .delete_expired(Timestamp::new(t0 + 7_200_000))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(deleted, 1);
        let remaining = repo.list_by_room(&room_id).await.unwrap();
        let texts: Vec<&str> = remaining.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, vec!["fresh", "keeper"]);
    }
}
