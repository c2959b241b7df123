//! InMemory Presence Repository 実装
//!
//! (room, user) をキーとする last-write-wins な upsert ストア。
//! アクティブ判定（ウィンドウ比較）は UseCase 層が行い、ここは
//! レコードの保持と削除だけを担当します。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{PresenceRecord, PresenceRepository, RepositoryError, RoomId, UserId};

/// インメモリ Presence Repository 実装
pub struct InMemoryPresenceRepository {
    records: Arc<Mutex<HashMap<(String, String), PresenceRecord>>>,
}

impl InMemoryPresenceRepository {
    /// 空のストアを持つ新しい InMemoryPresenceRepository を作成
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryPresenceRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn upsert(&self, record: PresenceRecord) -> Result<(), RepositoryError> {
        let key = (
            record.room_id.as_str().to_string(),
            record.user_id.as_str().to_string(),
        );
        let mut records = self.records.lock().await;
        records.insert(key, record);
        Ok(())
    }

    async fn remove(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), RepositoryError> {
        let key = (room_id.as_str().to_string(), user_id.as_str().to_string());
        let mut records = self.records.lock().await;
        // 退室の二重実行は正常系（冪等）
        records.remove(&key);
        Ok(())
    }

    async fn list_by_room(
        &self,
        room_id: &RoomId,
    ) -> Result<Vec<PresenceRecord>, RepositoryError> {
        let records = self.records.lock().await;
        let mut room_records: Vec<PresenceRecord> = records
            .values()
            .filter(|r| &r.room_id == room_id)
            .cloned()
            .collect();
        room_records.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(room_records)
    }
}
