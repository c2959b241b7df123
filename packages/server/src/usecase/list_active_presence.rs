//! UseCase: アクティブ在室一覧取得
//!
//! 30 秒のスライディングウィンドウによる読み取り時フィルタ。
//! ウィンドウ外のレコードは不可視になるだけで、削除はされません。

use std::sync::Arc;

use utakata_shared::time::Clock;

use crate::domain::{PresenceRecord, PresenceRepository, RepositoryError, RoomId, Timestamp};

/// アクティブ在室一覧のユースケース
pub struct ListActivePresenceUseCase {
    /// Repository（在室レコードの抽象化）
    presence_repository: Arc<dyn PresenceRepository>,
    /// Clock（時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl ListActivePresenceUseCase {
    /// 新しい ListActivePresenceUseCase を作成
    pub fn new(presence_repository: Arc<dyn PresenceRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            presence_repository,
            clock,
        }
    }

    /// アクティビティウィンドウ内の在室レコードを取得
    pub async fn execute(&self, room_id: &RoomId) -> Result<Vec<PresenceRecord>, RepositoryError> {
        let now = Timestamp::new(self.clock.now_millis());
        let records = self.presence_repository.list_by_room(room_id).await?;
        Ok(records.into_iter().filter(|r| r.is_active(now)).collect())
    }

    /// アクティブな在室者数を取得
    pub async fn active_count(&self, room_id: &RoomId) -> Result<usize, RepositoryError> {
        Ok(self.execute(room_id).await?.len())
    }
}
