//! UseCase: メッセージ一覧取得
//!
//! 読み取り時の遅延フィルタリング。期限切れだがまだ掃除されていない行は
//! ここで不可視になるだけで、物理削除はスイープの責務です。
//! スイープが走っていなくても可視性の正しさはこのフィルタが保証します。

use std::sync::Arc;

use utakata_shared::time::Clock;

use crate::domain::{ChatMessage, MessageRepository, RepositoryError, RoomId, Timestamp};

/// メッセージ一覧のユースケース
pub struct ListMessagesUseCase {
    /// Repository（メッセージログの抽象化）
    message_repository: Arc<dyn MessageRepository>,
    /// Clock（時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl ListMessagesUseCase {
    /// 新しい ListMessagesUseCase を作成
    pub fn new(message_repository: Arc<dyn MessageRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_repository,
            clock,
        }
    }

    /// ルームの生存中メッセージを (created_at, seq) 昇順で取得
    pub async fn execute(&self, room_id: &RoomId) -> Result<Vec<ChatMessage>, RepositoryError> {
        let now = Timestamp::new(self.clock.now_millis());
        let messages = self.message_repository.list_by_room(room_id).await?;
        Ok(messages.into_iter().filter(|m| m.is_live(now)).collect())
    }
}
