//! UseCase: 期限切れメッセージの一括掃除
//!
//! 遅延フィルタ（読み取り時）とは独立した、ストレージ回収のための
//! バッチ削除。可視性の正しさはフィルタ側が保証しているので、
//! スイープは遅れても害はなく、走れば走っただけ容量が戻ります。

use std::sync::Arc;

use utakata_shared::time::Clock;

use crate::domain::{MessageRepository, RepositoryError, Timestamp};

/// 期限切れ掃除のユースケース
pub struct SweepExpiredUseCase {
    /// Repository（メッセージログの抽象化）
    message_repository: Arc<dyn MessageRepository>,
    /// Clock（時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl SweepExpiredUseCase {
    /// 新しい SweepExpiredUseCase を作成
    pub fn new(message_repository: Arc<dyn MessageRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_repository,
            clock,
        }
    }

    /// expire_at が現在時刻以前の全メッセージを物理削除し、件数を返す
    pub async fn execute(&self) -> Result<usize, RepositoryError> {
        let now = Timestamp::new(self.clock.now_millis());
        let deleted = self.message_repository.delete_expired(now).await?;
        if deleted > 0 {
            tracing::info!("Swept {} expired message(s)", deleted);
        }
        Ok(deleted)
    }
}
