//! UseCase: 在室ハートビート処理
//!
//! join とハートビートは同じ upsert です。配信基盤に信頼できる切断通知が
//! 無い前提なので、在室は「最後に心拍が聞こえた時刻」でしか表現できず、
//! last-write-wins の upsert が唯一の整合戦略になります。コールドリスタート
//! 後など、レコードが無い状態でのハートビートも透過的に join 相当として
//! 成功します。

use std::sync::Arc;

use utakata_shared::time::Clock;

use crate::domain::{
    PresenceRecord, PresenceRepository, RepositoryError, RoomId, Timestamp, UserId, Username,
};

/// ハートビート（join 兼用）のユースケース
pub struct HeartbeatUseCase {
    /// Repository（在室レコードの抽象化）
    presence_repository: Arc<dyn PresenceRepository>,
    /// Clock（時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl HeartbeatUseCase {
    /// 新しい HeartbeatUseCase を作成
    pub fn new(presence_repository: Arc<dyn PresenceRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            presence_repository,
            clock,
        }
    }

    /// ハートビートを実行（レコードが無ければ join として作成）
    ///
    /// # Arguments
    ///
    /// * `room_id` - 対象ルーム
    /// * `user_id` - 在室ユーザー
    /// * `username` - 表示名（ハートビートごとに上書き）
    ///
    /// # Returns
    ///
    /// * `Ok(PresenceRecord)` - 更新後の在室レコード
    pub async fn execute(
        &self,
        room_id: RoomId,
        user_id: UserId,
        username: Username,
    ) -> Result<PresenceRecord, RepositoryError> {
        let record = PresenceRecord::new(
            room_id,
            user_id,
            username,
            Timestamp::new(self.clock.now_millis()),
        );
        self.presence_repository.upsert(record.clone()).await?;
        Ok(record)
    }
}
