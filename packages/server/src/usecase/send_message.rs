//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - expire_at の導出、返信スナップショットの切り出し
//! - ブロードキャスト対象選定（アクティブな在室者から送信者を除く）
//!
//! ### なぜこのテストが必要か
//! - TTL の導出は送信時の一度きり。ここを誤ると以後の全フィルタが狂う
//! - 返信はスナップショットであり、参照先の消滅に耐える必要がある
//! - 送信者名は送信時点の値で固定される（後からの改名は反映しない）
//!
//! ### どのような状況を想定しているか
//! - 正常系: デフォルトポリシーでの送信とブロードキャスト
//! - エッジケース: 返信対象がすでに消えている、在室者が送信者だけ

use std::sync::Arc;

use utakata_shared::time::Clock;

use crate::domain::{
    ChatMessage, DeleteMode, MessageContent, MessageId, MessageIdFactory, MessageKind,
    MessagePusher, MessageRepository, PresenceRepository, RepositoryError, RoomId, Timestamp,
    UserId, Username,
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（メッセージログの抽象化）
    message_repository: Arc<dyn MessageRepository>,
    /// Repository（在室レコードの抽象化、ブロードキャスト対象の選定に使用）
    presence_repository: Arc<dyn PresenceRepository>,
    /// MessagePusher（ライブ購読への配信の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        presence_repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            message_repository,
            presence_repository,
            message_pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信先ルーム
    /// * `sender` - 送信者のユーザー ID
    /// * `sender_name` - 送信時点の表示名（スナップショットとして固定）
    /// * `content` - 本文（voice の場合はメディア URL）
    /// * `kind` - メッセージ種別
    /// * `delete_mode` - 消滅ポリシー（expire_at をここで導出）
    /// * `reply_to` - 返信対象のメッセージ ID
    ///
    /// # Returns
    ///
    /// * `Ok((ChatMessage, Vec<UserId>))` - 採番済みの保存メッセージと
    ///   ブロードキャスト対象
    /// * `Err(RepositoryError)` - ストア操作の失敗
    #[allow(clippy::too_many_arguments)]
    pub async fn execute(
        &self,
        room_id: RoomId,
        sender: UserId,
        sender_name: Username,
        content: MessageContent,
        kind: MessageKind,
        delete_mode: DeleteMode,
        reply_to: Option<MessageId>,
    ) -> Result<(ChatMessage, Vec<UserId>), RepositoryError> {
        let now = Timestamp::new(self.clock.now_millis());

        // 返信対象のスナップショットを切り出す。対象がすでに消えていたら
        // 返信情報なしで送る（送信操作そのものは失敗させない）。
        let reply_snapshot = match reply_to {
            Some(id) => self
                .message_repository
                .find(&id)
                .await?
                .map(|original| original.snapshot()),
            None => None,
        };

        let message = ChatMessage::new(
            MessageIdFactory::generate(),
            room_id.clone(),
            sender.clone(),
            sender_name,
            content,
            kind,
            delete_mode,
            reply_snapshot,
            now,
        );
        let stored = self.message_repository.append(message).await?;

        let broadcast_targets = self.get_broadcast_targets(&room_id, &sender, now).await?;
        Ok((stored, broadcast_targets))
    }

    /// 保存済みメッセージをライブ購読へ配信
    ///
    /// # Arguments
    ///
    /// * `targets` - ブロードキャスト対象のユーザー ID リスト
    /// * `json_message` - 配信する JSON（DTO 層でシリアライズ済み）
    pub async fn broadcast(&self, targets: Vec<UserId>, json_message: &str) -> Result<(), String> {
        self.message_pusher
            .broadcast(targets, json_message)
            .await
            .map_err(|e| e.to_string())
    }

    /// ブロードキャスト対象のユーザー ID リストを取得
    ///
    /// ルームのアクティブな在室者のうち、送信者以外の全員。
    async fn get_broadcast_targets(
        &self,
        room_id: &RoomId,
        exclude_user: &UserId,
        now: Timestamp,
    ) -> Result<Vec<UserId>, RepositoryError> {
        let records = self.presence_repository.list_by_room(room_id).await?;
        Ok(records
            .into_iter()
            .filter(|r| r.is_active(now) && &r.user_id != exclude_user)
            .map(|r| r.user_id)
            .collect())
    }
}
