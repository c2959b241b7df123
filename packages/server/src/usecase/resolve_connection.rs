//! UseCase: 接続リクエスト解決（承諾・拒否）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ResolveConnectionUseCase::{accept, reject} メソッド
//! - プライベートルームのプロビジョニングと再利用
//! - 宛先ユーザーのみが解決できる認可
//!
//! ### なぜこのテストが必要か
//! - 状態遷移の一度きり性はハンドシェイクの中心不変条件
//! - 1 ペア 1 プライベートルームの保証は正準ペアルックアップに依存する
//! - 二重承諾でルームが再プロビジョニングされると片方が孤児になる
//!
//! ### どのような状況を想定しているか
//! - 正常系: 承諾によるルーム作成、拒否
//! - 冪等性: 同じ結果での再解決、既存ルームの再利用
//! - 異常系: 宛先以外による解決、反対の結果での再解決

use std::sync::Arc;

use utakata_shared::time::Clock;

use crate::domain::{
    ConnectionRepository, PrivateRoom, RequestId, RequestStatus, RoomId, RoomIdFactory,
    RoomRepository, Timestamp, UserId, UserPair,
};

use super::error::ResolveConnectionError;

/// 接続リクエスト解決のユースケース
pub struct ResolveConnectionUseCase {
    /// Repository（接続リクエストの抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// Repository（プライベートルームのプロビジョニングに使用）
    room_repository: Arc<dyn RoomRepository>,
    /// Clock（時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl ResolveConnectionUseCase {
    /// 新しい ResolveConnectionUseCase を作成
    pub fn new(
        connection_repository: Arc<dyn ConnectionRepository>,
        room_repository: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            connection_repository,
            room_repository,
            clock,
        }
    }

    /// リクエストを承諾し、プライベートルームの ID を返す
    ///
    /// ペアのプライベートルームがすでにあれば再利用します（二重承諾や
    /// 逆方向リクエストの承諾でもルームは 1 つに収束）。すでに Accepted の
    /// リクエストへの再承諾は紐付け済みルームを返す冪等な no-op です。
    ///
    /// # Arguments
    ///
    /// * `request_id` - 承諾対象のリクエスト
    /// * `acting_user` - 操作するユーザー（宛先ユーザーのみ可）
    pub async fn accept(
        &self,
        request_id: &RequestId,
        acting_user: &UserId,
    ) -> Result<RoomId, ResolveConnectionError> {
        let mut request = self
            .connection_repository
            .find(request_id)
            .await?
            .ok_or(ResolveConnectionError::RequestNotFound)?;

        if &request.to_user != acting_user {
            return Err(ResolveConnectionError::NotAuthorized);
        }

        match request.status {
            RequestStatus::Accepted => {
                // 冪等: 紐付け済みのルームを返すだけで再プロビジョニングしない
                return request
                    .private_room_id
                    .clone()
                    .ok_or(ResolveConnectionError::NotPending);
            }
            RequestStatus::Rejected => return Err(ResolveConnectionError::NotPending),
            RequestStatus::Pending => {}
        }

        let pair = UserPair::new(request.from_user.clone(), request.to_user.clone())
            .map_err(|_| ResolveConnectionError::NotPending)?;
        let private_room_id = self.provision_private_room(&pair).await?;

        request
            .accept(private_room_id.clone())
            .map_err(|_| ResolveConnectionError::NotPending)?;
        self.connection_repository.save(request).await?;

        tracing::info!(
            "Connection request '{}' accepted, private room '{}'",
            request_id.as_str(),
            private_room_id.as_str()
        );
        Ok(private_room_id)
    }

    /// リクエストを拒否する（副作用なし）
    ///
    /// すでに Rejected のリクエストへの再拒否は冪等な no-op。
    pub async fn reject(
        &self,
        request_id: &RequestId,
        acting_user: &UserId,
    ) -> Result<(), ResolveConnectionError> {
        let mut request = self
            .connection_repository
            .find(request_id)
            .await?
            .ok_or(ResolveConnectionError::RequestNotFound)?;

        if &request.to_user != acting_user {
            return Err(ResolveConnectionError::NotAuthorized);
        }

        match request.status {
            RequestStatus::Rejected => return Ok(()),
            RequestStatus::Accepted => return Err(ResolveConnectionError::NotPending),
            RequestStatus::Pending => {}
        }

        request
            .reject()
            .map_err(|_| ResolveConnectionError::NotPending)?;
        self.connection_repository.save(request).await?;
        Ok(())
    }

    /// ペアのプライベートルームを取得または作成
    ///
    /// 正準順ペアをキーにした 1 回のルックアップで再利用判定が済みます。
    async fn provision_private_room(
        &self,
        pair: &UserPair,
    ) -> Result<RoomId, ResolveConnectionError> {
        if let Some(existing) = self.room_repository.find_private_by_pair(pair).await? {
            return Ok(existing.id);
        }

        let room = PrivateRoom::new(
            RoomIdFactory::generate(),
            pair.clone(),
            Timestamp::new(self.clock.now_millis()),
        );
        let room_id = room.id.clone();
        self.room_repository.insert_private(room).await?;
        Ok(room_id)
    }
}
