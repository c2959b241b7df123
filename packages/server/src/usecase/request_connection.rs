//! UseCase: 接続リクエスト作成
//!
//! 同一ペア間の重複 Pending を許すかどうかはどちらの挙動も成立するため、
//! 暗黙に選ばず [`HandshakePolicy`] として明示的な設定にしています。
//! デフォルトは不許可（AlreadyPending で拒否）。

use std::sync::Arc;

use utakata_shared::time::Clock;

use crate::domain::{
    ConnectionRepository, ConnectionRequest, RequestIdFactory, Timestamp, UserId, UserPair,
};

use super::error::RequestConnectionError;

/// ハンドシェイクの設定
#[derive(Debug, Clone, Copy)]
pub struct HandshakePolicy {
    /// 同一ペア間（方向不問）の重複 Pending リクエストを許すか
    pub allow_duplicate_pending: bool,
}

impl Default for HandshakePolicy {
    fn default() -> Self {
        Self {
            allow_duplicate_pending: false,
        }
    }
}

/// 接続リクエスト作成のユースケース
pub struct RequestConnectionUseCase {
    /// Repository（接続リクエストの抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
    /// Clock（時刻の抽象化）
    clock: Arc<dyn Clock>,
    /// 重複 Pending の扱い
    policy: HandshakePolicy,
}

impl RequestConnectionUseCase {
    /// 新しい RequestConnectionUseCase を作成
    pub fn new(
        connection_repository: Arc<dyn ConnectionRepository>,
        clock: Arc<dyn Clock>,
        policy: HandshakePolicy,
    ) -> Self {
        Self {
            connection_repository,
            clock,
            policy,
        }
    }

    /// 接続リクエストを作成
    ///
    /// # Arguments
    ///
    /// * `from_user` - リクエストするユーザー
    /// * `to_user` - リクエストされるユーザー
    /// * `context_topic` - リクエストが発生したルームのトピック
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectionRequest)` - 作成された Pending リクエスト
    /// * `Err(RequestConnectionError)` - 自分自身宛て、または重複 Pending
    pub async fn execute(
        &self,
        from_user: UserId,
        to_user: UserId,
        context_topic: String,
    ) -> Result<ConnectionRequest, RequestConnectionError> {
        let pair = UserPair::new(from_user.clone(), to_user.clone())
            .map_err(|_| RequestConnectionError::SelfPair)?;

        if !self.policy.allow_duplicate_pending
            && self
                .connection_repository
                .find_pending_between(&pair)
                .await?
                .is_some()
        {
            return Err(RequestConnectionError::AlreadyPending);
        }

        let request = ConnectionRequest::new(
            RequestIdFactory::generate(),
            from_user,
            to_user,
            context_topic,
            Timestamp::new(self.clock.now_millis()),
        );
        self.connection_repository.insert(request.clone()).await?;
        tracing::info!(
            "Connection request '{}' created: {} -> {}",
            request.id.as_str(),
            request.from_user.as_str(),
            request.to_user.as_str()
        );
        Ok(request)
    }
}
