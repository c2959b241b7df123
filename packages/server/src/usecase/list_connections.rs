//! UseCase: 接続リクエスト一覧取得

use std::sync::Arc;

use crate::domain::{ConnectionRepository, ConnectionRequest, RepositoryError, UserId};

/// 接続リクエスト一覧のユースケース
pub struct ListConnectionsUseCase {
    /// Repository（接続リクエストの抽象化）
    connection_repository: Arc<dyn ConnectionRepository>,
}

impl ListConnectionsUseCase {
    /// 新しい ListConnectionsUseCase を作成
    pub fn new(connection_repository: Arc<dyn ConnectionRepository>) -> Self {
        Self {
            connection_repository,
        }
    }

    /// 自分宛ての Pending リクエスト
    pub async fn incoming(&self, user: &UserId) -> Result<Vec<ConnectionRequest>, RepositoryError> {
        self.connection_repository.list_incoming(user).await
    }

    /// 自分発の Pending リクエスト
    pub async fn sent(&self, user: &UserId) -> Result<Vec<ConnectionRequest>, RepositoryError> {
        self.connection_repository.list_sent(user).await
    }

    /// 自分が当事者の Accepted リクエスト（プライベートルームの入口一覧）
    pub async fn accepted(&self, user: &UserId) -> Result<Vec<ConnectionRequest>, RepositoryError> {
        self.connection_repository.list_accepted(user).await
    }
}
