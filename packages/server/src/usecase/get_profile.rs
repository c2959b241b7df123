//! UseCase: プロフィール取得

use std::sync::Arc;

use crate::domain::{ProfileRepository, RepositoryError, UserId, UserProfile};

/// プロフィール取得のユースケース
pub struct GetProfileUseCase {
    /// Repository（プロフィールの抽象化）
    profile_repository: Arc<dyn ProfileRepository>,
}

impl GetProfileUseCase {
    /// 新しい GetProfileUseCase を作成
    pub fn new(profile_repository: Arc<dyn ProfileRepository>) -> Self {
        Self { profile_repository }
    }

    /// プロフィールを取得（未作成なら None）
    pub async fn execute(&self, user: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        self.profile_repository.get(user).await
    }

    /// 複数プロフィールを一括取得（存在しない ID は結果から落ちる）
    pub async fn execute_many(
        &self,
        users: &[UserId],
    ) -> Result<Vec<UserProfile>, RepositoryError> {
        self.profile_repository.get_many(users).await
    }
}
