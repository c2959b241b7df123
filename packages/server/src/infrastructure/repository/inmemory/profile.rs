//! InMemory Profile Repository 実装

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ProfileRepository, RepositoryError, UserId, UserProfile};

/// インメモリ Profile Repository 実装
pub struct InMemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<String, UserProfile>>>,
}

impl InMemoryProfileRepository {
    /// 空のストアを持つ新しい InMemoryProfileRepository を作成
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryProfileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn get(&self, user: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let profiles = self.profiles.lock().await;
        Ok(profiles.get(user.as_str()).cloned())
    }

    async fn get_many(&self, users: &[UserId]) -> Result<Vec<UserProfile>, RepositoryError> {
        let profiles = self.profiles.lock().await;
        Ok(users
            .iter()
            .filter_map(|user| profiles.get(user.as_str()).cloned())
            .collect())
    }

    async fn upsert(&self, profile: UserProfile) -> Result<(), RepositoryError> {
        let mut profiles = self.profiles.lock().await;
        profiles.insert(profile.user_id.as_str().to_string(), profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;

    #[tokio::test]
    async fn test_get_many_skips_missing_profiles() {
        // テスト項目: 存在しない ID は get_many の結果から落ちる
        // given (前提条件):
        let repo = InMemoryProfileRepository::new();
        let alice = UserId::new("alice".to_string()).unwrap();
        let ghost = UserId::new("ghost".to_string()).unwrap();
        repo.upsert(UserProfile::new(alice.clone(), Timestamp::new(1000)))
            .await
            .unwrap();

        // when (操作):
        let profiles = repo.get_many(&[alice.clone(), ghost]).await.unwrap();

        // then (期待する結果):
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].user_id, alice);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_profile() {
        // テスト項目: 同一ユーザーへの upsert が既存プロフィールを置き換える
        // given (前提条件):
        let repo = InMemoryProfileRepository::new();
        let alice = UserId::new("alice".to_string()).unwrap();
        repo.upsert(UserProfile::new(alice.clone(), Timestamp::new(1000)))
            .await
            .unwrap();

        // when (操作):
        let mut updated = UserProfile::new(alice.clone(), Timestamp::new(2000));
        updated.avatar = Some("avatar-1".to_string());
        repo.upsert(updated).await.unwrap();

        // then (期待する結果):
        let found = repo.get(&alice).await.unwrap().unwrap();
        assert_eq!(found.avatar.as_deref(), Some("avatar-1"));
        assert_eq!(found.updated_at, Timestamp::new(2000));
    }
}
