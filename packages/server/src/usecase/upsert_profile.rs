//! UseCase: プロフィール upsert
//!
//! 未作成なら作成、既存なら部分更新。フレンドリストの重複排除という
//! 不変条件はここで毎回正規化して保証します。

use std::sync::Arc;

use utakata_shared::time::Clock;

use crate::domain::{
    ProfileRepository, RepositoryError, Timestamp, UserId, UserProfile, Username,
};

/// プロフィール upsert のユースケース
pub struct UpsertProfileUseCase {
    /// Repository（プロフィールの抽象化）
    profile_repository: Arc<dyn ProfileRepository>,
    /// Clock（時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl UpsertProfileUseCase {
    /// 新しい UpsertProfileUseCase を作成
    pub fn new(profile_repository: Arc<dyn ProfileRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            profile_repository,
            clock,
        }
    }

    /// プロフィール upsert を実行
    ///
    /// # Arguments
    ///
    /// * `user_id` - 対象ユーザー
    /// * `display_name` - 新しい表示名（None なら既存値を保持）
    /// * `avatar` - 新しいアバター参照（None なら既存値を保持）
    ///
    /// # Returns
    ///
    /// * `Ok(UserProfile)` - 更新後のプロフィール
    pub async fn execute(
        &self,
        user_id: UserId,
        display_name: Option<Username>,
        avatar: Option<String>,
    ) -> Result<UserProfile, RepositoryError> {
        let now = Timestamp::new(self.clock.now_millis());
        let mut profile = self
            .profile_repository
            .get(&user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new(user_id, now));

        profile.apply_patch(display_name, avatar, now);
        profile.normalize_friends();
        self.profile_repository.upsert(profile.clone()).await?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repository::InMemoryProfileRepository;
    use utakata_shared::time::FixedClock;

    const T0: i64 = 1_700_000_000_000;

    #[tokio::test]
    async fn test_upsert_creates_profile_when_missing() {
        // テスト項目: 未作成のユーザーへの upsert がプロフィールを作成する
        // given (前提条件):
        let repository = Arc::new(InMemoryProfileRepository::new());
        let usecase =
            UpsertProfileUseCase::new(repository.clone(), Arc::new(FixedClock::new(T0)));
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作):
        let profile = usecase
            .execute(
                alice.clone(),
                Some(Username::new("Alice".to_string()).unwrap()),
                None,
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(profile.display_name.as_ref().unwrap().as_str(), "Alice");
        assert_eq!(profile.updated_at, Timestamp::new(T0));
        assert!(repository.get(&alice).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_upsert_patches_existing_profile() {
        // テスト項目: 既存プロフィールの部分更新で未指定フィールドが保持される
        // given (前提条件):
        let repository = Arc::new(InMemoryProfileRepository::new());
        let clock = Arc::new(FixedClock::new(T0));
        let usecase = UpsertProfileUseCase::new(repository.clone(), clock.clone());
        let alice = UserId::new("alice".to_string()).unwrap();
        usecase
            .execute(
                alice.clone(),
                Some(Username::new("Alice".to_string()).unwrap()),
                Some("avatar-1".to_string()),
            )
            .await
            .unwrap();

        // when (操作): アバターだけ更新
        clock.advance(60_000);
        let updated = usecase
            .execute(alice, None, Some("avatar-2".to_string()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(updated.display_name.as_ref().unwrap().as_str(), "Alice");
        assert_eq!(updated.avatar.as_deref(), Some("avatar-2"));
        assert_eq!(updated.updated_at, Timestamp::new(T0 + 60_000));
    }

    #[tokio::test]
    async fn test_upsert_deduplicates_friend_list() {
        // テスト項目: upsert 経由でフレンドリストの重複が正規化される
        // given (前提条件):
        let repository = Arc::new(InMemoryProfileRepository::new());
        let alice = UserId::new("alice".to_string()).unwrap();
        let bob = UserId::new("bob".to_string()).unwrap();
        let mut seeded = UserProfile::new(alice.clone(), Timestamp::new(T0));
        seeded.friends = vec![bob.clone(), bob.clone()];
        repository.upsert(seeded).await.unwrap();
        let usecase = UpsertProfileUseCase::new(repository, Arc::new(FixedClock::new(T0)));

        // when (操作):
        let profile = usecase.execute(alice, None, None).await.unwrap();

        // then (期待する結果):
        assert_eq!(profile.friends, vec![bob]);
    }
}
