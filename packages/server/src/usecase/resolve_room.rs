//! UseCase: ルーム解決処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ResolveRoomUseCase::execute() メソッド
//! - トピック → スラグの収束（参加）と新規作成の分岐
//! - パスワードゲート（PasswordRequired / InvalidPassword）
//!
//! ### なぜこのテストが必要か
//! - スラグの一意性はルームディレクトリ全体の不変条件
//! - パスワードゲートはロック付きルームの唯一の防衛線
//! - 毎回ストアを再解決する（キャッシュしない）契約を保証
//!
//! ### どのような状況を想定しているか
//! - 正常系: 新規作成、同一スラグへの再解決（参加）
//! - 異常系: パスワード無し・誤パスワードでのロック付きルーム参加
//! - エッジケース: 空白のみのトピック、空文字パスワード

use std::sync::Arc;

use utakata_shared::time::Clock;

use crate::domain::{
    PasswordHasher, Room, RoomIdFactory, RoomRepository, Slug, Timestamp, UserId,
};

use super::error::ResolveRoomError;

/// ルーム解決のユースケース
///
/// トピックをスラグに正規化し、既存ルームへの参加または新規作成を行う。
/// キャッシュ層は持たず、呼び出しごとにストアを再解決します。
pub struct ResolveRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    room_repository: Arc<dyn RoomRepository>,
    /// PasswordHasher（パスワードゲートの抽象化）
    password_hasher: Arc<dyn PasswordHasher>,
    /// Clock（時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl ResolveRoomUseCase {
    /// 新しい ResolveRoomUseCase を作成
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            room_repository,
            password_hasher,
            clock,
        }
    }

    /// ルーム解決を実行
    ///
    /// # Arguments
    ///
    /// * `topic` - 入力されたトピック文字列（正規化前）
    /// * `password` - ロック付きルーム用のパスワード（空文字は無しと同義）
    /// * `requesting_user` - 作成者となるユーザー（匿名作成なら None）
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 既存ルーム（参加）または新規作成されたルーム
    /// * `Err(ResolveRoomError)` - 解決失敗
    pub async fn execute(
        &self,
        topic: &str,
        password: Option<&str>,
        requesting_user: Option<UserId>,
    ) -> Result<Room, ResolveRoomError> {
        let slug = Slug::from_topic(topic)?;
        // 空文字のパスワードは「無し」として扱う
        let password = password.filter(|p| !p.is_empty());

        if let Some(existing) = self.room_repository.find_by_slug(&slug).await? {
            if !existing.is_locked {
                return Ok(existing);
            }

            let Some(stored_hash) = existing.password_hash.as_deref() else {
                // is_locked なら必ずハッシュを持つ不変条件が破れている
                return Err(ResolveRoomError::PasswordRequired);
            };
            return match password {
                None => Err(ResolveRoomError::PasswordRequired),
                Some(supplied) => {
                    if self.password_hasher.verify(supplied, stored_hash)? {
                        Ok(existing)
                    } else {
                        Err(ResolveRoomError::InvalidPassword)
                    }
                }
            };
        }

        // 新規作成。パスワードが与えられていればハッシュ化してロックする。
        let password_hash = match password {
            Some(p) => Some(self.password_hasher.hash(p)?),
            None => None,
        };
        let room = Room::new(
            RoomIdFactory::generate(),
            topic.trim().to_string(),
            slug,
            password_hash,
            requesting_user,
            Timestamp::new(self.clock.now_millis()),
        );
        self.room_repository.insert(room.clone()).await?;
        tracing::info!(
            "Room '{}' created (slug: '{}', locked: {})",
            room.topic,
            room.slug.as_str(),
            room.is_locked
        );

        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::password::MockPasswordHasher;
    use crate::infrastructure::password::Argon2PasswordHasher;
    use crate::infrastructure::repository::InMemoryRoomRepository;
    use utakata_shared::time::FixedClock;

    fn create_usecase() -> ResolveRoomUseCase {
        ResolveRoomUseCase::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(Argon2PasswordHasher::new()),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        )
    }

    #[tokio::test]
    async fn test_create_then_rejoin_same_room() {
        // テスト項目: 同じスラグに正規化されるトピックは同じルームに解決される
        // given (前提条件):
        let usecase = create_usecase();
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作): 大文字小文字・空白違いで 2 回解決
        let created = usecase
            .execute("Night Owls", None, Some(alice))
            .await
            .unwrap();
        let rejoined = usecase.execute("  night   OWLS ", None, None).await.unwrap();

        // then (期待する結果): 2 回目は再作成ではなく同じルーム
        assert_eq!(created.id, rejoined.id);
        assert_eq!(created.slug.as_str(), "night-owls");
        assert!(!created.is_locked);
    }

    #[tokio::test]
    async fn test_locked_room_requires_password() {
        // テスト項目: ロック付きルームはパスワード無しで参加できない
        // given (前提条件):
        let usecase = create_usecase();
        usecase.execute("Vault", Some("abcd"), None).await.unwrap();

        // when (操作):
        let result = usecase.execute("Vault", None, None).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ResolveRoomError::PasswordRequired);
    }

    #[tokio::test]
    async fn test_locked_room_rejects_wrong_password() {
        // テスト項目: 誤ったパスワードは InvalidPassword になる
        // given (前提条件):
        let usecase = create_usecase();
        usecase.execute("Vault", Some("abcd"), None).await.unwrap();

        // when (操作):
        let result = usecase.execute("Vault", Some("wrong"), None).await;

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ResolveRoomError::InvalidPassword);
    }

    #[tokio::test]
    async fn test_locked_room_accepts_correct_password() {
        // テスト項目: 正しいパスワードでロック付きルームに参加できる
        // given (前提条件):
        let usecase = create_usecase();
        let created = usecase.execute("Vault", Some("abcd"), None).await.unwrap();

        // when (操作):
        let joined = usecase.execute("Vault", Some("abcd"), None).await.unwrap();

        // then (期待する結果):
        assert_eq!(created.id, joined.id);
        assert!(joined.is_locked);
    }

    #[tokio::test]
    async fn test_empty_password_creates_unlocked_room() {
        // テスト項目: 空文字のパスワードではルームがロックされない
        // given (前提条件):
        let usecase = create_usecase();

        // when (操作):
        let room = usecase.execute("Open Space", Some(""), None).await.unwrap();

        // then (期待する結果):
        assert!(!room.is_locked);
        assert!(room.password_hash.is_none());
    }

    #[tokio::test]
    async fn test_whitespace_topic_is_rejected() {
        // テスト項目: 空白のみのトピックは InvalidTopic になる
        // given (前提条件):
        let usecase = create_usecase();

        // when (操作):
        let result = usecase.execute("   ", None, None).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ResolveRoomError::InvalidTopic(_))));
    }

    #[tokio::test]
    async fn test_unlocked_room_never_consults_hasher() {
        // テスト項目: ロックされていないルームへの参加でハッシュ照合が走らない
        // given (前提条件):
        let repository: Arc<dyn RoomRepository> = Arc::new(InMemoryRoomRepository::new());
        let clock = Arc::new(FixedClock::new(1_700_000_000_000));
        {
            // 事前にロック無しルームを作成（ハッシュは使われない）
            let mut setup_hasher = MockPasswordHasher::new();
            setup_hasher.expect_hash().never();
            let setup = ResolveRoomUseCase::new(
                repository.clone(),
                Arc::new(setup_hasher),
                clock.clone(),
            );
            setup.execute("Night Owls", None, None).await.unwrap();
        }

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().never();
        hasher.expect_hash().never();
        let usecase = ResolveRoomUseCase::new(repository, Arc::new(hasher), clock);

        // when (操作): パスワードを渡しても unlocked なら照合しない
        let result = usecase.execute("Night Owls", Some("ignored"), None).await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_created_by_recorded_for_authenticated_creation() {
        // テスト項目: 作成者付きの作成で created_by が記録される
        // given (前提条件):
        let usecase = create_usecase();
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作):
        let room = usecase
            .execute("Night Owls", None, Some(alice.clone()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.created_by, Some(alice));
    }
}
