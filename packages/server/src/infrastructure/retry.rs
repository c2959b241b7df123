//! ストア操作のリトライポリシー
//!
//! 外部 I/O 境界（ホスト型ストア）に対する操作は、一時的な失敗
//! （`RepositoryError::Transient`）に限り線形バックオフでリトライします。
//! 認可エラー・NotFound などの非リトライ系は初回失敗で即座に伝播します。
//!
//! ## 設計ノート
//!
//! オンライン/オフラインの状態はプロセス全域のグローバルフラグではなく、
//! 明示的に注入される [`ConnectivityState`] として扱います。呼び出し側は
//! この observer を渡すか照会するだけで、ambient な可変状態には触れません。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::domain::RepositoryError;

/// 最大試行回数
pub const MAX_ATTEMPTS: u32 = 3;

/// バックオフの基準（attempt × この値だけ待つ）
pub const BACKOFF_UNIT: Duration = Duration::from_millis(1000);

/// ネットワーク接続状態の observer
///
/// ブラウザのオンライン/オフラインイベント相当を抽象化したもの。
/// クローンはすべて同じ状態を共有します。
#[derive(Debug, Clone)]
pub struct ConnectivityState {
    online: Arc<AtomicBool>,
}

impl ConnectivityState {
    /// オンライン状態で初期化
    pub fn new_online() -> Self {
        Self {
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// 接続状態を更新（ネットワークイベントのハンドラから呼ばれる想定）
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

/// 操作を最大 [`MAX_ATTEMPTS`] 回までリトライ付きで実行
///
/// - 各試行の前に接続状態を確認し、オフラインなら操作を発行せず
///   一時的失敗として扱う
/// - `is_retryable()` が false のエラーは即座に返す
/// - n 回目の失敗後は `n × BACKOFF_UNIT` 待ってから次の試行に入る
pub async fn with_retries<T, F, Fut>(
    connectivity: &ConnectivityState,
    operation: &str,
    mut f: F,
) -> Result<T, RepositoryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RepositoryError>>,
{
    let mut last_error = RepositoryError::Transient("no attempt made".to_string());

    for attempt in 1..=MAX_ATTEMPTS {
        if !connectivity.is_online() {
            tracing::warn!(
                "Skipping attempt {}/{} of '{}': connectivity observer reports offline",
                attempt,
                MAX_ATTEMPTS,
                operation
            );
            last_error = RepositoryError::Transient("offline".to_string());
        } else {
            match f().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "Attempt {}/{} of '{}' failed transiently: {}",
                        attempt,
                        MAX_ATTEMPTS,
                        operation,
                        e
                    );
                    last_error = e;
                }
            }
        }

        if attempt < MAX_ATTEMPTS {
            tokio::time::sleep(BACKOFF_UNIT * attempt).await;
        }
    }

    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicU32;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 成功時に 1 回で返ること
    // - 一時的失敗のリトライと上限到達
    // - 非リトライ系エラーの即時伝播
    // - オフライン時に操作が発行されないこと
    //
    // 【なぜこのテストが必要か】
    // - リトライの有無・回数はストア境界の信頼性そのもの
    // - 非リトライ系まで再試行すると認可エラーの隠蔽につながる
    // ========================================

    fn counting_op(
        counter: Arc<AtomicU32>,
        results: Vec<Result<u32, RepositoryError>>,
    ) -> impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = Result<u32, RepositoryError>> + Send>>
    {
        let results = Arc::new(Mutex::new(results));
        move || {
            let counter = counter.clone();
            let results = results.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                results.lock().unwrap().remove(0)
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_returns_without_retry() {
        // テスト項目: 成功した操作はリトライされない
        // given (前提条件):
        let connectivity = ConnectivityState::new_online();
        let calls = Arc::new(AtomicU32::new(0));

        // when (操作):
        let result = with_retries(
            &connectivity,
            "insert room",
            counting_op(calls.clone(), vec![Ok(42)]),
        )
        .await;

        // then (期待する結果):
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_retries_then_succeeds() {
        // テスト項目: 一時的失敗は再試行され、成功すればその値が返る
        // given (前提条件):
        let connectivity = ConnectivityState::new_online();
        let calls = Arc::new(AtomicU32::new(0));

        // when (操作):
        let result = with_retries(
            &connectivity,
            "append message",
            counting_op(
                calls.clone(),
                vec![
                    Err(RepositoryError::Transient("blip".to_string())),
                    Ok(7),
                ],
            ),
        )
        .await;

        // then (期待する結果):
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        // テスト項目: 一時的失敗が続く場合は上限回数で打ち切られる
        // given (前提条件):
        let connectivity = ConnectivityState::new_online();
        let calls = Arc::new(AtomicU32::new(0));

        // when (操作):
        let result: Result<u32, _> = with_retries(
            &connectivity,
            "sweep",
            counting_op(
                calls.clone(),
                vec![
                    Err(RepositoryError::Transient("1".to_string())),
                    Err(RepositoryError::Transient("2".to_string())),
                    Err(RepositoryError::Transient("3".to_string())),
                ],
            ),
        )
        .await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::Transient("3".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_fails_immediately() {
        // テスト項目: NotFound は再試行されず初回で伝播する
        // given (前提条件):
        let connectivity = ConnectivityState::new_online();
        let calls = Arc::new(AtomicU32::new(0));

        // when (操作):
        let result: Result<u32, _> = with_retries(
            &connectivity,
            "find room",
            counting_op(
                calls.clone(),
                vec![Err(RepositoryError::NotFound("room", "x".to_string()))],
            ),
        )
        .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::NotFound("room", "x".to_string()))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_observer_suppresses_attempts() {
        // テスト項目: オフライン中は操作が一度も発行されない
        // given (前提条件):
        let connectivity = ConnectivityState::new_online();
        connectivity.set_online(false);
        let calls = Arc::new(AtomicU32::new(0));

        // when (操作):
        let result: Result<u32, _> = with_retries(
            &connectivity,
            "list rooms",
            counting_op(calls.clone(), vec![Ok(1), Ok(1), Ok(1)]),
        )
        .await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::Transient("offline".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovery_mid_sequence_is_picked_up() {
        // テスト項目: 途中でオンラインに戻れば残りの試行で成功できる
        // given (前提条件):
        let connectivity = ConnectivityState::new_online();
        connectivity.set_online(false);
        let calls = Arc::new(AtomicU32::new(0));

        // オフライン → 1 秒後に復帰
        let connectivity_clone = connectivity.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            connectivity_clone.set_online(true);
        });

        // when (操作):
        let result = with_retries(
            &connectivity,
            "heartbeat",
            counting_op(calls.clone(), vec![Ok(9)]),
        )
        .await;

        // then (期待する結果):
        assert_eq!(result, Ok(9));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
