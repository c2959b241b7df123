//! Time-related utilities with clock abstraction for testability.
//!
//! All instants in Utakata are Unix epoch milliseconds (`i64`). Expiry and
//! presence windows are pure arithmetic on these values, so tests can pin or
//! advance a [`FixedClock`] to hit boundaries exactly.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp in milliseconds
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Fixed clock implementation for testing.
///
/// Returns a pinned time that can be moved forward with [`FixedClock::advance`],
/// which is how TTL-boundary and presence-window tests step across thresholds.
#[derive(Debug)]
pub struct FixedClock {
    fixed_time: std::sync::atomic::AtomicI64,
}

impl FixedClock {
    /// Create a new fixed clock pinned at the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: std::sync::atomic::AtomicI64::new(fixed_time_millis),
        }
    }

    /// Move the clock forward by the given number of milliseconds
    pub fn advance(&self, delta_millis: i64) {
        self.fixed_time
            .fetch_add(delta_millis, std::sync::atomic::Ordering::SeqCst);
    }

    /// Pin the clock to a new timestamp
    pub fn set(&self, fixed_time_millis: i64) {
        self.fixed_time
            .store(fixed_time_millis, std::sync::atomic::Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Convert Unix timestamp (milliseconds) to JST RFC 3339 format for display
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    let jst_offset = FixedOffset::east_opt(9 * 3600).unwrap(); // JST is UTC+9
    let seconds = timestamp_millis.div_euclid(1000);
    let nanos = (timestamp_millis.rem_euclid(1000) * 1_000_000) as u32;
    let dt: DateTime<FixedOffset> = jst_offset
        .timestamp_opt(seconds, nanos)
        .single()
        .unwrap_or_else(|| jst_offset.timestamp_opt(0, 0).unwrap());
    dt.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_non_zero_timestamp() {
        // テスト項目: SystemClock が 0 以外のタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp = clock.now_millis();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_system_clock_returns_increasing_timestamps() {
        // テスト項目: SystemClock が呼び出すたびに増加するタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp1 = clock.now_millis();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let timestamp2 = clock.now_millis();

        // then (期待する結果):
        assert!(timestamp2 >= timestamp1);
    }

    #[test]
    fn test_fixed_clock_returns_fixed_timestamp() {
        // テスト項目: FixedClock が固定されたタイムスタンプを返す
        // given (前提条件):
        let fixed_time = 1234567890123;
        let clock = FixedClock::new(fixed_time);

        // when (操作):
        let timestamp = clock.now_millis();

        // then (期待する結果):
        assert_eq!(timestamp, fixed_time);
    }

    #[test]
    fn test_fixed_clock_advance_moves_time_forward() {
        // テスト項目: FixedClock::advance で時刻が前進する
        // given (前提条件):
        let clock = FixedClock::new(1_000_000);

        // when (操作):
        clock.advance(7_200_000);

        // then (期待する結果):
        assert_eq!(clock.now_millis(), 8_200_000);
    }

    #[test]
    fn test_fixed_clock_set_pins_new_timestamp() {
        // テスト項目: FixedClock::set で時刻を再固定できる
        // given (前提条件):
        let clock = FixedClock::new(1_000_000);
        clock.advance(500);

        // when (操作):
        clock.set(42);

        // then (期待する結果):
        assert_eq!(clock.now_millis(), 42);
    }

    #[test]
    fn test_timestamp_to_jst_rfc3339_format() {
        // テスト項目: タイムスタンプが正しく RFC 3339 形式に変換される
        // given (前提条件):
        // 2023-01-01 00:00:00 JST in milliseconds
        let timestamp = 1672498800000;

        // when (操作):
        let result = timestamp_to_jst_rfc3339(timestamp);

        // then (期待する結果):
        assert!(result.starts_with("2023-01-01T00:00:00"));
        assert!(result.contains("+09:00"));
    }

    #[test]
    fn test_timestamp_to_jst_rfc3339_with_milliseconds() {
        // テスト項目: ミリ秒を含むタイムスタンプが正しく変換される
        // given (前提条件):
        let timestamp = 1672498800123; // includes milliseconds

        // when (操作):
        let result = timestamp_to_jst_rfc3339(timestamp);

        // then (期待する結果):
        assert!(result.starts_with("2023-01-01T00:00:00"));
        assert!(result.contains("+09:00"));
    }
}
