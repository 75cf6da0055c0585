//! 시계 포트.
//!
//! 스냅샷 회전, 레코드 타임스탬프, 세션 경과 시간 계산에 사용.

use std::sync::atomic::{AtomicI64, Ordering};

/// 현재 시각 공급자 (Unix epoch 밀리초)
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// 시스템 시계
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// 수동 시계: 테스트와 재생 모드에서 시각을 직접 제어
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(start_ms),
        }
    }

    /// 시각을 `delta_ms`만큼 전진
    pub fn advance(&self, delta_ms: i64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn set(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        clock.advance(60_001);
        assert_eq!(clock.now_ms(), 61_001);
        clock.set(5);
        assert_eq!(clock.now_ms(), 5);
    }

    #[test]
    fn system_clock_is_epoch_millis() {
        // 2020-01-01 이후
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
