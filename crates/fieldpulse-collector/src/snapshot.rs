//! 스냅샷 로그와 회전 규칙.
//!
//! 지표 갱신은 항상 "최신 스냅샷"에 반영된다. 스냅샷이 없거나 최신 스냅샷이
//! 60초보다 오래됐으면 새 스냅샷을 열어 추가하고, 아니면 기존 것을 그대로 갱신한다.

use fieldpulse_core::models::context::HostContext;
use fieldpulse_core::models::telemetry::MetricsSnapshot;
use tracing::debug;

use crate::bounded_log::BoundedLog;
use crate::limits::{SNAPSHOT_LOG_CAP, SNAPSHOT_LOG_TRIM, SNAPSHOT_ROTATION_MS};
use crate::vitals::MetricUpdate;

/// 스냅샷 롤링 로그
#[derive(Debug)]
pub struct SnapshotLog {
    log: BoundedLog<MetricsSnapshot>,
}

impl Default for SnapshotLog {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotLog {
    pub fn new() -> Self {
        Self {
            log: BoundedLog::new(SNAPSHOT_LOG_CAP, SNAPSHOT_LOG_TRIM),
        }
    }

    /// 최신 스냅샷이 회전 대상인지
    fn needs_rotation(&self, now_ms: i64) -> bool {
        match self.log.last() {
            None => true,
            Some(latest) => now_ms - latest.timestamp > SNAPSHOT_ROTATION_MS,
        }
    }

    /// 최신 스냅샷에 갱신 반영 (필요하면 새 스냅샷을 연다)
    ///
    /// `context`는 새 스냅샷을 열 때만 호출된다.
    pub fn apply<I, F>(&mut self, now_ms: i64, session_id: &str, context: F, updates: I)
    where
        I: IntoIterator<Item = MetricUpdate>,
        F: FnOnce() -> HostContext,
    {
        if self.needs_rotation(now_ms) {
            self.log
                .push(MetricsSnapshot::open(&context(), session_id, now_ms));
            debug!("새 스냅샷 시작: timestamp={now_ms}, 보관 {}개", self.log.len());
        }

        if let Some(latest) = self.log.last_mut() {
            for update in updates {
                update.apply(latest);
            }
        }
    }

    /// 현재(가장 최근) 스냅샷: 회전하지 않는다
    pub fn current(&self) -> Option<&MetricsSnapshot> {
        self.log.last()
    }

    pub fn recent_cloned(&self, n: usize) -> Vec<MetricsSnapshot> {
        self.log.recent_cloned(n)
    }

    pub fn to_vec(&self) -> Vec<MetricsSnapshot> {
        self.log.to_vec()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}
