//! 수집기 고정 임계값.

use std::time::Duration;

/// 스냅샷 회전 기준 (이보다 오래된 스냅샷은 닫고 새로 연다)
pub const SNAPSHOT_ROTATION_MS: i64 = 60_000;

/// 주기 플러시 간격
pub const FLUSH_INTERVAL: Duration = Duration::from_secs(30);

/// 로드 완료 후 첫 플러시 지연
pub const POST_LOAD_DELAY: Duration = Duration::from_secs(1);

/// 스냅샷 로그 상한/트림
pub const SNAPSHOT_LOG_CAP: usize = 50;
pub const SNAPSHOT_LOG_TRIM: usize = 25;

/// API 호출 로그 상한/트림
pub const API_LOG_CAP: usize = 100;
pub const API_LOG_TRIM: usize = 50;

/// 에러 로그 상한/트림
pub const ERROR_LOG_CAP: usize = 50;
pub const ERROR_LOG_TRIM: usize = 25;

/// 여정 로그 상한/트림
pub const JOURNEY_LOG_CAP: usize = 50;
pub const JOURNEY_LOG_TRIM: usize = 25;

/// API 호출 기록 시 캐시 적중률/에러율 계산 윈도우
pub const RECORD_RATE_WINDOW: usize = 10;

/// 성능 요약 계산 윈도우
pub const SUMMARY_WINDOW: usize = 20;

/// 주기 플러시 페이로드 크기
pub const PAYLOAD_SNAPSHOTS: usize = 5;
pub const PAYLOAD_API_CALLS: usize = 20;
pub const PAYLOAD_ERRORS: usize = 10;
pub const PAYLOAD_JOURNEY: usize = 10;
