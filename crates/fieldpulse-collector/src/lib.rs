//! # fieldpulse-collector
//!
//! 클라이언트 텔레메트리 수집기.
//! 관측 소스(페인트, 입력 지연, 레이아웃 이동, 리소스, 스크립트 에러)를 구독해
//! 성능 지표 스냅샷을 유지하고, API 호출/에러/사용자 여정을 제한 롤링 로그에 쌓아
//! 비콘 → POST → 로컬 저장소 순으로 배치 전송한다.
//!
//! ## 모듈
//!
//! - [`collector`]: `TelemetryCollector` (기록/요약/전송/정리)
//! - [`delivery`]: 3단 전송 체인
//! - [`vitals`]: 관측 엔트리 → 지표 갱신 변환
//! - [`snapshot`]: 스냅샷 로그와 60초 회전 규칙
//! - [`bounded_log`]: 상한/트림 롤링 로그
//! - [`summary`]: API 호출 윈도우 통계
//! - [`limits`]: 로그 상한, 전송 윈도우, 타이머 상수
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! let delivery = DeliveryChain::new(store, DEFAULT_FALLBACK_KEY)
//!     .with_beacon(beacon)
//!     .with_post(post);
//! let collector = Arc::new(
//!     TelemetryCollector::new(host, delivery, Arc::new(SystemClock)).with_sources(sources),
//! );
//! collector.initialize();
//! collector.record_api_call("/api/greenhouse/analysis", "GET", 120.0, 200, false);
//! ```

pub mod bounded_log;
pub mod collector;
pub mod delivery;
pub mod limits;
mod schedule;
pub mod session;
pub mod snapshot;
pub mod summary;
pub mod vitals;

#[cfg(test)]
mod testing;

pub use collector::{ApiCallTimer, TelemetryCollector};
pub use delivery::{DeliveryChain, DeliveryOutcome, DeliveryTier};
