//! 전송 포트.
//!
//! 1차: 비콘 방식 (동기 큐잉, 응답 대기 없음, 종료 중에도 전송 시도)
//! 2차: keep-alive POST (비동기)

use async_trait::async_trait;

use crate::error::CoreError;

/// 비콘 방식 전송
///
/// 전송을 예약만 하고 즉시 반환한다. 예약 거부(크기 초과, 런타임 없음 등)는 에러.
pub trait BeaconTransport: Send + Sync {
    fn send_beacon(&self, body: &str) -> Result<(), CoreError>;
}

/// JSON 페이로드 POST 전송
///
/// 요청이 전송되고 응답을 받으면 상태 코드와 무관하게 `Ok`.
#[async_trait]
pub trait PayloadTransport: Send + Sync {
    async fn post_json(&self, body: String) -> Result<(), CoreError>;
}
