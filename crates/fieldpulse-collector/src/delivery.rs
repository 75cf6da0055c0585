//! 3단 전송 체인.
//!
//! 1차 비콘 → 2차 keep-alive POST → 3차 로컬 폴백 저장.
//! 각 단계는 `Result`로 성공/실패를 돌려주며, 마지막 단계의 실패는 삼킨다.
//! 재시도/백오프는 없다. 전송하지 못한 데이터는 다음 주기 플러시에 다시 실린다.

use std::sync::Arc;

use fieldpulse_core::error::CoreError;
use fieldpulse_core::models::telemetry::TelemetryPayload;
use fieldpulse_core::ports::storage::FallbackStore;
use fieldpulse_core::ports::transport::{BeaconTransport, PayloadTransport};
use tracing::{debug, warn};

/// 전송 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryTier {
    Beacon,
    Post,
}

/// 전송 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// 원격 전송 성공
    Delivered(DeliveryTier),
    /// 원격 전송 실패, 로컬 저장소에 보관
    Persisted,
    /// 전송/저장 모두 실패 (또는 직렬화 실패)
    Dropped,
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// 3단 전송 체인
#[derive(Clone)]
pub struct DeliveryChain {
    beacon: Option<Arc<dyn BeaconTransport>>,
    post: Option<Arc<dyn PayloadTransport>>,
    store: Arc<dyn FallbackStore>,
    fallback_key: String,
}

impl DeliveryChain {
    /// 새 전송 체인 생성
    ///
    /// 원격 전송 단계가 하나도 없으면 모든 페이로드가 로컬 저장소로 간다.
    pub fn new(store: Arc<dyn FallbackStore>, fallback_key: impl Into<String>) -> Self {
        Self {
            beacon: None,
            post: None,
            store,
            fallback_key: fallback_key.into(),
        }
    }

    /// 1차 비콘 전송 설정
    pub fn with_beacon(mut self, beacon: Arc<dyn BeaconTransport>) -> Self {
        self.beacon = Some(beacon);
        self
    }

    /// 2차 POST 전송 설정
    pub fn with_post(mut self, post: Arc<dyn PayloadTransport>) -> Self {
        self.post = Some(post);
        self
    }

    /// 페이로드 전송: 실패는 다음 단계로 넘기고 에러를 호출자에게 올리지 않는다
    pub async fn deliver(&self, payload: &TelemetryPayload) -> DeliveryOutcome {
        let body = match serde_json::to_string(payload) {
            Ok(body) => body,
            Err(e) => {
                warn!("페이로드 직렬화 실패, 전송 건너뜀: {e}");
                return DeliveryOutcome::Dropped;
            }
        };

        match self.try_beacon(&body) {
            Ok(()) => {
                debug!("비콘 전송 예약: {}개 레코드", payload.record_count());
                return DeliveryOutcome::Delivered(DeliveryTier::Beacon);
            }
            Err(e) => debug!("비콘 전송 불가, POST로 대체: {e}"),
        }

        match self.try_post(body.clone()).await {
            Ok(()) => {
                debug!("POST 전송 완료: {}개 레코드", payload.record_count());
                return DeliveryOutcome::Delivered(DeliveryTier::Post);
            }
            Err(e) => warn!("POST 전송 실패, 로컬 저장소에 보관: {e}"),
        }

        match self.store.put(&self.fallback_key, &body).await {
            Ok(()) => DeliveryOutcome::Persisted,
            Err(e) => {
                // 용량 초과 등: 조용히 버린다
                debug!("폴백 저장 실패, 페이로드 폐기: {e}");
                DeliveryOutcome::Dropped
            }
        }
    }

    fn try_beacon(&self, body: &str) -> Result<(), CoreError> {
        match &self.beacon {
            Some(beacon) => beacon.send_beacon(body),
            None => Err(CoreError::Unsupported("비콘 전송".to_string())),
        }
    }

    async fn try_post(&self, body: String) -> Result<(), CoreError> {
        match &self.post {
            Some(post) => post.post_json(body).await,
            None => Err(CoreError::Unsupported("POST 전송".to_string())),
        }
    }
}
