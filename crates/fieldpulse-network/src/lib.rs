//! # fieldpulse-network
//!
//! 텔레메트리 수집 엔드포인트 전송 어댑터.
//! 수집기의 1차(비콘)/2차(keep-alive POST) 전송 포트를 reqwest로 구현한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use fieldpulse_network::beacon::BeaconClient;
//! use fieldpulse_network::http_client::HttpIngestClient;
//!
//! let url = config.server.ingest_url();
//! let beacon = BeaconClient::new(&url, config.server.request_timeout())?;
//! let post = HttpIngestClient::new(&url, config.server.request_timeout())?;
//! ```

pub mod beacon;
pub mod http_client;

use std::time::Duration;

use fieldpulse_core::error::CoreError;

/// 공통 reqwest 클라이언트 빌드
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, CoreError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))
}
