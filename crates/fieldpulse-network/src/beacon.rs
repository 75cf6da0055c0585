//! 비콘 방식 전송.
//!
//! `BeaconTransport` 포트 구현. 현재 tokio 런타임에 분리된 POST 태스크를 걸어 두고
//! 즉시 반환한다. 결과는 기다리지 않으며, 큐에 올리지 못한 경우만 실패로 돌려준다.

use std::time::Duration;

use fieldpulse_core::error::CoreError;
use fieldpulse_core::ports::transport::BeaconTransport;
use reqwest::header::CONTENT_TYPE;
use tokio::runtime::Handle;
use tracing::debug;

use crate::build_client;

/// 비콘 본문 최대 크기 (64 KiB)
pub const MAX_BEACON_BYTES: usize = 64 * 1024;

/// 비콘 전송 클라이언트
pub struct BeaconClient {
    client: reqwest::Client,
    endpoint: String,
    max_bytes: usize,
}

impl BeaconClient {
    /// 새 비콘 클라이언트 생성
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, CoreError> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.to_string(),
            max_bytes: MAX_BEACON_BYTES,
        })
    }

    /// 본문 크기 제한 변경
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl BeaconTransport for BeaconClient {
    fn send_beacon(&self, body: &str) -> Result<(), CoreError> {
        if body.len() > self.max_bytes {
            return Err(CoreError::Network(format!(
                "비콘 크기 초과: {} > {} bytes",
                body.len(),
                self.max_bytes
            )));
        }

        let runtime = Handle::try_current()
            .map_err(|e| CoreError::Unsupported(format!("비콘 전송 런타임 없음: {e}")))?;

        let request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string());

        runtime.spawn(async move {
            match request.send().await {
                Ok(resp) => debug!("비콘 전송 완료: {}", resp.status()),
                Err(e) => debug!("비콘 전송 실패 (무시): {e}"),
            }
        });
        Ok(())
    }
}
