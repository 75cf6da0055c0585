//! keep-alive POST 전송.
//!
//! `PayloadTransport` 포트 구현. 응답을 받으면 상태 코드와 무관하게 전송 완료로 본다.

use std::time::Duration;

use async_trait::async_trait;
use fieldpulse_core::error::CoreError;
use fieldpulse_core::ports::transport::PayloadTransport;
use reqwest::header::{CONNECTION, CONTENT_TYPE};
use tracing::debug;

use crate::build_client;

/// 수집 엔드포인트 POST 클라이언트
pub struct HttpIngestClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpIngestClient {
    /// 새 POST 클라이언트 생성
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, CoreError> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl PayloadTransport for HttpIngestClient {
    async fn post_json(&self, body: String) -> Result<(), CoreError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(CONNECTION, "keep-alive")
            .body(body)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("텔레메트리 POST 실패: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            debug!("텔레메트리 POST 완료: {status}");
        } else {
            debug!("텔레메트리 POST 응답 비정상 (무시): {status}");
        }
        Ok(())
    }
}
