//! 텔레메트리 모델.
//!
//! 수집기가 보관하고 수집 엔드포인트로 전송하는 레코드를 정의.
//! JSON 필드명은 수집 엔드포인트 계약에 맞춰 camelCase를 사용한다.
//! 시각은 Unix epoch 밀리초, 소요 시간은 밀리초(`f64`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::context::{HostContext, Viewport};

/// 성능 지표 스냅샷 (최대 60초 동안 갱신되는 집계)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// First Contentful Paint
    pub fcp: f64,
    /// Largest Contentful Paint
    pub lcp: f64,
    /// First Input Delay
    pub fid: f64,
    /// Cumulative Layout Shift
    pub cls: f64,
    /// Time To First Byte
    pub ttfb: f64,
    /// 페이지 로드 전체 시간
    pub page_load_time: f64,
    /// DOMContentLoaded 시간
    pub dom_content_loaded: f64,
    /// 리소스 로드 시간 (마지막 관측값)
    pub resource_load_time: f64,
    /// 이미지 로드 시간 (마지막 관측값)
    pub image_load_time: f64,
    /// 스크립트 로드 시간 (마지막 관측값)
    pub script_load_time: f64,
    /// API 응답 시간 (마지막 호출)
    pub api_response_time: f64,
    /// 최근 API 호출 기준 캐시 적중률 (%)
    pub cache_hit_rate: f64,
    /// 최근 API 호출 기준 에러율 (%)
    pub error_rate: f64,
    pub user_agent: String,
    pub viewport: Viewport,
    pub connection_type: String,
    /// 스냅샷 시작 시각
    pub timestamp: i64,
    pub session_id: String,
    pub url: String,
}

impl MetricsSnapshot {
    /// 호스트 컨텍스트로 빈 스냅샷 생성 (모든 지표 0)
    pub fn open(context: &HostContext, session_id: &str, timestamp: i64) -> Self {
        Self {
            user_agent: context.user_agent.clone(),
            viewport: context.viewport,
            connection_type: context.connection_type.clone(),
            timestamp,
            session_id: session_id.to_string(),
            url: context.url.clone(),
            ..Default::default()
        }
    }
}

/// API 호출 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCallRecord {
    pub endpoint: String,
    pub method: String,
    pub response_time: f64,
    pub status_code: u16,
    /// 2xx 응답 여부
    pub success: bool,
    pub cached: bool,
    pub timestamp: i64,
    pub session_id: String,
}

impl ApiCallRecord {
    /// 상태 코드가 2xx인지 판별
    pub fn is_success_status(status_code: u16) -> bool {
        (200..300).contains(&status_code)
    }
}

/// 에러 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// 스크립트 예외 (처리되지 않은 예외, 거부된 Promise 포함)
    Javascript,
    Network,
    Render,
    Api,
}

/// 에러 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// 에러가 발생한 소스 URL
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub timestamp: i64,
    pub session_id: String,
    pub user_agent: String,
}

/// 호출자가 보고하는 에러 (수집기가 시각/세션/UA를 채운다)
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    pub stack: Option<String>,
    /// 소스 URL (None이면 현재 페이지 URL)
    pub source_url: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl ErrorReport {
    /// 메시지만 있는 에러 보고 생성
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stack: None,
            source_url: None,
            line: None,
            column: None,
        }
    }

    /// 스택 트레이스 지정
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// 소스 위치 지정
    pub fn with_location(mut self, source_url: impl Into<String>, line: u32, column: u32) -> Self {
        self.source_url = Some(source_url.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

/// 사용자 여정 이벤트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyEvent {
    pub event: String,
    /// 이벤트 발생 시점의 페이지 경로
    pub page: String,
    pub timestamp: i64,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// 수집 엔드포인트 전송 페이로드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPayload {
    pub performance: Vec<MetricsSnapshot>,
    pub api: Vec<ApiCallRecord>,
    pub errors: Vec<ErrorRecord>,
    pub journey: Vec<JourneyEvent>,
}

impl TelemetryPayload {
    /// 전체 레코드 수
    pub fn record_count(&self) -> usize {
        self.performance.len() + self.api.len() + self.errors.len() + self.journey.len()
    }
}

/// 성능 요약 (읽기 전용 조회 결과)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    /// 현재(가장 최근) 스냅샷
    pub current: Option<MetricsSnapshot>,
    pub average_response_time: f64,
    pub cache_hit_rate: f64,
    pub error_rate: f64,
    /// 보관 중인 전체 에러 수
    pub total_errors: usize,
    /// 첫 여정 이벤트 이후 경과 시간 (밀리초)
    pub session_duration: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_status_range() {
        assert!(ApiCallRecord::is_success_status(200));
        assert!(ApiCallRecord::is_success_status(299));
        assert!(!ApiCallRecord::is_success_status(199));
        assert!(!ApiCallRecord::is_success_status(300));
        assert!(!ApiCallRecord::is_success_status(500));
    }

    #[test]
    fn error_record_wire_shape() {
        let record = ErrorRecord {
            kind: ErrorKind::Javascript,
            message: "boom".to_string(),
            stack: None,
            url: "https://app.example/dashboard".to_string(),
            line: Some(12),
            column: None,
            timestamp: 1_700_000_000_000,
            session_id: "session_1".to_string(),
            user_agent: "test-agent".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "javascript");
        assert_eq!(json["sessionId"], "session_1");
        assert_eq!(json["userAgent"], "test-agent");
        assert_eq!(json["line"], 12);
        assert!(json.get("stack").is_none());
        assert!(json.get("column").is_none());
    }

    #[test]
    fn snapshot_open_copies_context() {
        let ctx = HostContext {
            user_agent: "ua".to_string(),
            viewport: Viewport {
                width: 1280,
                height: 720,
            },
            connection_type: "4g".to_string(),
            url: "https://app.example/".to_string(),
        };
        let snap = MetricsSnapshot::open(&ctx, "session_x", 42);

        assert_eq!(snap.timestamp, 42);
        assert_eq!(snap.session_id, "session_x");
        assert_eq!(snap.viewport.width, 1280);
        assert_eq!(snap.connection_type, "4g");
        assert_eq!(snap.fcp, 0.0);
        assert_eq!(snap.error_rate, 0.0);

        let json = serde_json::to_value(&snap).unwrap();
        assert!(json.get("pageLoadTime").is_some());
        assert!(json.get("domContentLoaded").is_some());
    }

    #[test]
    fn payload_record_count() {
        let payload = TelemetryPayload::default();
        assert_eq!(payload.record_count(), 0);

        let json = serde_json::to_value(&payload).unwrap();
        for key in ["performance", "api", "errors", "journey"] {
            assert!(json[key].is_array(), "{key} 누락");
        }
    }
}
