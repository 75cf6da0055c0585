//! 애플리케이션 설정 구조체.
//!
//! 수집 서버 URL, 전송/저장소 옵션, 호스트 컨텍스트 등 런타임 설정을 정의한다.
//! 수집기 임계값(스냅샷 회전, 플러시 주기, 로그 용량)은 설정이 아닌 상수다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::context::{HostContext, NavigationTiming, Viewport};

/// 기본 수집 엔드포인트 경로
pub const DEFAULT_INGEST_PATH: &str = "/api/analytics/performance";

/// 기본 폴백 저장 키
pub const DEFAULT_FALLBACK_KEY: &str = "performance_metrics_fallback";

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 수집 서버 설정
    pub server: ServerConfig,
    /// 텔레메트리 설정
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// 로컬 폴백 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 호스트 컨텍스트 설정
    #[serde(default)]
    pub host: HostConfig,
}

/// 수집 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 서버 기본 URL
    pub base_url: String,
    /// 수집 엔드포인트 경로
    #[serde(default = "default_ingest_path")]
    pub ingest_path: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerConfig {
    /// 수집 엔드포인트 전체 URL
    pub fn ingest_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.ingest_path
        )
    }

    /// 요청 타임아웃
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_ingest_path() -> String {
    DEFAULT_INGEST_PATH.to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

/// 텔레메트리 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// 수집 전체 활성화 여부
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 1차 비콘 전송 사용 여부 (false면 바로 POST)
    #[serde(default = "default_true")]
    pub beacon_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            beacon_enabled: true,
        }
    }
}

/// 로컬 폴백 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 데이터 디렉토리 (None이면 플랫폼 기본 경로)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// 폴백 페이로드 저장 키
    #[serde(default = "default_fallback_key")]
    pub fallback_key: String,
    /// 저장 가능한 최대 페이로드 크기 (바이트)
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            fallback_key: default_fallback_key(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

fn default_fallback_key() -> String {
    DEFAULT_FALLBACK_KEY.to_string()
}

fn default_max_payload_bytes() -> usize {
    5 * 1024 * 1024
}

/// 호스트 컨텍스트 설정 (프로세스 호스트가 스냅샷에 붙이는 값)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
    #[serde(default = "default_connection_type")]
    pub connection_type: String,
    /// 보고 대상 페이지 URL
    #[serde(default = "default_page_url")]
    pub page_url: String,
    /// 초기화 시 보고할 내비게이션 타이밍 (없으면 보고하지 않음)
    #[serde(default)]
    pub navigation_timing: Option<NavigationTiming>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            connection_type: default_connection_type(),
            page_url: default_page_url(),
            navigation_timing: None,
        }
    }
}

impl HostConfig {
    /// 호스트 컨텍스트로 변환
    pub fn to_context(&self) -> HostContext {
        HostContext {
            user_agent: self.user_agent.clone(),
            viewport: Viewport {
                width: self.viewport_width,
                height: self.viewport_height,
            },
            connection_type: self.connection_type.clone(),
            url: self.page_url.clone(),
        }
    }
}

fn default_user_agent() -> String {
    format!("fieldpulse/{}", env!("CARGO_PKG_VERSION"))
}

fn default_viewport_width() -> u32 {
    1920
}

fn default_viewport_height() -> u32 {
    1080
}

fn default_connection_type() -> String {
    "unknown".to_string()
}

fn default_page_url() -> String {
    "http://localhost:3000/".to_string()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:3000".to_string(),
                ingest_path: default_ingest_path(),
                request_timeout_ms: default_request_timeout_ms(),
            },
            telemetry: TelemetryConfig::default(),
            storage: StorageConfig::default(),
            host: HostConfig::default(),
        }
    }
}
