//! 호스트 컨텍스트 모델.
//!
//! 스냅샷에 붙는 정적 컨텍스트, 페이지 라이프사이클, 내비게이션 타이밍.

use serde::{Deserialize, Serialize};

/// 뷰포트 크기
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// 호스트 컨텍스트 (User-Agent, 뷰포트, 연결 종류, 현재 URL)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostContext {
    pub user_agent: String,
    pub viewport: Viewport,
    /// 연결 종류 (예: "4g", "wifi"), 알 수 없으면 "unknown"
    pub connection_type: String,
    pub url: String,
}

impl Default for HostContext {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            viewport: Viewport::default(),
            connection_type: "unknown".to_string(),
            url: String::new(),
        }
    }
}

/// 페이지 라이프사이클 단계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLifecycle {
    /// 로딩 중
    #[default]
    Loading,
    /// 로드 완료
    Loaded,
    /// 언로드/종료 중
    Unloading,
}

/// 내비게이션 타이밍 (밀리초, 내비게이션 시작 기준)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTiming {
    pub fetch_start: f64,
    pub request_start: f64,
    pub response_start: f64,
    pub dom_content_loaded_event_end: f64,
    pub load_event_end: f64,
}

impl NavigationTiming {
    /// Time To First Byte
    pub fn time_to_first_byte(&self) -> f64 {
        self.response_start - self.request_start
    }

    /// 페이지 로드 전체 시간
    pub fn page_load_time(&self) -> f64 {
        self.load_event_end - self.fetch_start
    }

    /// DOMContentLoaded 시간
    pub fn dom_content_loaded(&self) -> f64 {
        self.dom_content_loaded_event_end - self.fetch_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_derivations() {
        let timing = NavigationTiming {
            fetch_start: 10.0,
            request_start: 30.0,
            response_start: 110.0,
            dom_content_loaded_event_end: 610.0,
            load_event_end: 1_010.0,
        };
        assert_eq!(timing.time_to_first_byte(), 80.0);
        assert_eq!(timing.page_load_time(), 1_000.0);
        assert_eq!(timing.dom_content_loaded(), 600.0);
    }

    #[test]
    fn default_connection_is_unknown() {
        assert_eq!(HostContext::default().connection_type, "unknown");
        assert_eq!(PageLifecycle::default(), PageLifecycle::Loading);
    }
}
