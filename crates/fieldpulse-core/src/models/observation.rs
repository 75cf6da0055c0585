//! 관측 엔트리 모델.
//!
//! 호스트 관측 채널(페인트, LCP, 입력, 레이아웃 시프트, 리소스, 전역 에러)에서
//! 수집기로 흘러오는 엔트리. JSON Lines 재생을 위해 `entryType` 태그로 직렬화한다.

use serde::{Deserialize, Serialize};

/// FCP 페인트 엔트리 이름
pub const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";

/// 관측 엔트리
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entryType", rename_all = "kebab-case")]
pub enum Observation {
    Paint(PaintEntry),
    LargestContentfulPaint(LargestPaintEntry),
    FirstInput(InputEntry),
    LayoutShift(LayoutShiftEntry),
    Resource(ResourceEntry),
    /// 처리되지 않은 스크립트 예외
    UncaughtError(ScriptFault),
    /// 처리되지 않은 Promise 거부
    UnhandledRejection(RejectionFault),
}

impl Observation {
    /// 로그용 엔트리 종류 이름
    pub fn entry_type(&self) -> &'static str {
        match self {
            Self::Paint(_) => "paint",
            Self::LargestContentfulPaint(_) => "largest-contentful-paint",
            Self::FirstInput(_) => "first-input",
            Self::LayoutShift(_) => "layout-shift",
            Self::Resource(_) => "resource",
            Self::UncaughtError(_) => "uncaught-error",
            Self::UnhandledRejection(_) => "unhandled-rejection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintEntry {
    pub name: String,
    pub start_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LargestPaintEntry {
    pub start_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputEntry {
    pub start_time: f64,
    pub processing_start: f64,
}

impl InputEntry {
    /// 입력 지연 (처리 시작 - 입력 시각)
    pub fn delay(&self) -> f64 {
        self.processing_start - self.start_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutShiftEntry {
    pub value: f64,
    /// 직전 사용자 입력으로 발생한 시프트 (CLS에서 제외)
    #[serde(default)]
    pub had_recent_input: bool,
}

/// 리소스 요청 주체
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitiatorType {
    Img,
    Script,
    Link,
    Css,
    Fetch,
    Xmlhttprequest,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    pub name: String,
    pub initiator_type: InitiatorType,
    pub request_start: f64,
    pub response_end: f64,
}

impl ResourceEntry {
    /// 요청 시작부터 응답 종료까지 시간
    pub fn load_time(&self) -> f64 {
        self.response_end - self.request_start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptFault {
    pub message: String,
    #[serde(default)]
    pub stack: Option<String>,
    /// 예외가 발생한 스크립트 파일
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub lineno: Option<u32>,
    #[serde(default)]
    pub colno: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionFault {
    /// 거부 사유 (문자열화)
    pub reason: String,
    #[serde(default)]
    pub stack: Option<String>,
}
