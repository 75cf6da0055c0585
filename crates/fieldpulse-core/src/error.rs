//! FieldPulse 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 라이브러리 에러를 `CoreError`로 매핑한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 전송, 저장소 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 네트워크 에러 (연결 실패, 타임아웃, 전송 거부)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 로컬 저장소 에러 (쓰기 실패, 용량 초과)
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 호스트가 해당 기능을 제공하지 않음
    #[error("미지원 기능: {0}")]
    Unsupported(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
