//! 관측 소스 포트.
//!
//! 각 소스는 하나의 관측 채널(페인트, LCP, 입력 지연, 레이아웃 시프트,
//! 리소스 타이밍, 전역 에러 핸들러)을 감싼다. 호스트가 해당 기능을
//! 제공하지 않으면 `observe`가 `CoreError::Unsupported`를 반환하고
//! 수집기는 그 소스만 건너뛴다.

use tokio::sync::mpsc;

use crate::error::CoreError;
use crate::models::observation::Observation;

/// 관측 엔트리 전달 채널
pub type ObservationSink = mpsc::UnboundedSender<Observation>;

/// 관측 소스
pub trait ObservationSource: Send + Sync {
    /// 로그용 소스 이름
    fn name(&self) -> &str;

    /// 구독 시작: 이후 엔트리를 `sink`로 전달
    fn observe(&self, sink: ObservationSink) -> Result<(), CoreError>;

    /// 구독 해제 (중복 호출 허용)
    fn disconnect(&self);
}
