//! 호스트 환경 포트.
//!
//! 수집기가 실행되는 환경(브라우저 창, 프로세스 호스트 등)이 제공하는
//! 정적 컨텍스트, 내비게이션 타이밍, 라이프사이클 신호.

use tokio::sync::watch;

use crate::models::context::{HostContext, NavigationTiming, PageLifecycle};

/// 호스트 환경
pub trait HostEnvironment: Send + Sync {
    /// 호스트 사용 가능 여부 (false면 수집기 초기화가 no-op)
    fn is_available(&self) -> bool;

    /// 스냅샷/에러에 붙는 정적 컨텍스트
    fn context(&self) -> HostContext;

    /// 현재 페이지 경로 (여정 이벤트용)
    fn current_path(&self) -> String;

    /// 내비게이션 타이밍 (초기화 시 1회 조회, 없으면 None)
    fn navigation_timing(&self) -> Option<NavigationTiming>;

    /// 라이프사이클 신호 수신기
    fn lifecycle(&self) -> watch::Receiver<PageLifecycle>;
}
