//! 프로세스 호스트.
//!
//! 설정 파일의 호스트 섹션으로 컨텍스트를 만들고,
//! 라이프사이클은 `LifecycleManager`의 watch 채널을 그대로 노출한다.

use fieldpulse_core::config::HostConfig;
use fieldpulse_core::models::context::{HostContext, NavigationTiming, PageLifecycle};
use fieldpulse_core::ports::host::HostEnvironment;
use tokio::sync::watch;

/// 설정 기반 호스트 환경
pub struct ProcessHost {
    config: HostConfig,
    lifecycle: watch::Receiver<PageLifecycle>,
}

impl ProcessHost {
    pub fn new(config: HostConfig, lifecycle: watch::Receiver<PageLifecycle>) -> Self {
        Self { config, lifecycle }
    }
}

impl HostEnvironment for ProcessHost {
    fn is_available(&self) -> bool {
        true
    }

    fn context(&self) -> HostContext {
        self.config.to_context()
    }

    fn current_path(&self) -> String {
        url_path(&self.config.page_url).to_string()
    }

    fn navigation_timing(&self) -> Option<NavigationTiming> {
        self.config.navigation_timing
    }

    fn lifecycle(&self) -> watch::Receiver<PageLifecycle> {
        self.lifecycle.clone()
    }
}

/// URL에서 경로 부분만 추출 (쿼리/프래그먼트 제외, 없으면 "/")
fn url_path(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };
    let path = match rest.find('/') {
        Some(idx) => &rest[idx..],
        None => return "/",
    };
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_path_extraction() {
        assert_eq!(url_path("https://greenhouse.example/dashboard"), "/dashboard");
        assert_eq!(url_path("https://greenhouse.example/crops/12?tab=soil#top"), "/crops/12");
        assert_eq!(url_path("https://greenhouse.example"), "/");
        assert_eq!(url_path("http://localhost:3000/"), "/");
    }

    #[test]
    fn context_from_config() {
        let (_tx, rx) = watch::channel(PageLifecycle::Loading);
        let host = ProcessHost::new(
            HostConfig {
                page_url: "https://greenhouse.example/analysis".to_string(),
                connection_type: "wifi".to_string(),
                ..HostConfig::default()
            },
            rx,
        );

        assert!(host.is_available());
        assert_eq!(host.current_path(), "/analysis");
        assert_eq!(host.context().connection_type, "wifi");
        assert_eq!(host.context().url, "https://greenhouse.example/analysis");
        assert!(host.navigation_timing().is_none());
    }

    #[test]
    fn lifecycle_follows_sender() {
        let (tx, rx) = watch::channel(PageLifecycle::Loading);
        let host = ProcessHost::new(HostConfig::default(), rx);

        let observed = host.lifecycle();
        tx.send_replace(PageLifecycle::Loaded);

        assert_eq!(*observed.borrow(), PageLifecycle::Loaded);
    }
}
