//! 라이프사이클 관리.
//!
//! 페이지 라이프사이클 단계 브로드캐스트, 시그널 핸들링.

use fieldpulse_core::models::context::PageLifecycle;
use tokio::sync::watch;
use tracing::info;

/// 라이프사이클 관리자
pub struct LifecycleManager {
    stage_tx: watch::Sender<PageLifecycle>,
}

impl LifecycleManager {
    /// 새 라이프사이클 관리자 생성 (Loading 단계)
    pub fn new() -> Self {
        let (stage_tx, _) = watch::channel(PageLifecycle::Loading);
        Self { stage_tx }
    }

    /// 단계 수신기
    pub fn subscribe(&self) -> watch::Receiver<PageLifecycle> {
        self.stage_tx.subscribe()
    }

    pub fn stage(&self) -> PageLifecycle {
        *self.stage_tx.borrow()
    }

    /// 로드 완료 신호
    pub fn mark_loaded(&self) {
        info!("로드 완료");
        self.stage_tx.send_replace(PageLifecycle::Loaded);
    }

    /// 언로드 신호
    pub fn begin_unload(&self) {
        info!("언로드 시작");
        self.stage_tx.send_replace(PageLifecycle::Unloading);
    }

    /// OS 시그널 대기 (SIGINT, SIGTERM)
    pub async fn wait_for_signal(&self) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sigterm = signal(SignalKind::terminate())?;

            tokio::select! {
                _ = sigint.recv() => {
                    info!("SIGINT 수신");
                }
                _ = sigterm.recv() => {
                    info!("SIGTERM 수신");
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await?;
            info!("Ctrl+C 수신");
        }

        Ok(())
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}
