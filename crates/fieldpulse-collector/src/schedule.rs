//! 수집기 백그라운드 태스크.
//!
//! - 관측 채널 펌프: 소스에서 온 엔트리를 순서대로 수집기에 반영
//! - 라이프사이클: 로드 완료 1초 후 플러시, 언로드 시 플러시
//! - 주기 플러시: 30초마다
//!
//! 모든 태스크는 `Weak` 참조만 들고 있어 수집기 수명을 늘리지 않는다.

use std::sync::Weak;

use fieldpulse_core::models::context::PageLifecycle;
use fieldpulse_core::models::observation::Observation;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant};
use tracing::debug;

use crate::collector::TelemetryCollector;
use crate::limits::{FLUSH_INTERVAL, POST_LOAD_DELAY};

/// 초기화 시 생성되는 태스크 묶음
pub(crate) struct ScheduledTasks {
    /// 관측 채널 펌프 (정리 시 남은 엔트리를 드레인)
    pub observer: JoinHandle<()>,
    /// 타이머/라이프사이클 태스크 (정리 시 중단)
    pub timers: Vec<JoinHandle<()>>,
}

pub(crate) fn spawn(
    runtime: &Handle,
    collector: Weak<TelemetryCollector>,
    observations: mpsc::UnboundedReceiver<Observation>,
    lifecycle: watch::Receiver<PageLifecycle>,
) -> ScheduledTasks {
    let observer = runtime.spawn(pump_observations(collector.clone(), observations));
    let timers = vec![
        runtime.spawn(follow_lifecycle(collector.clone(), lifecycle)),
        runtime.spawn(periodic_flush(collector)),
    ];
    ScheduledTasks { observer, timers }
}

async fn pump_observations(
    collector: Weak<TelemetryCollector>,
    mut observations: mpsc::UnboundedReceiver<Observation>,
) {
    while let Some(observation) = observations.recv().await {
        let Some(collector) = collector.upgrade() else {
            break;
        };
        collector.handle_observation(observation);
    }
    debug!("관측 채널 종료");
}

async fn follow_lifecycle(
    collector: Weak<TelemetryCollector>,
    mut lifecycle: watch::Receiver<PageLifecycle>,
) {
    // 로드 후 플러시 시각. 이 태스크 안에서만 대기하므로 태스크 중단 시 함께 취소된다
    let mut load_flush_at: Option<Instant> = None;
    let mut load_flush_scheduled = false;
    let mut stage = Some(*lifecycle.borrow_and_update());

    loop {
        match stage.take() {
            Some(PageLifecycle::Loaded) if !load_flush_scheduled => {
                load_flush_scheduled = true;
                load_flush_at = Some(Instant::now() + POST_LOAD_DELAY);
            }
            Some(PageLifecycle::Unloading) => {
                let Some(collector) = collector.upgrade() else {
                    break;
                };
                debug!("언로드 플러시");
                collector.collect_and_send().await;
            }
            _ => {}
        }

        let deadline = load_flush_at.unwrap_or_else(Instant::now);
        tokio::select! {
            _ = sleep_until(deadline), if load_flush_at.is_some() => {
                load_flush_at = None;
                let Some(collector) = collector.upgrade() else {
                    break;
                };
                debug!("로드 완료 후 플러시");
                collector.collect_and_send().await;
            }
            changed = lifecycle.changed() => {
                if changed.is_err() {
                    break;
                }
                stage = Some(*lifecycle.borrow_and_update());
            }
        }
    }
}

async fn periodic_flush(collector: Weak<TelemetryCollector>) {
    let mut ticker = interval_at(Instant::now() + FLUSH_INTERVAL, FLUSH_INTERVAL);
    loop {
        ticker.tick().await;
        let Some(collector) = collector.upgrade() else {
            break;
        };
        collector.collect_and_send().await;
    }
}
