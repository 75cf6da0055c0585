//! 단위 테스트용 포트 더블.

use async_trait::async_trait;
use fieldpulse_core::error::CoreError;
use fieldpulse_core::models::context::{HostContext, NavigationTiming, PageLifecycle, Viewport};
use fieldpulse_core::models::observation::Observation;
use fieldpulse_core::models::telemetry::TelemetryPayload;
use fieldpulse_core::ports::host::HostEnvironment;
use fieldpulse_core::ports::observer::{ObservationSink, ObservationSource};
use fieldpulse_core::ports::storage::FallbackStore;
use fieldpulse_core::ports::transport::{BeaconTransport, PayloadTransport};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::watch;

/// 전송 본문을 기록하는 비콘/POST 더블
#[derive(Default)]
pub struct RecordingTransport {
    pub fail: bool,
    pub bodies: Mutex<Vec<String>>,
    attempts: AtomicUsize,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<TelemetryPayload> {
        self.bodies
            .lock()
            .iter()
            .map(|b| serde_json::from_str(b).unwrap())
            .collect()
    }

    /// 성공/실패와 무관한 전송 시도 횟수
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn record(&self, body: &str) -> Result<(), CoreError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CoreError::Network("mock 전송 실패".to_string()));
        }
        self.bodies.lock().push(body.to_string());
        Ok(())
    }
}

impl BeaconTransport for RecordingTransport {
    fn send_beacon(&self, body: &str) -> Result<(), CoreError> {
        self.record(body)
    }
}

#[async_trait]
impl PayloadTransport for RecordingTransport {
    async fn post_json(&self, body: String) -> Result<(), CoreError> {
        self.record(&body)
    }
}

/// 인메모리 폴백 저장소 더블
#[derive(Default)]
pub struct MemoryStore {
    pub fail: bool,
    pub values: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl FallbackStore for MemoryStore {
    async fn put(&self, key: &str, payload: &str) -> Result<(), CoreError> {
        if self.fail {
            return Err(CoreError::Storage("용량 초과".to_string()));
        }
        self.values
            .lock()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.values.lock().get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<bool, CoreError> {
        Ok(self.values.lock().remove(key).is_some())
    }
}

/// 호스트 더블: 라이프사이클을 테스트에서 직접 전환
pub struct FakeHost {
    pub available: bool,
    pub path: String,
    pub timing: Option<NavigationTiming>,
    lifecycle: watch::Sender<PageLifecycle>,
}

impl FakeHost {
    pub fn new() -> Self {
        let (lifecycle, _) = watch::channel(PageLifecycle::Loading);
        Self {
            available: true,
            path: "/dashboard".to_string(),
            timing: None,
            lifecycle,
        }
    }

    pub fn headless() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn set_lifecycle(&self, stage: PageLifecycle) {
        self.lifecycle.send_replace(stage);
    }
}

impl HostEnvironment for FakeHost {
    fn is_available(&self) -> bool {
        self.available
    }

    fn context(&self) -> HostContext {
        HostContext {
            user_agent: "test-agent/1.0".to_string(),
            viewport: Viewport {
                width: 1440,
                height: 900,
            },
            connection_type: "4g".to_string(),
            url: format!("https://greenhouse.example{}", self.path),
        }
    }

    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn navigation_timing(&self) -> Option<NavigationTiming> {
        self.timing
    }

    fn lifecycle(&self) -> watch::Receiver<PageLifecycle> {
        self.lifecycle.subscribe()
    }
}

/// 관측 소스 더블: `emit`으로 엔트리 주입
pub struct FakeSource {
    name: String,
    supported: bool,
    pub observe_calls: AtomicUsize,
    pub disconnected: AtomicBool,
    sink: Mutex<Option<ObservationSink>>,
}

impl FakeSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            supported: true,
            observe_calls: AtomicUsize::new(0),
            disconnected: AtomicBool::new(false),
            sink: Mutex::new(None),
        }
    }

    pub fn unsupported(name: &str) -> Self {
        Self {
            supported: false,
            ..Self::new(name)
        }
    }

    /// 구독 중이면 엔트리 전달
    pub fn emit(&self, observation: Observation) -> bool {
        match self.sink.lock().as_ref() {
            Some(sink) => sink.send(observation).is_ok(),
            None => false,
        }
    }

    pub fn observe_count(&self) -> usize {
        self.observe_calls.load(Ordering::SeqCst)
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }
}

impl ObservationSource for FakeSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn observe(&self, sink: ObservationSink) -> Result<(), CoreError> {
        self.observe_calls.fetch_add(1, Ordering::SeqCst);
        if !self.supported {
            return Err(CoreError::Unsupported(self.name.clone()));
        }
        *self.sink.lock() = Some(sink);
        Ok(())
    }

    fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
        self.sink.lock().take();
    }
}
