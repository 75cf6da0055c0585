//! 텔레메트리 수집기.
//!
//! 관측 소스를 구독해 성능 지표 스냅샷을 갱신하고, API 호출/에러/사용자 여정을
//! 제한 롤링 로그에 보관하며, 주기적으로 배치를 수집 엔드포인트로 전송한다.
//!
//! 공개 메서드는 어떤 상황에서도 패닉하거나 에러를 올리지 않는다.
//! 호출자는 방어 코드 없이 어디서든 호출할 수 있다.

use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fieldpulse_core::models::observation::Observation;
use fieldpulse_core::models::telemetry::{
    ApiCallRecord, ErrorKind, ErrorRecord, ErrorReport, JourneyEvent, PerformanceSummary,
    TelemetryPayload,
};
use fieldpulse_core::ports::clock::Clock;
use fieldpulse_core::ports::host::HostEnvironment;
use fieldpulse_core::ports::observer::ObservationSource;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bounded_log::BoundedLog;
use crate::delivery::{DeliveryChain, DeliveryOutcome};
use crate::limits::{
    API_LOG_CAP, API_LOG_TRIM, ERROR_LOG_CAP, ERROR_LOG_TRIM, JOURNEY_LOG_CAP, JOURNEY_LOG_TRIM,
    PAYLOAD_API_CALLS, PAYLOAD_ERRORS, PAYLOAD_JOURNEY, PAYLOAD_SNAPSHOTS, RECORD_RATE_WINDOW,
    SUMMARY_WINDOW,
};
use crate::schedule;
use crate::session::generate_session_id;
use crate::snapshot::SnapshotLog;
use crate::summary::WindowRates;
use crate::vitals::{navigation_updates, MetricUpdate, VitalsTracker};

/// 정리 시 관측 채널에 남은 엔트리를 반영하기 위해 기다리는 최대 시간
const OBSERVER_DRAIN_TIMEOUT: Duration = Duration::from_millis(250);

/// 초기화 시 기록하는 여정 이벤트
const PAGE_LOAD_EVENT: &str = "page_load";

/// 수집기가 독점하는 롤링 로그
struct CollectorState {
    snapshots: SnapshotLog,
    api_calls: BoundedLog<ApiCallRecord>,
    errors: BoundedLog<ErrorRecord>,
    journey: BoundedLog<JourneyEvent>,
    vitals: VitalsTracker,
}

impl CollectorState {
    fn new() -> Self {
        Self {
            snapshots: SnapshotLog::new(),
            api_calls: BoundedLog::new(API_LOG_CAP, API_LOG_TRIM),
            errors: BoundedLog::new(ERROR_LOG_CAP, ERROR_LOG_TRIM),
            journey: BoundedLog::new(JOURNEY_LOG_CAP, JOURNEY_LOG_TRIM),
            vitals: VitalsTracker::new(),
        }
    }
}

/// 초기화 이후 살아있는 구독/태스크
#[derive(Default)]
struct Wiring {
    active_sources: Vec<Arc<dyn ObservationSource>>,
    observer_task: Option<JoinHandle<()>>,
    timer_tasks: Vec<JoinHandle<()>>,
}

/// 텔레메트리 수집기
///
/// 프로세스당 하나를 만들어 `Arc`로 공유한다.
pub struct TelemetryCollector {
    session_id: String,
    clock: Arc<dyn Clock>,
    host: Arc<dyn HostEnvironment>,
    sources: Vec<Arc<dyn ObservationSource>>,
    delivery: DeliveryChain,
    state: Mutex<CollectorState>,
    initialized: AtomicBool,
    wiring: Mutex<Wiring>,
}

impl TelemetryCollector {
    /// 새 수집기 생성 (세션 ID는 여기서 한 번 생성)
    pub fn new(
        host: Arc<dyn HostEnvironment>,
        delivery: DeliveryChain,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let session_id = generate_session_id(clock.now_ms());
        Self {
            session_id,
            clock,
            host,
            sources: Vec::new(),
            delivery,
            state: Mutex::new(CollectorState::new()),
            initialized: AtomicBool::new(false),
            wiring: Mutex::new(Wiring::default()),
        }
    }

    /// 관측 소스 추가 (초기화 전에만 의미 있음)
    pub fn with_source(mut self, source: Arc<dyn ObservationSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// 관측 소스 여러 개 추가
    pub fn with_sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ObservationSource>>,
    {
        self.sources.extend(sources);
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// 초기화 여부
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// 관측 소스 구독 + 플러시 스케줄 시작
    ///
    /// 두 번째 호출부터는 no-op. 호스트가 없거나 tokio 런타임 밖이면 아무것도 하지 않는다.
    pub fn initialize(self: &Arc<Self>) {
        if !self.host.is_available() {
            debug!("호스트 없음, 수집기 초기화 건너뜀");
            return;
        }

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("tokio 런타임 없음, 수집기 초기화 실패: {e}");
                return;
            }
        };

        if self
            .initialized
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("수집기 이미 초기화됨");
            return;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let mut active_sources = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match source.observe(tx.clone()) {
                Ok(()) => {
                    debug!("관측 소스 구독: {}", source.name());
                    active_sources.push(Arc::clone(source));
                }
                Err(e) => warn!("관측 소스 '{}' 건너뜀: {e}", source.name()),
            }
        }
        drop(tx);

        if let Some(timing) = self.host.navigation_timing() {
            self.apply_updates(navigation_updates(&timing));
        }

        self.record_journey(PAGE_LOAD_EVENT, None);

        let tasks = schedule::spawn(&runtime, Arc::downgrade(self), rx, self.host.lifecycle());
        {
            let mut wiring = self.wiring.lock();
            wiring.active_sources = active_sources;
            wiring.observer_task = Some(tasks.observer);
            wiring.timer_tasks = tasks.timers;
        }

        info!(
            "텔레메트리 수집기 초기화: session={}, 관측 소스 {}/{}개",
            self.session_id,
            self.wiring.lock().active_sources.len(),
            self.sources.len()
        );
    }

    /// 관측 엔트리 반영
    pub(crate) fn handle_observation(&self, observation: Observation) {
        match observation {
            Observation::UncaughtError(fault) => {
                let source_url = (!fault.filename.is_empty()).then_some(fault.filename);
                self.record_error(ErrorReport {
                    kind: ErrorKind::Javascript,
                    message: fault.message,
                    stack: fault.stack,
                    source_url,
                    line: fault.lineno,
                    column: fault.colno,
                });
            }
            Observation::UnhandledRejection(fault) => {
                let mut report = ErrorReport::new(
                    ErrorKind::Javascript,
                    format!("Unhandled Promise Rejection: {}", fault.reason),
                );
                report.stack = fault.stack;
                self.record_error(report);
            }
            other => {
                let updates = self.state.lock().vitals.reduce(&other);
                if !updates.is_empty() {
                    self.apply_updates(updates);
                }
            }
        }
    }

    /// 최신 스냅샷에 지표 갱신 반영
    fn apply_updates<I>(&self, updates: I)
    where
        I: IntoIterator<Item = MetricUpdate>,
    {
        let now = self.clock.now_ms();
        let mut state = self.state.lock();
        state
            .snapshots
            .apply(now, &self.session_id, || self.host.context(), updates);
    }

    /// API 호출 기록
    ///
    /// 최신 스냅샷의 API 응답 시간을 덮어쓰고, 최근 10건 기준
    /// 캐시 적중률/에러율을 다시 계산한다.
    pub fn record_api_call(
        &self,
        endpoint: &str,
        method: &str,
        response_time_ms: f64,
        status_code: u16,
        cached: bool,
    ) {
        let now = self.clock.now_ms();
        let record = ApiCallRecord {
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            response_time: response_time_ms,
            status_code,
            success: ApiCallRecord::is_success_status(status_code),
            cached,
            timestamp: now,
            session_id: self.session_id.clone(),
        };

        let mut state = self.state.lock();
        state.api_calls.push(record);
        let rates = WindowRates::from_records(state.api_calls.recent(RECORD_RATE_WINDOW));
        state.snapshots.apply(
            now,
            &self.session_id,
            || self.host.context(),
            [
                MetricUpdate::ApiResponseTime(response_time_ms),
                MetricUpdate::CacheHitRate(rates.cache_hit_rate),
                MetricUpdate::ErrorRate(rates.error_rate),
            ],
        );
        debug!("API 호출 기록: {method} {endpoint} {status_code} ({response_time_ms}ms)");
    }

    /// API 호출 타이머 시작: `finish`에서 경과 시간으로 기록
    pub fn start_api_call(&self, endpoint: &str, method: &str) -> ApiCallTimer<'_> {
        ApiCallTimer {
            collector: self,
            endpoint: endpoint.to_string(),
            method: method.to_string(),
            started_ms: self.clock.now_ms(),
        }
    }

    /// 에러 기록 (시각/세션/User-Agent는 수집기가 채운다)
    pub fn record_error(&self, report: ErrorReport) {
        let context = self.host.context();
        let record = ErrorRecord {
            kind: report.kind,
            message: report.message,
            stack: report.stack,
            url: report.source_url.unwrap_or(context.url),
            line: report.line,
            column: report.column,
            timestamp: self.clock.now_ms(),
            session_id: self.session_id.clone(),
            user_agent: context.user_agent,
        };
        debug!("에러 기록: {:?} {}", record.kind, record.message);
        self.state.lock().errors.push(record);
    }

    /// 사용자 여정 이벤트 기록
    pub fn record_journey(&self, event: &str, metadata: Option<Map<String, Value>>) {
        let record = JourneyEvent {
            event: event.to_string(),
            page: self.host.current_path(),
            timestamp: self.clock.now_ms(),
            session_id: self.session_id.clone(),
            metadata,
        };
        debug!("여정 기록: {} @ {}", record.event, record.page);
        self.state.lock().journey.push(record);
    }

    /// 최근 데이터로 배치를 만들어 전송
    ///
    /// 스냅샷이 하나도 없으면 아무것도 보내지 않고 `None`.
    pub async fn collect_and_send(&self) -> Option<DeliveryOutcome> {
        let payload = {
            let state = self.state.lock();
            if state.snapshots.is_empty() {
                return None;
            }
            TelemetryPayload {
                performance: state.snapshots.recent_cloned(PAYLOAD_SNAPSHOTS),
                api: state.api_calls.recent_cloned(PAYLOAD_API_CALLS),
                errors: state.errors.recent_cloned(PAYLOAD_ERRORS),
                journey: state.journey.recent_cloned(PAYLOAD_JOURNEY),
            }
        };
        Some(self.delivery.deliver(&payload).await)
    }

    /// 페이로드 전송 (없으면 보관 중인 전체 로그)
    pub async fn send_metrics(&self, payload: Option<TelemetryPayload>) -> DeliveryOutcome {
        let payload = payload.unwrap_or_else(|| self.full_payload());
        self.delivery.deliver(&payload).await
    }

    fn full_payload(&self) -> TelemetryPayload {
        let state = self.state.lock();
        TelemetryPayload {
            performance: state.snapshots.to_vec(),
            api: state.api_calls.to_vec(),
            errors: state.errors.to_vec(),
            journey: state.journey.to_vec(),
        }
    }

    /// 성능 요약 (읽기 전용)
    pub fn performance_summary(&self) -> PerformanceSummary {
        let now = self.clock.now_ms();
        let state = self.state.lock();
        let rates = WindowRates::from_records(state.api_calls.recent(SUMMARY_WINDOW));
        let session_start = state.journey.first().map_or(now, |event| event.timestamp);

        PerformanceSummary {
            current: state.snapshots.current().cloned(),
            average_response_time: rates.average_response_time,
            cache_hit_rate: rates.cache_hit_rate,
            error_rate: rates.error_rate,
            total_errors: state.errors.len(),
            session_duration: now - session_start,
        }
    }

    /// 관측 소스 구독 해제, 스케줄 중단, 마지막 전체 플러시
    pub async fn cleanup(&self) -> DeliveryOutcome {
        let wiring = mem::take(&mut *self.wiring.lock());

        for source in &wiring.active_sources {
            source.disconnect();
        }
        for task in &wiring.timer_tasks {
            task.abort();
        }
        if let Some(mut observer) = wiring.observer_task {
            if tokio::time::timeout(OBSERVER_DRAIN_TIMEOUT, &mut observer)
                .await
                .is_err()
            {
                debug!("관측 채널 드레인 시간 초과");
                observer.abort();
            }
        }

        info!(
            "텔레메트리 수집기 정리: 관측 소스 {}개 해제",
            wiring.active_sources.len()
        );
        self.send_metrics(None).await
    }
}

/// 진행 중인 API 호출 타이머
#[must_use = "finish()를 호출해야 기록된다"]
pub struct ApiCallTimer<'a> {
    collector: &'a TelemetryCollector,
    endpoint: String,
    method: String,
    started_ms: i64,
}

impl ApiCallTimer<'_> {
    /// 호출 종료: 경과 시간과 함께 기록
    pub fn finish(self, status_code: u16, cached: bool) {
        let elapsed = (self.collector.clock.now_ms() - self.started_ms).max(0) as f64;
        self.collector
            .record_api_call(&self.endpoint, &self.method, elapsed, status_code, cached);
    }
}
