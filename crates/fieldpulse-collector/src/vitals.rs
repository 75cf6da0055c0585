//! 관측 엔트리 → 지표 갱신 변환.
//!
//! "FCP 샘플을 받으면 무엇을 하는가"를 "FCP 샘플을 어떻게 얻는가"와 분리한다.
//! `VitalsTracker::reduce`는 엔트리 하나를 지표 갱신 목록으로 바꾸고,
//! `MetricUpdate::apply`가 그 갱신을 스냅샷에 반영한다.

use fieldpulse_core::models::context::NavigationTiming;
use fieldpulse_core::models::observation::{InitiatorType, Observation, FIRST_CONTENTFUL_PAINT};
use fieldpulse_core::models::telemetry::MetricsSnapshot;

/// 스냅샷 지표 하나에 대한 갱신 (항상 덮어쓰기)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricUpdate {
    FirstContentfulPaint(f64),
    LargestContentfulPaint(f64),
    FirstInputDelay(f64),
    CumulativeLayoutShift(f64),
    TimeToFirstByte(f64),
    PageLoadTime(f64),
    DomContentLoaded(f64),
    ResourceLoadTime(f64),
    ImageLoadTime(f64),
    ScriptLoadTime(f64),
    ApiResponseTime(f64),
    CacheHitRate(f64),
    ErrorRate(f64),
}

impl MetricUpdate {
    /// 스냅샷에 갱신 반영
    pub fn apply(self, snapshot: &mut MetricsSnapshot) {
        match self {
            Self::FirstContentfulPaint(v) => snapshot.fcp = v,
            Self::LargestContentfulPaint(v) => snapshot.lcp = v,
            Self::FirstInputDelay(v) => snapshot.fid = v,
            Self::CumulativeLayoutShift(v) => snapshot.cls = v,
            Self::TimeToFirstByte(v) => snapshot.ttfb = v,
            Self::PageLoadTime(v) => snapshot.page_load_time = v,
            Self::DomContentLoaded(v) => snapshot.dom_content_loaded = v,
            Self::ResourceLoadTime(v) => snapshot.resource_load_time = v,
            Self::ImageLoadTime(v) => snapshot.image_load_time = v,
            Self::ScriptLoadTime(v) => snapshot.script_load_time = v,
            Self::ApiResponseTime(v) => snapshot.api_response_time = v,
            Self::CacheHitRate(v) => snapshot.cache_hit_rate = v,
            Self::ErrorRate(v) => snapshot.error_rate = v,
        }
    }
}

/// 내비게이션 타이밍에서 파생되는 지표 (초기화 시 1회)
pub fn navigation_updates(timing: &NavigationTiming) -> [MetricUpdate; 3] {
    [
        MetricUpdate::TimeToFirstByte(timing.time_to_first_byte()),
        MetricUpdate::PageLoadTime(timing.page_load_time()),
        MetricUpdate::DomContentLoaded(timing.dom_content_loaded()),
    ]
}

/// 스냅샷 회전과 무관하게 유지되는 관측 상태
///
/// - CLS 누적값은 수집기 수명 동안 계속 쌓인다.
/// - FID는 첫 입력만 보고한다.
#[derive(Debug, Default)]
pub struct VitalsTracker {
    cumulative_layout_shift: f64,
    first_input_reported: bool,
}

impl VitalsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 CLS 누적값
    pub fn cumulative_layout_shift(&self) -> f64 {
        self.cumulative_layout_shift
    }

    /// 관측 엔트리를 지표 갱신으로 변환
    ///
    /// 에러 엔트리는 지표가 아니므로 빈 목록을 반환한다.
    pub fn reduce(&mut self, observation: &Observation) -> Vec<MetricUpdate> {
        match observation {
            Observation::Paint(entry) if entry.name == FIRST_CONTENTFUL_PAINT => {
                vec![MetricUpdate::FirstContentfulPaint(entry.start_time)]
            }
            Observation::Paint(_) => Vec::new(),
            Observation::LargestContentfulPaint(entry) => {
                vec![MetricUpdate::LargestContentfulPaint(entry.start_time)]
            }
            Observation::FirstInput(entry) => {
                if self.first_input_reported {
                    return Vec::new();
                }
                self.first_input_reported = true;
                vec![MetricUpdate::FirstInputDelay(entry.delay())]
            }
            Observation::LayoutShift(entry) => {
                if entry.had_recent_input {
                    return Vec::new();
                }
                self.cumulative_layout_shift += entry.value;
                vec![MetricUpdate::CumulativeLayoutShift(
                    self.cumulative_layout_shift,
                )]
            }
            Observation::Resource(entry) => {
                let load_time = entry.load_time();
                let mut updates = vec![MetricUpdate::ResourceLoadTime(load_time)];
                match entry.initiator_type {
                    InitiatorType::Img => updates.push(MetricUpdate::ImageLoadTime(load_time)),
                    InitiatorType::Script => updates.push(MetricUpdate::ScriptLoadTime(load_time)),
                    _ => {}
                }
                updates
            }
            Observation::UncaughtError(_) | Observation::UnhandledRejection(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldpulse_core::models::observation::{
        InputEntry, LargestPaintEntry, LayoutShiftEntry, PaintEntry, RejectionFault, ResourceEntry,
    };

    fn resource(initiator_type: InitiatorType) -> Observation {
        Observation::Resource(ResourceEntry {
            name: "/static/app.js".to_string(),
            initiator_type,
            request_start: 100.0,
            response_end: 340.0,
        })
    }

    #[test]
    fn fcp_only_for_named_paint() {
        let mut tracker = VitalsTracker::new();
        let fp = Observation::Paint(PaintEntry {
            name: "first-paint".to_string(),
            start_time: 300.0,
        });
        assert!(tracker.reduce(&fp).is_empty());

        let fcp = Observation::Paint(PaintEntry {
            name: FIRST_CONTENTFUL_PAINT.to_string(),
            start_time: 420.0,
        });
        assert_eq!(
            tracker.reduce(&fcp),
            vec![MetricUpdate::FirstContentfulPaint(420.0)]
        );
    }

    #[test]
    fn lcp_last_wins() {
        let mut tracker = VitalsTracker::new();
        let mut snapshot = MetricsSnapshot::default();
        for start_time in [900.0, 1_500.0, 1_200.0] {
            let obs = Observation::LargestContentfulPaint(LargestPaintEntry { start_time });
            for update in tracker.reduce(&obs) {
                update.apply(&mut snapshot);
            }
        }
        assert_eq!(snapshot.lcp, 1_200.0);
    }

    #[test]
    fn fid_reports_first_input_only() {
        let mut tracker = VitalsTracker::new();
        let first = Observation::FirstInput(InputEntry {
            start_time: 2_000.0,
            processing_start: 2_012.0,
        });
        let second = Observation::FirstInput(InputEntry {
            start_time: 5_000.0,
            processing_start: 5_300.0,
        });

        assert_eq!(
            tracker.reduce(&first),
            vec![MetricUpdate::FirstInputDelay(12.0)]
        );
        assert!(tracker.reduce(&second).is_empty());
    }

    #[test]
    fn cls_accumulates_and_skips_recent_input() {
        let mut tracker = VitalsTracker::new();
        let shift = |value, had_recent_input| {
            Observation::LayoutShift(LayoutShiftEntry {
                value,
                had_recent_input,
            })
        };

        assert_eq!(
            tracker.reduce(&shift(0.1, false)),
            vec![MetricUpdate::CumulativeLayoutShift(0.1)]
        );
        assert!(tracker.reduce(&shift(0.5, true)).is_empty());
        let updates = tracker.reduce(&shift(0.25, false));
        assert_eq!(updates.len(), 1);
        assert!((tracker.cumulative_layout_shift() - 0.35).abs() < 1e-9);
    }

    #[test]
    fn resource_updates_by_initiator() {
        let mut tracker = VitalsTracker::new();

        assert_eq!(
            tracker.reduce(&resource(InitiatorType::Img)),
            vec![
                MetricUpdate::ResourceLoadTime(240.0),
                MetricUpdate::ImageLoadTime(240.0)
            ]
        );
        assert_eq!(
            tracker.reduce(&resource(InitiatorType::Script)),
            vec![
                MetricUpdate::ResourceLoadTime(240.0),
                MetricUpdate::ScriptLoadTime(240.0)
            ]
        );
        assert_eq!(
            tracker.reduce(&resource(InitiatorType::Fetch)),
            vec![MetricUpdate::ResourceLoadTime(240.0)]
        );
    }

    #[test]
    fn faults_are_not_metrics() {
        let mut tracker = VitalsTracker::new();
        let obs = Observation::UnhandledRejection(RejectionFault {
            reason: "timeout".to_string(),
            stack: None,
        });
        assert!(tracker.reduce(&obs).is_empty());
    }

    #[test]
    fn navigation_timing_derivations() {
        let timing = NavigationTiming {
            fetch_start: 0.0,
            request_start: 20.0,
            response_start: 95.0,
            dom_content_loaded_event_end: 800.0,
            load_event_end: 1_450.0,
        };
        let mut snapshot = MetricsSnapshot::default();
        for update in navigation_updates(&timing) {
            update.apply(&mut snapshot);
        }
        assert_eq!(snapshot.ttfb, 75.0);
        assert_eq!(snapshot.page_load_time, 1_450.0);
        assert_eq!(snapshot.dom_content_loaded, 800.0);
    }
}
