//! API 호출 윈도우 통계.

use fieldpulse_core::models::telemetry::ApiCallRecord;

/// API 호출 윈도우 통계 (비율은 0~100 %)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowRates {
    pub average_response_time: f64,
    pub cache_hit_rate: f64,
    pub error_rate: f64,
}

impl WindowRates {
    /// 윈도우 내 레코드로 통계 계산, 빈 윈도우는 모두 0
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ApiCallRecord>,
    {
        let mut total = 0usize;
        let mut cached = 0usize;
        let mut failed = 0usize;
        let mut response_time_sum = 0.0;

        for record in records {
            total += 1;
            response_time_sum += record.response_time;
            if record.cached {
                cached += 1;
            }
            if !record.success {
                failed += 1;
            }
        }

        if total == 0 {
            return Self::default();
        }

        let total_f = total as f64;
        Self {
            average_response_time: response_time_sum / total_f,
            cache_hit_rate: cached as f64 / total_f * 100.0,
            error_rate: failed as f64 / total_f * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(response_time: f64, status_code: u16, cached: bool) -> ApiCallRecord {
        ApiCallRecord {
            endpoint: "/api/greenhouse/analysis".to_string(),
            method: "GET".to_string(),
            response_time,
            status_code,
            success: ApiCallRecord::is_success_status(status_code),
            cached,
            timestamp: 0,
            session_id: "s".to_string(),
        }
    }

    #[test]
    fn empty_window_is_zero() {
        let rates = WindowRates::from_records(std::iter::empty());
        assert_eq!(rates, WindowRates::default());
    }

    #[test]
    fn mixed_window() {
        let records = [
            call(120.0, 200, false),
            call(80.0, 500, false),
            call(40.0, 200, true),
        ];
        let rates = WindowRates::from_records(&records);

        assert_eq!(rates.average_response_time, 80.0);
        assert!((rates.cache_hit_rate - 100.0 / 3.0).abs() < 1e-9);
        assert!((rates.error_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn rates_stay_in_percent_range() {
        let all_bad: Vec<_> = (0..7).map(|_| call(10.0, 404, true)).collect();
        let rates = WindowRates::from_records(&all_bad);
        assert_eq!(rates.cache_hit_rate, 100.0);
        assert_eq!(rates.error_rate, 100.0);

        let all_good: Vec<_> = (0..7).map(|_| call(10.0, 204, false)).collect();
        let rates = WindowRates::from_records(&all_good);
        assert_eq!(rates.cache_hit_rate, 0.0);
        assert_eq!(rates.error_rate, 0.0);
    }
}
