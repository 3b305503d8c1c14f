//! Detection methods run against a single resource's series
//!
//! Each method is a free function over a prepared [`ResourceSeries`] and the
//! detector sensitivity, returning raw [`Detection`]s.

use chrono::{DateTime, Datelike, Duration, Utc};

use super::scoring::normalized_score;
use super::types::{AnomalyType, DetectionMethod, Detection};
use crate::statistics::{iqr_bounds, mean, mean_and_std_dev, quartiles, z_score};
use crate::types::{Severity, TimeSeriesPoint};

/// Minimum points for the statistical method
pub const MIN_STATISTICAL_POINTS: usize = 5;
/// Minimum points for the rolling-window method
pub const MIN_TIME_SERIES_POINTS: usize = 7;
/// Minimum points before a weekly profile is estimated
pub const MIN_SEASONAL_POINTS: usize = 14;
/// Upper bound on the rolling window length
const MAX_ROLLING_WINDOW: usize = 7;
/// Age under which a resource's first point counts as new
const NEW_RESOURCE_DAYS: i64 = 3;
/// Fixed score for new-resource findings
const NEW_RESOURCE_SCORE: f64 = 0.6;

/// One resource's analyzed series, sorted by timestamp
#[derive(Debug, Clone)]
pub(crate) struct ResourceSeries<'a> {
    pub resource_id: &'a str,
    pub service_name: String,
    pub points: Vec<&'a TimeSeriesPoint>,
    /// Values used for detection (seasonally adjusted when enabled)
    pub values: Vec<f64>,
    /// Per-point seasonal factor, 1.0 when unadjusted
    pub factors: Vec<f64>,
    pub seasonally_adjusted: bool,
    /// Earliest point before the lookback window was applied
    pub first_seen: Option<&'a TimeSeriesPoint>,
}

impl<'a> ResourceSeries<'a> {
    /// Prepare a series: drop non-finite values, sort, apply the lookback window
    pub fn prepare(
        resource_id: &'a str,
        mut points: Vec<&'a TimeSeriesPoint>,
        window_days: u32,
        seasonal_adjustment: bool,
    ) -> Self {
        points.retain(|p| p.value.is_finite());
        points.sort_by_key(|p| p.timestamp);

        let first_seen = points.first().copied();
        let service_name = points
            .iter()
            .map(|p| p.service_name())
            .find(|s| s != "Unknown")
            .unwrap_or_else(crate::types::unknown);

        // A window reaching past the representable range keeps every point
        let lookback = Duration::days(i64::from(window_days));
        let cutoff = points
            .last()
            .and_then(|p| p.timestamp.checked_sub_signed(lookback));
        if let Some(cutoff) = cutoff {
            points.retain(|p| p.timestamp >= cutoff);
        }

        let raw: Vec<f64> = points.iter().map(|p| p.value).collect();
        let adjust = seasonal_adjustment && raw.len() >= MIN_SEASONAL_POINTS;
        let factors = if adjust {
            weekday_factors(&points)
        } else {
            vec![1.0; raw.len()]
        };
        let values = raw.iter().zip(&factors).map(|(v, f)| v / f).collect();

        Self {
            resource_id,
            service_name,
            points,
            values,
            factors,
            seasonally_adjusted: adjust,
            first_seen,
        }
    }

    /// Mean of the unadjusted values
    pub fn historical_average(&self) -> f64 {
        let raw: Vec<f64> = self.points.iter().map(|p| p.value).collect();
        mean(&raw)
    }

    fn deviation_type(&self, value: f64, expected: f64) -> AnomalyType {
        if self.seasonally_adjusted {
            AnomalyType::SeasonalDeviation
        } else if value > expected {
            AnomalyType::CostSpike
        } else {
            AnomalyType::CostDrop
        }
    }
}

/// Day-of-week factor per point: weekday mean over overall mean
fn weekday_factors(points: &[&TimeSeriesPoint]) -> Vec<f64> {
    let mut sums = [0.0_f64; 7];
    let mut counts = [0_usize; 7];
    for p in points {
        let day = p.timestamp.weekday().num_days_from_monday() as usize;
        sums[day] += p.value;
        counts[day] += 1;
    }

    let overall = mean(&points.iter().map(|p| p.value).collect::<Vec<_>>());
    let factor_for = |day: usize| {
        if counts[day] == 0 || overall == 0.0 {
            return 1.0;
        }
        let factor = sums[day] / counts[day] as f64 / overall;
        if factor > 0.0 && factor.is_finite() {
            factor
        } else {
            1.0
        }
    };

    points
        .iter()
        .map(|p| factor_for(p.timestamp.weekday().num_days_from_monday() as usize))
        .collect()
}

/// Spread small enough relative to the level to be treated as zero
fn is_negligible(spread: f64, level: f64) -> bool {
    spread <= 1e-9 * level.abs().max(1.0)
}

/// Z-score and IQR outliers against the whole series
pub(crate) fn detect_statistical(series: &ResourceSeries<'_>, sensitivity: f64) -> Vec<Detection> {
    let values = &series.values;
    if values.len() < MIN_STATISTICAL_POINTS {
        return Vec::new();
    }

    let (avg, std_dev) = mean_and_std_dev(values);
    let std_dev = if is_negligible(std_dev, avg) { 0.0 } else { std_dev };
    let q = quartiles(values);
    let (lower, upper) = iqr_bounds(&q, 2.0 - sensitivity * 0.5);
    let z_threshold = 2.5 - sensitivity * 1.5;

    values
        .iter()
        .enumerate()
        .filter_map(|(i, &value)| {
            let z = z_score(value, avg, std_dev);
            let outside_fences = value < lower || value > upper;
            if z.abs() <= z_threshold && !outside_fences {
                return None;
            }

            let factor = series.factors[i];
            Some(Detection {
                timestamp: series.points[i].timestamp,
                method: DetectionMethod::Statistical,
                anomaly_type: series.deviation_type(value, avg),
                expected: avg * factor,
                actual: series.points[i].value,
                magnitude: z.abs(),
                score: normalized_score(z),
                fixed_severity: None,
                seasonal_factor: factor,
                window: None,
            })
        })
        .collect()
}

/// Deviation from the trailing rolling window
pub(crate) fn detect_time_series(series: &ResourceSeries<'_>, sensitivity: f64) -> Vec<Detection> {
    let values = &series.values;
    let n = values.len();
    if n < MIN_TIME_SERIES_POINTS {
        return Vec::new();
    }

    let window = MAX_ROLLING_WINDOW.min(n / 3);
    let deviation_threshold = 2.5 - sensitivity;
    let mut detections = Vec::new();

    for i in window..n {
        let (window_mean, window_std) = mean_and_std_dev(&values[i - window..i]);
        let value = values[i];
        let deviation = if is_negligible(window_std, window_mean) {
            if is_negligible((value - window_mean).abs(), window_mean) {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            (value - window_mean).abs() / window_std
        };

        if deviation > deviation_threshold {
            let factor = series.factors[i];
            detections.push(Detection {
                timestamp: series.points[i].timestamp,
                method: DetectionMethod::TimeSeries,
                anomaly_type: series.deviation_type(value, window_mean),
                expected: window_mean * factor,
                actual: series.points[i].value,
                magnitude: deviation,
                score: normalized_score(deviation),
                fixed_severity: None,
                seasonal_factor: factor,
                window: Some(window),
            });
        }
    }

    detections
}

/// First appearance of a cost-bearing resource within the last few days
pub(crate) fn detect_new_resource(series: &ResourceSeries<'_>, now: DateTime<Utc>) -> Vec<Detection> {
    let Some(first) = series.first_seen else {
        return Vec::new();
    };

    // Only first points at or before `now`, and no older than the cutoff
    let age = now.signed_duration_since(first.timestamp);
    if first.value == 0.0 || age < Duration::zero() || age > Duration::days(NEW_RESOURCE_DAYS) {
        return Vec::new();
    }

    // Rendered from the first point itself; a short lookback window may have trimmed it
    vec![Detection {
        timestamp: first.timestamp,
        method: DetectionMethod::Pattern,
        anomaly_type: AnomalyType::NewResource,
        expected: 0.0,
        actual: first.value,
        magnitude: 0.0,
        score: NEW_RESOURCE_SCORE,
        fixed_severity: Some(Severity::Low),
        seasonal_factor: 1.0,
        window: None,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn series_points(values: &[f64]) -> Vec<TimeSeriesPoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| TimeSeriesPoint::new(start + Duration::days(i as i64), v, "res-1"))
            .collect()
    }

    fn prepare(points: &[TimeSeriesPoint], seasonal: bool) -> ResourceSeries<'_> {
        ResourceSeries::prepare("res-1", points.iter().collect(), 365, seasonal)
    }

    #[test]
    fn test_statistical_flat_series() {
        let points = series_points(&[10.0; 14]);
        assert!(detect_statistical(&prepare(&points, false), 0.5).is_empty());
    }

    #[test]
    fn test_statistical_detects_spike() {
        let mut values = vec![10.0; 13];
        values.push(100.0);
        let points = series_points(&values);

        let detections = detect_statistical(&prepare(&points, false), 0.5);
        assert_eq!(detections.len(), 1);
        let d = &detections[0];
        assert_eq!(d.timestamp, points[13].timestamp);
        assert_eq!(d.anomaly_type, AnomalyType::CostSpike);
        assert_eq!(d.actual, 100.0);
        assert!(d.magnitude > 3.0);
        assert!(d.score > 0.7 && d.score <= 1.0);
    }

    #[test]
    fn test_statistical_requires_five_points() {
        let points = series_points(&[10.0, 10.0, 10.0, 100.0]);
        assert!(detect_statistical(&prepare(&points, false), 0.5).is_empty());
    }

    #[test]
    fn test_statistical_detects_drop() {
        let points = series_points(&[50.0, 52.0, 48.0, 51.0, 49.0, 50.0, 2.0]);
        let detections = detect_statistical(&prepare(&points, false), 0.5);
        assert!(detections
            .iter()
            .any(|d| d.timestamp == points[6].timestamp && d.anomaly_type == AnomalyType::CostDrop));
    }

    #[test]
    fn test_time_series_zero_variance_window() {
        let mut values = vec![10.0; 13];
        values.push(100.0);
        let points = series_points(&values);

        let detections = detect_time_series(&prepare(&points, false), 0.5);
        assert_eq!(detections.len(), 1);
        let d = &detections[0];
        assert_eq!(d.window, Some(4));
        assert_eq!(d.expected, 10.0);
        assert_eq!(d.score, 1.0);
        assert!(d.magnitude.is_infinite());
    }

    #[test]
    fn test_time_series_requires_seven_points() {
        let points = series_points(&[10.0, 10.0, 10.0, 10.0, 10.0, 90.0]);
        assert!(detect_time_series(&prepare(&points, false), 0.5).is_empty());
    }

    #[test]
    fn test_time_series_flat_series() {
        let points = series_points(&[10.0; 21]);
        assert!(detect_time_series(&prepare(&points, false), 0.5).is_empty());
    }

    #[test]
    fn test_new_resource_detection() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let points = vec![
            TimeSeriesPoint::new(now - Duration::days(2), 5.0, "res-1"),
            TimeSeriesPoint::new(now - Duration::days(1), 6.0, "res-1"),
        ];

        let detections = detect_new_resource(&prepare(&points, false), now);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].timestamp, points[0].timestamp);
        assert_eq!(detections[0].score, 0.6);
        assert_eq!(detections[0].fixed_severity, Some(Severity::Low));
    }

    #[test]
    fn test_new_resource_ignores_old_or_free_resources() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let old = vec![TimeSeriesPoint::new(now - Duration::days(10), 5.0, "res-1")];
        assert!(detect_new_resource(&prepare(&old, false), now).is_empty());

        let free = vec![TimeSeriesPoint::new(now - Duration::days(1), 0.0, "res-1")];
        assert!(detect_new_resource(&prepare(&free, false), now).is_empty());
    }

    #[test]
    fn test_new_resource_keeps_first_point_outside_short_window() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let points: Vec<TimeSeriesPoint> = (0..4)
            .map(|i| TimeSeriesPoint::new(now - Duration::days(3 - i), 5.0 + i as f64, "res-1"))
            .collect();

        let series = ResourceSeries::prepare("res-1", points.iter().collect(), 1, false);
        assert_eq!(series.points.len(), 2);

        let detections = detect_new_resource(&series, now);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].timestamp, now - Duration::days(3));
        assert_eq!(detections[0].actual, 5.0);
    }

    #[test]
    fn test_new_resource_ignores_future_first_point() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let ahead = vec![TimeSeriesPoint::new(now + Duration::days(1), 5.0, "res-1")];
        assert!(detect_new_resource(&prepare(&ahead, false), now).is_empty());

        let exact = vec![TimeSeriesPoint::new(now, 5.0, "res-1")];
        assert_eq!(detect_new_resource(&prepare(&exact, false), now).len(), 1);
    }

    #[test]
    fn test_prepare_with_unbounded_window_keeps_every_point() {
        let points = series_points(&[1.0; 40]);
        let series = ResourceSeries::prepare("res-1", points.iter().collect(), u32::MAX, false);
        assert_eq!(series.points.len(), 40);
    }

    #[test]
    fn test_prepare_applies_lookback_window() {
        let points = series_points(&[1.0; 40]);
        let series = ResourceSeries::prepare("res-1", points.iter().collect(), 30, false);
        assert_eq!(series.points.len(), 31);
        assert!(std::ptr::eq(series.first_seen.unwrap(), &points[0]));
    }

    #[test]
    fn test_prepare_drops_non_finite_values() {
        let points = series_points(&[1.0, f64::NAN, 2.0, f64::INFINITY]);
        let series = prepare(&points, false);
        assert_eq!(series.values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_weekday_profile_normalizes_weekly_pattern() {
        // Weekends cost four times as much as weekdays, every week
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(); // Monday
        let points: Vec<TimeSeriesPoint> = (0..28)
            .map(|i| {
                let ts = start + Duration::days(i);
                let value = if ts.weekday().num_days_from_monday() >= 5 { 40.0 } else { 10.0 };
                TimeSeriesPoint::new(ts, value, "res-1")
            })
            .collect();

        let series = prepare(&points, true);
        assert!(series.seasonally_adjusted);
        let first = series.values[0];
        assert!(series.values.iter().all(|v| (v - first).abs() < 1e-9));
        assert!(detect_statistical(&series, 0.5).is_empty());
        assert!(detect_time_series(&series, 0.5).is_empty());
    }
}
