//! Time-series statistics primitives shared by the analysis engines
//!
//! Every function here is total: empty or degenerate input yields `0.0`
//! instead of `NaN` or a panic, so callers can feed raw per-resource series.

use serde::{Deserialize, Serialize};

/// Arithmetic mean, `0.0` for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    statistical::mean(values)
}

/// Population (divide-by-n) standard deviation, `0.0` for fewer than two values
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = statistical::mean(values);
    statistical::population_standard_deviation(values, Some(avg))
}

/// Mean and population standard deviation in one pass over the slice
pub fn mean_and_std_dev(values: &[f64]) -> (f64, f64) {
    (mean(values), population_std_dev(values))
}

/// Calculate percentile of a sorted slice
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let index = (p / 100.0 * (sorted_data.len() - 1) as f64).round() as usize;
    sorted_data[index.min(sorted_data.len() - 1)]
}

/// Sort a copy of `values` ascending; `NaN` sorts last
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// First/third quartile and interquartile range
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quartiles {
    /// First quartile
    pub q1: f64,
    /// Third quartile
    pub q3: f64,
    /// Interquartile range
    pub iqr: f64,
}

/// Compute quartiles of an unsorted slice
pub fn quartiles(values: &[f64]) -> Quartiles {
    let sorted = sorted(values);
    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);
    Quartiles {
        q1,
        q3,
        iqr: q3 - q1,
    }
}

/// Outlier fences `[q1 - k*iqr, q3 + k*iqr]`
pub fn iqr_bounds(quartiles: &Quartiles, multiplier: f64) -> (f64, f64) {
    (
        quartiles.q1 - multiplier * quartiles.iqr,
        quartiles.q3 + multiplier * quartiles.iqr,
    )
}

/// Standard score of `value`; `0.0` when the spread is zero
pub fn z_score(value: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev == 0.0 {
        return 0.0;
    }
    (value - mean) / std_dev
}

/// Percentage change from `previous` to `current`.
///
/// A zero baseline reports `100.0` for any positive current value and `0.0`
/// otherwise.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

/// Standard deviation relative to the mean; `0.0` when the mean is zero
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let (avg, std_dev) = mean_and_std_dev(values);
    if avg == 0.0 {
        return 0.0;
    }
    std_dev / avg.abs()
}
