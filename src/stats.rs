//! # Batch statistics
//! Order statistics over one batch of values: median, nearest-rank percentile
//! and floored maxima.
//!
//! All functions borrow their input and sort a private copy; the caller's
//! slice is never reordered.

/// Median of `nums`; 0.0 for an empty slice.
pub fn median(nums: &[f64]) -> f64 {
    if nums.is_empty() {
        return 0.0;
    }
    let sorted = sorted_copy(nums);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Nearest-rank percentile without interpolation.
///
/// `index = floor(p / 100 * len)`, clamped to `[0, len - 1]`. Returns 0.0 for
/// an empty slice. Downstream thresholds are tuned against this exact
/// definition; do not swap in an interpolating percentile.
pub fn percentile(nums: &[f64], p: f64) -> f64 {
    if nums.is_empty() {
        return 0.0;
    }
    let sorted = sorted_copy(nums);
    let last = sorted.len() - 1;
    let raw = ((p / 100.0) * sorted.len() as f64).floor();
    let idx = if raw.is_nan() || raw <= 0.0 {
        0
    } else {
        (raw as usize).min(last)
    };
    sorted[idx]
}

/// Largest value in `values`, never below `floor`.
pub fn max_or_floor<I>(values: I, floor: f64) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().fold(floor, f64::max)
}

fn sorted_copy(nums: &[f64]) -> Vec<f64> {
    let mut v = nums.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}
