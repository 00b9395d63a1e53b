//! Small numeric helpers shared by the estimators and summaries.
//!
//! All helpers take slices and return plain `f64`s. Empty inputs map to
//! `0.0` (or `None` where the caller needs to distinguish), never `NaN`.

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of the finite entries; `None` when there are none.
pub fn finite_mean(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() { None } else { Some(mean(&finite)) }
}

/// Median of the finite entries; `None` when there are none.
pub fn finite_median(values: &[f64]) -> Option<f64> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);
    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        Some(0.5 * (finite[mid - 1] + finite[mid]))
    } else {
        Some(finite[mid])
    }
}

/// Standard deviation of the finite entries with `ddof` degrees of freedom
/// removed; `None` when fewer than `ddof + 1` finite entries exist.
pub fn finite_std(values: &[f64], ddof: usize) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() <= ddof {
        return None;
    }
    let m = mean(&finite);
    let ss: f64 = finite.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (finite.len() - ddof) as f64).sqrt())
}

/// Percentage (0..=100) of entries strictly below `threshold`.
pub fn pct_below(values: &[f64], threshold: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let below = values.iter().filter(|&&v| v < threshold).count();
    100.0 * below as f64 / values.len() as f64
}

/// `value` when finite, otherwise `fallback`.
#[inline]
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
