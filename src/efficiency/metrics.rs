//! efficiency::metrics — metric maps and ranking shared by the estimators.
//!
//! Purpose
//! -------
//! Give every analysis the same flat, serializable summary type
//! ([`MetricsMap`]) and the same percentile-rank rule.
//!
//! Key behaviors
//! -------------
//! - [`percentile_ranks`]: valid rows are ordered ascending by score
//!   (stable, so ties keep row order); the row at rank `r` of `n` gets
//!   `⌈100·r/n⌉ ∈ 1..=100`. Invalid rows get `0`.
//! - [`score_summary`]: mean and percentage below the critical threshold
//!   over **all** rows (invalid rows count as zeros).
//! - [`significant_key`]: the largest-|coefficient| name among those with
//!   `p < alpha`, or [`UNDETERMINED`].
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    data::ValidityPartition,
    efficiency::options::UNDETERMINED,
    utils::{mean, pct_below},
};

/// One entry of a metrics map.
///
/// Serialized untagged, so a map renders as plain JSON scalars, arrays and
/// objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Flag(bool),
    Count(usize),
    Number(f64),
    Text(String),
    Numbers(Vec<f64>),
    Texts(Vec<String>),
    Map(IndexMap<String, f64>),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(x) => Some(*x),
            MetricValue::Count(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(x: f64) -> Self {
        MetricValue::Number(x)
    }
}

impl From<bool> for MetricValue {
    fn from(b: bool) -> Self {
        MetricValue::Flag(b)
    }
}

impl From<usize> for MetricValue {
    fn from(n: usize) -> Self {
        MetricValue::Count(n)
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        MetricValue::Text(s.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        MetricValue::Text(s)
    }
}

impl From<Vec<f64>> for MetricValue {
    fn from(v: Vec<f64>) -> Self {
        MetricValue::Numbers(v)
    }
}

impl From<Vec<String>> for MetricValue {
    fn from(v: Vec<String>) -> Self {
        MetricValue::Texts(v)
    }
}

impl From<IndexMap<String, f64>> for MetricValue {
    fn from(m: IndexMap<String, f64>) -> Self {
        MetricValue::Map(m)
    }
}

/// Ordered metric name → value map.
pub type MetricsMap = IndexMap<String, MetricValue>;

/// Percentile rank (1..=100) of each valid row's score; 0 for invalid rows.
///
/// `scores` is indexed by row, over the whole table.
pub fn percentile_ranks(scores: &[f64], partition: &ValidityPartition) -> Vec<u32> {
    let mut ranks = vec![0u32; partition.n_rows()];
    let n = partition.n_valid();
    if n == 0 {
        return ranks;
    }
    let mut order = partition.valid.clone();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));
    for (r, &row) in order.iter().enumerate() {
        let pct = (100 * (r + 1)).div_ceil(n);
        ranks[row] = pct as u32;
    }
    ranks
}

/// `(mean, % below threshold)` over every row of `scores`.
pub fn score_summary(scores: &[f64], threshold: f64) -> (f64, f64) {
    (mean(scores), pct_below(scores, threshold))
}

/// Name with the largest `|coefficient|` among entries with `p < alpha`.
///
/// Entries are `(name, coefficient, p_value)`; the first wins on ties.
pub fn significant_key<'a, I>(entries: I, alpha: f64) -> String
where
    I: IntoIterator<Item = (&'a str, f64, f64)>,
{
    let mut best: Option<(&str, f64)> = None;
    for (name, coef, p) in entries {
        if p < alpha && coef.is_finite() && best.is_none_or(|(_, b)| coef.abs() > b) {
            best = Some((name, coef.abs()));
        }
    }
    best.map(|(name, _)| name.to_string()).unwrap_or_else(|| UNDETERMINED.to_string())
}
