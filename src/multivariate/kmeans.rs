//! multivariate::kmeans — seeded k-means partitioning.
//!
//! Purpose
//! -------
//! Partition the rows of a (projected) coordinate matrix into `k` groups by
//! minimizing the within-cluster sum of squared Euclidean distances.
//!
//! Key behaviors
//! -------------
//! - k-means++ seeding drawn from a single `ChaCha8Rng` seeded with
//!   [`KMeansOptions::seed`]; every restart continues the same stream, so a
//!   fit is fully determined by its options.
//! - Lloyd iterations stop after `max_iter` passes or once the total squared
//!   center shift falls to `tol` times the mean per-column variance.
//! - A cluster that loses all its points is reseeded at the point farthest
//!   from its current center.
//! - The returned labeling always uses every one of the `k` labels.
//! - The restart with the lowest inertia wins; ties keep the earliest.
//!
//! Conventions
//! -----------
//! - Distance ties during assignment go to the lowest cluster index.
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::multivariate::errors::{MultivariateError, MultivariateResult};

/// Restart, iteration and seeding controls.
///
/// Defaults: 10 restarts, 300 iterations, tolerance `1e-4`, seed 42.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansOptions {
    pub n_init: usize,
    pub max_iter: usize,
    pub tol: f64,
    pub seed: u64,
}

impl KMeansOptions {
    /// # Errors
    /// [`MultivariateError::InvalidOption`] for zero restarts or iterations,
    /// or a negative / non-finite tolerance.
    pub fn new(n_init: usize, max_iter: usize, tol: f64, seed: u64) -> MultivariateResult<Self> {
        if n_init == 0 {
            return Err(MultivariateError::InvalidOption {
                name: "n_init",
                value: n_init.to_string(),
                reason: "at least one restart is required",
            });
        }
        if max_iter == 0 {
            return Err(MultivariateError::InvalidOption {
                name: "max_iter",
                value: max_iter.to_string(),
                reason: "at least one iteration is required",
            });
        }
        if !tol.is_finite() || tol < 0.0 {
            return Err(MultivariateError::InvalidOption {
                name: "tol",
                value: tol.to_string(),
                reason: "must be finite and non-negative",
            });
        }
        Ok(Self { n_init, max_iter, tol, seed })
    }
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self { n_init: 10, max_iter: 300, tol: 1e-4, seed: 42 }
    }
}

/// Result of [`kmeans`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansFit {
    /// Cluster index per row, in `0..k`.
    pub labels: Vec<usize>,
    /// `k × d` cluster centers.
    pub centers: Array2<f64>,
    /// Sum of squared distances to the assigned centers.
    pub inertia: f64,
    /// Lloyd passes of the winning restart.
    pub iterations: usize,
}

/// Partition the rows of `x` into `k` clusters.
///
/// # Errors
/// - [`MultivariateError::InvalidClusterCount`] when `k == 0`.
/// - [`MultivariateError::ClusterCountExceedsRows`] when `k > n`.
pub fn kmeans(x: &Array2<f64>, k: usize, options: &KMeansOptions) -> MultivariateResult<KMeansFit> {
    let n = x.nrows();
    if k == 0 {
        return Err(MultivariateError::InvalidClusterCount { k });
    }
    if k > n {
        return Err(MultivariateError::ClusterCountExceedsRows { k, n_rows: n });
    }

    let tol = options.tol * mean_column_variance(x);
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let mut best: Option<KMeansFit> = None;
    for _ in 0..options.n_init.max(1) {
        let centers = plus_plus_centers(x, k, &mut rng);
        let fit = lloyd(x, centers, options.max_iter.max(1), tol);
        if best.as_ref().is_none_or(|b| fit.inertia < b.inertia) {
            best = Some(fit);
        }
    }
    best.ok_or(MultivariateError::InvalidClusterCount { k })
}

// ---- Helper methods ----

#[inline]
fn sq_dist(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(u, v)| (u - v).powi(2)).sum()
}

fn mean_column_variance(x: &Array2<f64>) -> f64 {
    if x.nrows() == 0 || x.ncols() == 0 {
        return 0.0;
    }
    x.var_axis(Axis(0), 0.0).mean().unwrap_or(0.0)
}

/// k-means++: first center uniform, then proportional to squared distance
/// from the nearest chosen center.
fn plus_plus_centers(x: &Array2<f64>, k: usize, rng: &mut ChaCha8Rng) -> Array2<f64> {
    let n = x.nrows();
    let mut centers = Array2::<f64>::zeros((k, x.ncols()));
    let first = rng.gen_range(0..n);
    centers.row_mut(0).assign(&x.row(first));
    let mut closest: Vec<f64> = x.outer_iter().map(|row| sq_dist(row, x.row(first))).collect();

    for c in 1..k {
        let total: f64 = closest.iter().sum();
        let pick = if total > 0.0 {
            let target = rng.gen_range(0.0..total);
            let mut acc = 0.0;
            closest
                .iter()
                .position(|&d| {
                    acc += d;
                    acc > target
                })
                .unwrap_or(n - 1)
        } else {
            rng.gen_range(0..n)
        };
        centers.row_mut(c).assign(&x.row(pick));
        for (i, row) in x.outer_iter().enumerate() {
            closest[i] = closest[i].min(sq_dist(row, x.row(pick)));
        }
    }
    centers
}

/// Index of the nearest center and the squared distance to it.
fn nearest(point: ArrayView1<f64>, centers: &Array2<f64>) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (j, center) in centers.outer_iter().enumerate() {
        let d = sq_dist(point, center);
        if d < best.1 {
            best = (j, d);
        }
    }
    best
}

fn lloyd(x: &Array2<f64>, mut centers: Array2<f64>, max_iter: usize, tol: f64) -> KMeansFit {
    let (n, d) = x.dim();
    let k = centers.nrows();
    let mut labels = vec![0usize; n];
    let mut iterations = 0;

    for _ in 0..max_iter {
        iterations += 1;
        let mut dists = Array1::<f64>::zeros(n);
        for (i, row) in x.outer_iter().enumerate() {
            let (j, dist) = nearest(row, &centers);
            labels[i] = j;
            dists[i] = dist;
        }

        let mut sums = Array2::<f64>::zeros((k, d));
        let mut counts = vec![0usize; k];
        for (i, row) in x.outer_iter().enumerate() {
            let mut slot = sums.row_mut(labels[i]);
            slot += &row;
            counts[labels[i]] += 1;
        }

        let mut updated = centers.clone();
        for j in 0..k {
            if counts[j] > 0 {
                updated.row_mut(j).assign(&(&sums.row(j) / counts[j] as f64));
            } else {
                let far = farthest(&dists);
                updated.row_mut(j).assign(&x.row(far));
                dists[far] = 0.0;
            }
        }

        let shift: f64 =
            updated.outer_iter().zip(centers.outer_iter()).map(|(a, b)| sq_dist(a, b)).sum();
        centers = updated;
        if shift <= tol {
            break;
        }
    }

    for (i, row) in x.outer_iter().enumerate() {
        labels[i] = nearest(row, &centers).0;
    }
    fill_empty_clusters(x, &mut labels, &mut centers);
    let inertia =
        x.outer_iter().zip(&labels).map(|(row, &j)| sq_dist(row, centers.row(j))).sum();

    KMeansFit { labels, centers, inertia, iterations }
}

fn farthest(dists: &Array1<f64>) -> usize {
    dists
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |acc, (i, &d)| if d > acc.1 { (i, d) } else { acc })
        .0
}

/// Move one point into every empty cluster, taken from a cluster with more
/// than one member, preferring the point farthest from its center.
fn fill_empty_clusters(x: &Array2<f64>, labels: &mut [usize], centers: &mut Array2<f64>) {
    let k = centers.nrows();
    let mut counts = vec![0usize; k];
    for &j in labels.iter() {
        counts[j] += 1;
    }
    for empty in 0..k {
        if counts[empty] > 0 {
            continue;
        }
        let donor = labels
            .iter()
            .enumerate()
            .filter(|&(_, &j)| counts[j] > 1)
            .map(|(i, &j)| (i, sq_dist(x.row(i), centers.row(j))))
            .fold(None, |acc: Option<(usize, f64)>, (i, d)| match acc {
                Some((_, best)) if best >= d => acc,
                _ => Some((i, d)),
            });
        if let Some((i, _)) = donor {
            counts[labels[i]] -= 1;
            labels[i] = empty;
            counts[empty] = 1;
            centers.row_mut(empty).assign(&x.row(i));
        }
    }
}
