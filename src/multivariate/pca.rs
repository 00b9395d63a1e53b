//! multivariate::pca — principal component projection of unit features.
//!
//! Purpose
//! -------
//! Fit an orthogonal linear projection of a feature matrix onto the
//! directions of largest variance and project rows onto the leading
//! components.
//!
//! Key behaviors
//! -------------
//! - Columns are centered; with `standardize` they are also divided by their
//!   population standard deviation (ddof = 0). Columns whose deviation is
//!   below [`SCALE_EPS`] keep scale `1.0`, so constant features are centered
//!   only.
//! - The covariance of the prepared matrix uses ddof = 1 and is decomposed
//!   with `nalgebra`'s symmetric eigen solver. Components are ordered by
//!   descending eigenvalue.
//! - Each component's sign is fixed so its largest-magnitude loading is
//!   positive, which makes fits reproducible across platforms.
//! - Requesting more components than features truncates silently.
//!
//! Invariants & assumptions
//! ------------------------
//! - `components` is `k × p` with orthonormal rows.
//! - `explained_variance_ratio` is relative to the total variance of all
//!   `p` directions, so it sums to at most `1.0`.
//! - Callers pass finite matrices; the pipeline drops non-finite rows first.
use indexmap::IndexMap;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::{
    data::errors::DataError,
    inference::hessian::to_dmatrix,
    multivariate::errors::{MultivariateError, MultivariateResult},
};

/// Deviations below this are treated as zero when standardizing.
pub const SCALE_EPS: f64 = 1e-9;

/// Projection settings.
///
/// Defaults: two components, standardized features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaOptions {
    pub n_components: usize,
    pub standardize: bool,
}

impl PcaOptions {
    /// # Errors
    /// [`MultivariateError::InvalidOption`] when `n_components == 0`.
    pub fn new(n_components: usize, standardize: bool) -> MultivariateResult<Self> {
        if n_components == 0 {
            return Err(MultivariateError::InvalidOption {
                name: "n_components",
                value: n_components.to_string(),
                reason: "at least one component is required",
            });
        }
        Ok(Self { n_components, standardize })
    }
}

impl Default for PcaOptions {
    fn default() -> Self {
        Self { n_components: 2, standardize: true }
    }
}

/// `PcaModel` — a fitted projection.
///
/// Fields
/// ------
/// - `feature_names`: `Vec<String>`
///   Column order of the fitted matrix.
/// - `components`: `Array2<f64>`
///   Loadings, one row per component (`k × p`).
/// - `explained_variance`: `Array1<f64>`
///   Eigenvalue of each kept component (ddof = 1).
/// - `explained_variance_ratio`: `Array1<f64>`
///   `explained_variance / total variance`.
/// - `mean`, `scale`: `Array1<f64>`
///   Per-feature centering and scaling applied before projecting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaModel {
    pub feature_names: Vec<String>,
    pub components: Array2<f64>,
    pub explained_variance: Array1<f64>,
    pub explained_variance_ratio: Array1<f64>,
    pub mean: Array1<f64>,
    pub scale: Array1<f64>,
}

impl PcaModel {
    /// Fit on an `n × p` matrix whose columns are named by `feature_names`.
    ///
    /// # Errors
    /// - [`MultivariateError::Data`] when there are no features or the names
    ///   do not match the column count.
    /// - [`MultivariateError::InsufficientRows`] when `n < 2`.
    pub fn fit(
        x: &Array2<f64>, feature_names: Vec<String>, options: &PcaOptions,
    ) -> MultivariateResult<Self> {
        let (n, p) = x.dim();
        if p == 0 {
            return Err(DataError::EmptyFieldList { role: "feature" }.into());
        }
        if feature_names.len() != p {
            return Err(DataError::ColumnLengthMismatch {
                column: "feature_names".to_string(),
                expected: p,
                found: feature_names.len(),
            }
            .into());
        }
        if n < 2 {
            return Err(MultivariateError::InsufficientRows { n_rows: n, required: 2 });
        }

        let mean = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(p));
        let mut prepared = x - &mean;
        let scale = if options.standardize {
            prepared
                .map_axis(Axis(0), |col| col.std(0.0))
                .mapv(|s| if s.is_finite() && s > SCALE_EPS { s } else { 1.0 })
        } else {
            Array1::ones(p)
        };
        prepared /= &scale;

        let cov = prepared.t().dot(&prepared) / (n - 1) as f64;
        let eigen = to_dmatrix(&cov).symmetric_eigen();

        let mut order: Vec<usize> = (0..p).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

        let total: f64 = eigen.eigenvalues.iter().map(|v| v.max(0.0)).sum();
        let k = options.n_components.min(p);
        let mut components = Array2::<f64>::zeros((k, p));
        let mut explained_variance = Array1::<f64>::zeros(k);
        for (row, &idx) in order.iter().take(k).enumerate() {
            let column = eigen.eigenvectors.column(idx);
            let pivot = column.iter().copied().fold(0.0_f64, |acc, v| {
                if v.abs() > acc.abs() { v } else { acc }
            });
            let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
            for j in 0..p {
                components[[row, j]] = sign * column[j];
            }
            explained_variance[row] = eigen.eigenvalues[idx].max(0.0);
        }
        let explained_variance_ratio = if total > 0.0 {
            explained_variance.mapv(|v| v / total)
        } else {
            Array1::zeros(k)
        };

        Ok(Self { feature_names, components, explained_variance, explained_variance_ratio, mean, scale })
    }

    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }

    /// Component labels `PC1..PCk`.
    pub fn component_names(&self) -> Vec<String> {
        (1..=self.n_components()).map(|i| format!("PC{i}")).collect()
    }

    /// Project rows onto the fitted components (`n × k`).
    ///
    /// # Errors
    /// [`MultivariateError::Data`] when the column count differs from the fit.
    pub fn transform(&self, x: ArrayView2<f64>) -> MultivariateResult<Array2<f64>> {
        if x.ncols() != self.mean.len() {
            return Err(DataError::ColumnLengthMismatch {
                column: "features".to_string(),
                expected: self.mean.len(),
                found: x.ncols(),
            }
            .into());
        }
        let prepared = (&x - &self.mean) / &self.scale;
        Ok(prepared.dot(&self.components.t()))
    }

    /// Sum of the explained-variance ratios of the kept components.
    pub fn total_variance_explained(&self) -> f64 {
        self.explained_variance_ratio.sum()
    }

    /// Loadings keyed by component, then feature.
    pub fn loadings(&self) -> IndexMap<String, IndexMap<String, f64>> {
        self.component_names()
            .into_iter()
            .zip(self.components.outer_iter())
            .map(|(pc, row)| {
                let by_feature =
                    self.feature_names.iter().cloned().zip(row.iter().copied()).collect();
                (pc, by_feature)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use proptest::prelude::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Eigenvalue ordering, variance ratios and sign convention.
    // - Standardization of constant columns and silent truncation.
    // - Standardized versus raw projections on mixed-scale features.
    // - Non-negative, non-increasing variance ratios on random matrices.
    //
    // They intentionally DO NOT cover:
    // - Row filtering and table annotation (see `pipeline`).
    // -------------------------------------------------------------------------

    fn names(p: usize) -> Vec<String> {
        (0..p).map(|j| format!("f{j}")).collect()
    }

    #[test]
    // Purpose
    // -------
    // An axis-aligned cloud recovers its axes in variance order.
    //
    // Given
    // -----
    // - Points (±2, 0), (0, ±1), unstandardized.
    //
    // Expect
    // ------
    // - Eigenvalues 8/3 and 2/3, ratios 0.8 / 0.2, PC1 = (1, 0) and the
    //   point (2, 0) projects to (2, 0).
    fn axis_aligned_cloud_recovers_axes() {
        // Arrange
        let x = array![[2.0, 0.0], [0.0, 1.0], [-2.0, 0.0], [0.0, -1.0]];
        let options = PcaOptions::new(2, false).expect("valid options");

        // Act
        let model = PcaModel::fit(&x, names(2), &options).expect("fit");
        let z = model.transform(x.view()).expect("same width");

        // Assert
        assert_relative_eq!(model.explained_variance[0], 8.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(model.explained_variance[1], 2.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(model.explained_variance_ratio[0], 0.8, epsilon = 1e-10);
        assert_relative_eq!(model.components[[0, 0]], 1.0, epsilon = 1e-10);
        assert_relative_eq!(model.components[[0, 1]], 0.0, epsilon = 1e-10);
        assert_relative_eq!(z[[0, 0]], 2.0, epsilon = 1e-10);
        assert_relative_eq!(z[[0, 1]], 0.0, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Collinear features collapse onto one component; the largest loading
    // of every component is positive.
    //
    // Given
    // -----
    // - Four features that are affine in the same index, standardized.
    //
    // Expect
    // ------
    // - PC1 explains (almost) all variance; ratios sum to at most one; the
    //   sign convention holds.
    fn collinear_features_load_on_first_component() {
        // Arrange
        let x = array![
            [1.0, 2.0, 1.0, 3.0],
            [2.0, 4.0, 3.0, 6.0],
            [3.0, 6.0, 5.0, 9.0],
            [4.0, 8.0, 7.0, 12.0],
            [5.0, 10.0, 9.0, 15.0],
        ];

        // Act
        let model = PcaModel::fit(&x, names(4), &PcaOptions::default()).expect("fit");

        // Assert
        assert_eq!(model.component_names(), vec!["PC1", "PC2"]);
        assert_relative_eq!(model.explained_variance_ratio[0], 1.0, epsilon = 1e-8);
        assert!(model.total_variance_explained() <= 1.0 + 1e-12);
        for row in model.components.outer_iter() {
            let pivot = row.iter().copied().fold(0.0_f64, |a, v| if v.abs() > a.abs() { v } else { a });
            assert!(pivot > 0.0);
        }
    }

    #[test]
    fn constant_column_is_centered_only_and_components_truncate() {
        let x = array![[1.0, 5.0], [2.0, 5.0], [4.0, 5.0]];
        let options = PcaOptions::new(5, true).expect("valid options");

        let model = PcaModel::fit(&x, names(2), &options).expect("fit");
        let z = model.transform(x.view()).expect("same width");

        assert_eq!(model.n_components(), 2);
        assert_eq!(model.scale[1], 1.0);
        assert!(z.iter().all(|v| v.is_finite()));
        assert_eq!(model.loadings()["PC1"].len(), 2);
    }

    #[test]
    fn rejects_single_row_and_width_mismatch() {
        let one = array![[1.0, 2.0]];
        assert!(matches!(
            PcaModel::fit(&one, names(2), &PcaOptions::default()),
            Err(MultivariateError::InsufficientRows { n_rows: 1, required: 2 })
        ));
        assert!(PcaOptions::new(0, true).is_err());

        let x = array![[1.0, 2.0], [2.0, 1.0], [3.0, 3.0]];
        let model = PcaModel::fit(&x, names(2), &PcaOptions::default()).expect("fit");
        assert!(model.transform(array![[1.0, 2.0, 3.0]].view()).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Standardizing changes the projection when features live on very
    // different scales.
    //
    // Given
    // -----
    // - Six rows of beds (tens) and discharges (thousands) that are only
    //   loosely correlated.
    //
    // Expect
    // ------
    // - Raw PC1 is dominated by the large-scale column (ratio > 0.99).
    // - Standardized scores differ from raw scores by more than rounding.
    fn standardizing_changes_scores_on_mixed_scales() {
        // Arrange
        let x = array![
            [10.0, 4_000.0],
            [20.0, 1_500.0],
            [30.0, 6_500.0],
            [40.0, 2_000.0],
            [50.0, 8_000.0],
            [60.0, 3_000.0],
        ];
        let raw = PcaOptions::new(2, false).expect("valid options");
        let scaled = PcaOptions::new(2, true).expect("valid options");

        // Act
        let raw_model = PcaModel::fit(&x, names(2), &raw).expect("fit");
        let scaled_model = PcaModel::fit(&x, names(2), &scaled).expect("fit");
        let z_raw = raw_model.transform(x.view()).expect("same width");
        let z_scaled = scaled_model.transform(x.view()).expect("same width");

        // Assert
        assert!(raw_model.explained_variance_ratio[0] > 0.99);
        assert!(scaled_model.explained_variance_ratio[0] < 0.99);
        let max_gap = z_raw
            .iter()
            .zip(z_scaled.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        assert!(max_gap > 1e-3, "projections coincide (gap {max_gap})");
    }

    fn matrix_strategy() -> impl Strategy<Value = Array2<f64>> {
        (2usize..5, 3usize..12).prop_flat_map(|(p, n)| {
            proptest::collection::vec(-100.0f64..100.0, n * p).prop_map(move |cells| {
                Array2::from_shape_vec((n, p), cells).expect("n * p cells")
            })
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        // Purpose
        // -------
        // Variance ratios are ordered and non-negative for any finite input.
        //
        // Given
        // -----
        // - Random 3..12 × 2..5 matrices, every component kept, with and
        //   without standardization.
        //
        // Expect
        // ------
        // - `ratio[i] >= ratio[i + 1] >= 0` and the ratios sum to at most 1.
        fn variance_ratios_are_non_negative_and_non_increasing(
            x in matrix_strategy(),
            standardize in any::<bool>(),
        ) {
            let options = PcaOptions::new(x.ncols(), standardize).expect("valid options");

            let model = PcaModel::fit(&x, names(x.ncols()), &options).expect("fit");

            let ratios = &model.explained_variance_ratio;
            prop_assert!(ratios.iter().all(|&r| r >= 0.0));
            for i in 1..ratios.len() {
                prop_assert!(ratios[i - 1] >= ratios[i]);
            }
            prop_assert!(model.total_variance_explained() <= 1.0 + 1e-9);
        }
    }
}
