//! Mean silhouette coefficient of a labeling under Euclidean distance.
//!
//! For point `i` with mean intra-cluster distance `a` and smallest mean
//! distance to another cluster `b`, `s(i) = (b − a) / max(a, b)`. Points in
//! singleton clusters score `0`. The score of a labeling with fewer than two
//! clusters, or with as many clusters as points, is `0`.
use ndarray::Array2;

/// Mean of `s(i)` over all rows of `x`.
///
/// `labels[i]` is the cluster of row `i`; labels need not be contiguous.
pub fn silhouette_score(x: &Array2<f64>, labels: &[usize]) -> f64 {
    let n = x.nrows();
    if n == 0 || labels.len() != n {
        return 0.0;
    }
    let n_slots = labels.iter().copied().max().map_or(0, |m| m + 1);
    let mut sizes = vec![0usize; n_slots];
    for &l in labels {
        sizes[l] += 1;
    }
    let k = sizes.iter().filter(|&&s| s > 0).count();
    if k < 2 || k >= n {
        return 0.0;
    }

    let mut total = 0.0;
    for i in 0..n {
        if sizes[labels[i]] < 2 {
            continue;
        }
        let mut sums = vec![0.0; n_slots];
        for j in 0..n {
            if i != j {
                let d: f64 = x
                    .row(i)
                    .iter()
                    .zip(x.row(j).iter())
                    .map(|(u, v)| (u - v).powi(2))
                    .sum::<f64>()
                    .sqrt();
                sums[labels[j]] += d;
            }
        }
        let own = labels[i];
        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = (0..n_slots)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);
        let denom = a.max(b);
        if denom > 0.0 && denom.is_finite() {
            total += (b - a) / denom;
        }
    }
    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Hand-computed silhouette on a line.
    //
    // Given
    // -----
    // - Points 0, 1, 4, 5 labeled {0, 0, 1, 1}.
    //
    // Expect
    // ------
    // - s = (3.5/4.5, 2.5/3.5, 2.5/3.5, 3.5/4.5); mean of those.
    fn matches_hand_computation() {
        // Arrange
        let x = array![[0.0], [1.0], [4.0], [5.0]];

        // Act
        let s = silhouette_score(&x, &[0, 0, 1, 1]);

        // Assert
        let expected = (2.0 * (3.5 / 4.5) + 2.0 * (2.5 / 3.5)) / 4.0;
        assert_relative_eq!(s, expected, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_labelings_score_zero() {
        let x = array![[0.0], [1.0], [4.0]];
        assert_eq!(silhouette_score(&x, &[0, 0, 0]), 0.0);
        assert_eq!(silhouette_score(&x, &[0, 1, 2]), 0.0);
        assert_eq!(silhouette_score(&x, &[0, 0]), 0.0);
    }

    #[test]
    fn singletons_contribute_zero() {
        let x = array![[0.0], [1.0], [10.0]];
        let s = silhouette_score(&x, &[0, 0, 5]);
        // Rows 0 and 1: a = 1, b = 10 and 9.
        let expected = ((10.0 - 1.0) / 10.0 + (9.0 - 1.0) / 9.0) / 3.0;
        assert_relative_eq!(s, expected, epsilon = 1e-12);
    }
}
