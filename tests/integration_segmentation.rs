//! Integration tests for segmentation and determinants over one table.
//!
//! Purpose
//! -------
//! - Exercise the two analyses that run an efficiency estimator as a
//!   pre-pass: efficiency-profiled PCA + k-means clustering and the
//!   determinants regression on a derived score.
//!
//! Coverage
//! --------
//! - `multivariate::pipeline`: automatic k, profiles, serialized metadata.
//! - `determinants::analysis`: request-style dependent parsing, derived
//!   DEA dependent, key variables.
//!
//! Exclusions
//! ----------
//! - Projection and partition numerics, covered by unit tests.
use efficiency_panel::{
    data::UnitTable,
    determinants::{DERIVE_EFFICIENCY, DependentSpec, DeterminantOptions, run_determinants},
    efficiency::EfficiencyMethod,
    multivariate::{ClusterOptions, run_efficiency_clustering},
};

/// Purpose
/// -------
/// Twelve hospitals in two size tiers. `complejidad` drives how much
/// output each bed produces, so DEA efficiency rises with it.
fn hospitals() -> UnitTable {
    let camas = [40.0, 42.0, 45.0, 41.0, 44.0, 43.0, 200.0, 210.0, 205.0, 198.0, 207.0, 202.0];
    let medicos = [10.0, 11.0, 12.0, 10.5, 11.5, 11.0, 60.0, 62.0, 61.0, 59.0, 63.0, 60.5];
    let complejidad = [1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0];
    let egresos: Vec<f64> =
        camas.iter().zip(&complejidad).map(|(c, k)| c * (10.0 + 5.0 * k)).collect();
    UnitTable::from_columns(vec![
        ("camas", camas.to_vec()),
        ("medicos", medicos.to_vec()),
        ("complejidad", complejidad.to_vec()),
        ("egresos", egresos),
    ])
    .expect("equal lengths")
}

#[test]
// Purpose
// -------
// Size tiers separate into clusters and each cluster is profiled with its
// mean efficiency.
//
// Given
// -----
// - `hospitals()`, DEA on (camas, medicos) → egresos, automatic k.
//
// Expect
// ------
// - Both tiers never share a cluster; profiles sum to 12 units; the
//   metadata serializes with the reported keys.
fn efficiency_clusters_follow_size_tiers() {
    // Arrange
    let table = hospitals();

    // Act
    let out = run_efficiency_clustering(
        &table,
        &["camas", "medicos"],
        &["egresos"],
        EfficiencyMethod::Dea,
        &ClusterOptions::default(),
    )
    .expect("pipeline");

    // Assert
    let labels = &out.clusters.labels;
    for small in 0..6 {
        for large in 6..12 {
            assert_ne!(labels[small], labels[large]);
        }
    }
    assert_eq!(out.summary.iter().map(|p| p.n_hospitals).sum::<usize>(), 12);
    let json = serde_json::to_value(&out.metrics).expect("serializable");
    for key in [
        "k_clusters",
        "silhouette_score",
        "explained_variance_ratio",
        "total_variance_explained",
        "method",
        "efficiency_col",
        "scale_applied",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["scale_applied"], serde_json::Value::Bool(true));
    let profiles = serde_json::to_value(&out.summary).expect("serializable");
    assert!(profiles[0]["means"]["ET DEA"].is_number());
}

#[test]
// Purpose
// -------
// The request-style determinants call derives DEA efficiency and finds
// the driver of output per bed.
//
// Given
// -----
// - `hospitals()`, dependent "eficiencia" via "DEA", explained by
//   complejidad and medicos.
//
// Expect
// ------
// - Dependent "ET DEA", method "DEA", twelve observations, complejidad
//   significant with a positive coefficient and listed first.
fn determinants_find_the_driver_of_efficiency() {
    // Arrange
    let table = hospitals();
    let spec = DependentSpec::from_request(
        DERIVE_EFFICIENCY,
        "DEA",
        vec!["camas".into(), "medicos".into()],
        vec!["egresos".into()],
    )
    .expect("known method");

    // Act
    let report = run_determinants(
        &table,
        &spec,
        &["complejidad", "medicos"],
        &DeterminantOptions::default(),
    )
    .expect("fit");

    // Assert
    assert_eq!(report.dependent, "ET DEA");
    assert_eq!(report.method, "DEA");
    assert_eq!(report.n_obs, 12);
    let complejidad = report
        .coefficients
        .iter()
        .find(|c| c.variable == "complejidad")
        .expect("row present");
    assert!(complejidad.coefficient > 0.0);
    assert!(complejidad.significant);
    assert_eq!(report.key_variables.first().map(String::as_str), Some("complejidad"));
    let json = serde_json::to_string(&report).expect("serializable");
    assert!(json.contains("\"key_variables\""));
}
