//! Method-agnostic entry point used by the clustering and determinants
//! pipelines to attach a DEA or SFA score column to a table.
use crate::{
    data::UnitTable,
    efficiency::{
        dea::DeaEstimator,
        errors::EfficiencyResult,
        metrics::MetricsMap,
        options::{DeaOptions, EfficiencyMethod, OutputSelection, SfaOptions},
        sfa::SfaEstimator,
    },
};

/// A table annotated with a derived efficiency score.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedScores {
    pub table: UnitTable,
    /// Name of the appended score column.
    pub score_column: String,
    pub method: EfficiencyMethod,
    pub metrics: MetricsMap,
    pub notices: Vec<String>,
}

/// Run DEA or SFA with default options (SFA on the first output only).
///
/// # Errors
/// Whatever the selected estimator returns.
pub fn derive_scores<S: AsRef<str>>(
    table: &UnitTable, method: EfficiencyMethod, inputs: &[S], outputs: &[S],
) -> EfficiencyResult<DerivedScores> {
    match method {
        EfficiencyMethod::Dea => {
            let options = DeaOptions::default();
            let out = DeaEstimator::new(options.clone()).fit(table, inputs, outputs)?;
            Ok(DerivedScores {
                table: out.table,
                score_column: options.score_column,
                method,
                metrics: out.metrics,
                notices: Vec::new(),
            })
        }
        EfficiencyMethod::Sfa => {
            let options = SfaOptions::default();
            let selection =
                OutputSelection::Many(outputs.iter().map(|s| s.as_ref().to_string()).collect());
            let out = SfaEstimator::new(options.clone()).fit(table, inputs, selection)?;
            Ok(DerivedScores {
                table: out.table,
                score_column: options.score_column,
                method,
                metrics: out.metrics,
                notices: out.notices,
            })
        }
    }
}
