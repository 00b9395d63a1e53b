//! Unit subsetting for two-period comparisons.
//!
//! Rules are mutually exclusive; [`UnitSubset::from_parts`] picks the first
//! one supplied in the order explicit ids → top-N by column → count cap.
use serde::{Deserialize, Serialize};

use crate::productivity::errors::{ProductivityError, ProductivityResult};

/// Which of the common units enter the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSubset {
    #[default]
    All,
    /// Exactly these ids, where present.
    Ids(Vec<i64>),
    /// The `n` units with the largest period-t value of an input column,
    /// ordered descending.
    TopN { column: String, n: usize },
    /// The first `n` common units.
    MaxUnits(usize),
}

impl UnitSubset {
    /// Build from optional request parameters, keeping the highest-priority one.
    pub fn from_parts(
        ids: Option<Vec<i64>>, top_n: Option<(String, usize)>, max_units: Option<usize>,
    ) -> Self {
        match (ids, top_n, max_units) {
            (Some(ids), _, _) => UnitSubset::Ids(ids),
            (None, Some((column, n)), _) => UnitSubset::TopN { column, n },
            (None, None, Some(n)) => UnitSubset::MaxUnits(n),
            (None, None, None) => UnitSubset::All,
        }
    }

    /// Reject a top-N column that is not a declared input.
    ///
    /// # Errors
    /// [`ProductivityError::SubsetColumnNotInput`].
    pub fn validate<S: AsRef<str>>(&self, inputs: &[S]) -> ProductivityResult<()> {
        if let UnitSubset::TopN { column, .. } = self {
            if !inputs.iter().any(|i| i.as_ref() == column) {
                return Err(ProductivityError::SubsetColumnNotInput {
                    column: column.clone(),
                    inputs: inputs.iter().map(|i| i.as_ref().to_string()).collect(),
                });
            }
        }
        Ok(())
    }

    /// Apply the rule to the ordered common ids.
    ///
    /// `value_of` returns the period-t value of the top-N column for an id;
    /// it is only called for [`UnitSubset::TopN`]. Ties keep common order.
    pub fn apply<F>(&self, common: &[i64], value_of: F) -> Vec<i64>
    where
        F: Fn(i64) -> f64,
    {
        match self {
            UnitSubset::All => common.to_vec(),
            UnitSubset::Ids(ids) => common.iter().copied().filter(|id| ids.contains(id)).collect(),
            UnitSubset::TopN { n, .. } => {
                let mut ranked: Vec<(i64, f64)> =
                    common.iter().map(|&id| (id, value_of(id))).collect();
                ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
                ranked.into_iter().take(*n).map(|(id, _)| id).collect()
            }
            UnitSubset::MaxUnits(n) => common.iter().copied().take(*n).collect(),
        }
    }
}
