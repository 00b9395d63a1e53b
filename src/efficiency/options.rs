//! efficiency::options — estimator configuration.
//!
//! Purpose
//! -------
//! Materialize every tunable of the DEA and SFA estimators as a named field
//! with a documented default, and parse the string names callers use
//! (`"CRS"`, `"out"`, `"cost"`, `"teJ"`, `"DEA"`, ...) through `FromStr`.
//!
//! Conventions
//! -----------
//! - Parsing is case-insensitive and trims surrounding whitespace.
//! - Constructors named `new` validate; `Default` never fails.
use std::str::FromStr;

use crate::{
    efficiency::errors::{EfficiencyError, EfficiencyResult},
    optimization::loglik_optimizer::MLEOptions,
};

/// Default "critical" efficiency threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

pub const DEA_SCORE_COLUMN: &str = "ET DEA";
pub const SFA_SCORE_COLUMN: &str = "ET SFA";
pub const PERCENTILE_COLUMN: &str = "percentil";

/// Key-factor placeholder when nothing qualifies.
pub const UNDETERMINED: &str = "undetermined";

fn validate_threshold(threshold: f64) -> EfficiencyResult<()> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(EfficiencyError::InvalidOption {
            name: "threshold",
            value: threshold.to_string(),
            reason: "must be a finite number in [0, 1]",
        })
    }
}

// ---- DEA ----

/// Radial direction of the DEA projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Contract inputs at fixed outputs.
    #[default]
    Input,
    /// Expand outputs at fixed inputs.
    Output,
}

impl FromStr for Orientation {
    type Err = EfficiencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" | "input" => Ok(Orientation::Input),
            "out" | "output" => Ok(Orientation::Output),
            _ => Err(EfficiencyError::InvalidOption {
                name: "orientation",
                value: s.to_string(),
                reason: "expected 'in' or 'out'",
            }),
        }
    }
}

/// Returns-to-scale assumption of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnsToScale {
    #[default]
    Crs,
    Vrs,
}

impl FromStr for ReturnsToScale {
    type Err = EfficiencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CRS" => Ok(ReturnsToScale::Crs),
            "VRS" => Ok(ReturnsToScale::Vrs),
            _ => Err(EfficiencyError::InvalidOption {
                name: "rts",
                value: s.to_string(),
                reason: "expected 'CRS' or 'VRS'",
            }),
        }
    }
}

/// DEA configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DeaOptions {
    pub orientation: Orientation,
    pub rts: ReturnsToScale,
    /// Scores strictly below this count as critical.
    pub threshold: f64,
    pub score_column: String,
}

impl DeaOptions {
    /// # Errors
    /// [`EfficiencyError::InvalidOption`] when `threshold` is outside `[0, 1]`.
    pub fn new(orientation: Orientation, rts: ReturnsToScale, threshold: f64) -> EfficiencyResult<Self> {
        validate_threshold(threshold)?;
        Ok(DeaOptions { orientation, rts, threshold, score_column: DEA_SCORE_COLUMN.to_string() })
    }
}

impl Default for DeaOptions {
    fn default() -> Self {
        DeaOptions {
            orientation: Orientation::Input,
            rts: ReturnsToScale::Crs,
            threshold: DEFAULT_THRESHOLD,
            score_column: DEA_SCORE_COLUMN.to_string(),
        }
    }
}

// ---- SFA ----

/// Frontier type; fixes the sign of the one-sided error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontierKind {
    /// `ε = v − u`.
    #[default]
    Production,
    /// `ε = v + u`.
    Cost,
}

impl FrontierKind {
    /// `s` in `ε = v − s·u`.
    pub fn sign(self) -> f64 {
        match self {
            FrontierKind::Production => 1.0,
            FrontierKind::Cost => -1.0,
        }
    }
}

impl FromStr for FrontierKind {
    type Err = EfficiencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Ok(FrontierKind::Production),
            "cost" => Ok(FrontierKind::Cost),
            _ => Err(EfficiencyError::InvalidOption {
                name: "frontier",
                value: s.to_string(),
                reason: "expected 'prod' or 'cost'",
            }),
        }
    }
}

/// Technical-efficiency estimator applied to the fitted residuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeMethod {
    /// `exp(−E[u | ε])` (Jondrow et al.).
    #[default]
    Jondrow,
    /// `E[exp(−u) | ε]` (Battese–Coelli).
    BatteseCoelli,
    /// `exp(−M[u | ε])`, the conditional mode.
    Mode,
}

impl FromStr for TeMethod {
    type Err = EfficiencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tej" | "jondrow" | "jlms" => Ok(TeMethod::Jondrow),
            "te" | "bc" | "battese-coelli" => Ok(TeMethod::BatteseCoelli),
            "temod" | "mode" => Ok(TeMethod::Mode),
            _ => Err(EfficiencyError::InvalidOption {
                name: "te_method",
                value: s.to_string(),
                reason: "expected 'teJ', 'te' or 'teMod'",
            }),
        }
    }
}

/// SFA configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SfaOptions {
    pub frontier: FrontierKind,
    pub te_method: TeMethod,
    pub threshold: f64,
    pub score_column: String,
    /// Significance level for the key-variable rule.
    pub alpha: f64,
    pub mle: MLEOptions,
}

impl SfaOptions {
    /// # Errors
    /// [`EfficiencyError::InvalidOption`] when `threshold` is outside `[0, 1]`.
    pub fn new(
        frontier: FrontierKind, te_method: TeMethod, threshold: f64, mle: MLEOptions,
    ) -> EfficiencyResult<Self> {
        validate_threshold(threshold)?;
        Ok(SfaOptions {
            frontier,
            te_method,
            threshold,
            score_column: SFA_SCORE_COLUMN.to_string(),
            alpha: 0.05,
            mle,
        })
    }
}

impl Default for SfaOptions {
    fn default() -> Self {
        SfaOptions {
            frontier: FrontierKind::Production,
            te_method: TeMethod::Jondrow,
            threshold: DEFAULT_THRESHOLD,
            score_column: SFA_SCORE_COLUMN.to_string(),
            alpha: 0.05,
            mle: MLEOptions::default(),
        }
    }
}

/// One or many output fields requested for SFA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSelection {
    Single(String),
    Many(Vec<String>),
}

impl OutputSelection {
    /// Reduce to the single field SFA uses.
    ///
    /// Returns the first field and, when more than one was requested, a
    /// notice describing the truncation.
    ///
    /// # Errors
    /// [`EfficiencyError::Data`] with `EmptyFieldList` for an empty list.
    pub fn into_single(self) -> EfficiencyResult<(String, Option<String>)> {
        match self {
            OutputSelection::Single(field) => Ok((field, None)),
            OutputSelection::Many(mut fields) => {
                if fields.is_empty() {
                    return Err(crate::data::DataError::EmptyFieldList { role: "output" }.into());
                }
                let dropped = fields.split_off(1);
                let first = fields.remove(0);
                let notice = (!dropped.is_empty()).then(|| {
                    format!(
                        "SFA uses a single output; using '{first}' and ignoring {}",
                        dropped.join(", ")
                    )
                });
                Ok((first, notice))
            }
        }
    }
}

impl From<&str> for OutputSelection {
    fn from(s: &str) -> Self {
        OutputSelection::Single(s.to_string())
    }
}

impl From<Vec<String>> for OutputSelection {
    fn from(v: Vec<String>) -> Self {
        OutputSelection::Many(v)
    }
}

impl From<&[&str]> for OutputSelection {
    fn from(v: &[&str]) -> Self {
        OutputSelection::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

// ---- Method choice ----

/// Which estimator produces a derived efficiency score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfficiencyMethod {
    Dea,
    Sfa,
}

impl EfficiencyMethod {
    /// Label used in reports (`"DEA"` / `"SFA"`).
    pub fn label(self) -> &'static str {
        match self {
            EfficiencyMethod::Dea => "DEA",
            EfficiencyMethod::Sfa => "SFA",
        }
    }

    pub fn score_column(self) -> &'static str {
        match self {
            EfficiencyMethod::Dea => DEA_SCORE_COLUMN,
            EfficiencyMethod::Sfa => SFA_SCORE_COLUMN,
        }
    }
}

impl FromStr for EfficiencyMethod {
    type Err = EfficiencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEA" => Ok(EfficiencyMethod::Dea),
            "SFA" => Ok(EfficiencyMethod::Sfa),
            _ => Err(EfficiencyError::UnknownMethod { name: s.to_string() }),
        }
    }
}
