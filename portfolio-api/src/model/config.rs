use crate::error::OptimizationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn default_method() -> String {
    OptimizationMethod::RiskParity.to_string()
}

fn default_max_position_size() -> f64 {
    0.25
}

fn default_min_position_size() -> f64 {
    0.01
}

fn default_max_portfolio_risk() -> f64 {
    0.20
}

fn default_rebalance_threshold() -> f64 {
    0.05
}

fn default_kelly_fraction() -> f64 {
    0.25
}

fn default_max_kelly_position() -> f64 {
    0.20
}

/// Allocation strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationMethod {
    RiskParity,
    MeanVariance,
    Kelly,
    EqualWeight,
}

impl fmt::Display for OptimizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OptimizationMethod::RiskParity => "risk_parity",
            OptimizationMethod::MeanVariance => "mean_variance",
            OptimizationMethod::Kelly => "kelly",
            OptimizationMethod::EqualWeight => "equal_weight",
        };
        f.write_str(s)
    }
}

impl FromStr for OptimizationMethod {
    type Err = OptimizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "risk_parity" => Ok(OptimizationMethod::RiskParity),
            "mean_variance" => Ok(OptimizationMethod::MeanVariance),
            "kelly" => Ok(OptimizationMethod::Kelly),
            "equal_weight" => Ok(OptimizationMethod::EqualWeight),
            other => Err(OptimizationError::UnknownOptimizationMethod(
                other.to_string(),
            )),
        }
    }
}

/// Per-call optimizer configuration. Every field has a default, so callers
/// override only the subset they care about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Strategy name. Kept as a string so an invalid caller-supplied value
    /// surfaces as `UnknownOptimizationMethod` at call time rather than at
    /// deserialization.
    #[serde(default = "default_method")]
    method: String,
    /// Maximum weight per asset (0.0 to 1.0].
    #[serde(default = "default_max_position_size")]
    max_position_size: f64,
    /// Minimum weight per asset for the solver-driven strategies.
    #[serde(default = "default_min_position_size")]
    min_position_size: f64,
    /// Advisory portfolio risk target. Not hard-enforced by the solver.
    #[serde(default = "default_max_portfolio_risk")]
    max_portfolio_risk: f64,
    /// Weight drift that should trigger a rebalance.
    #[serde(default = "default_rebalance_threshold")]
    rebalance_threshold: f64,
    /// Fractional-Kelly scaling (0.25 = quarter Kelly).
    #[serde(default = "default_kelly_fraction")]
    kelly_fraction: f64,
    /// Cap on any single Kelly-sized position.
    #[serde(default = "default_max_kelly_position")]
    max_kelly_position: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            max_position_size: default_max_position_size(),
            min_position_size: default_min_position_size(),
            max_portfolio_risk: default_max_portfolio_risk(),
            rebalance_threshold: default_rebalance_threshold(),
            kelly_fraction: default_kelly_fraction(),
            max_kelly_position: default_max_kelly_position(),
        }
    }
}

impl OptimizationConfig {
    pub fn with_method(mut self, method: OptimizationMethod) -> Self {
        self.method = method.to_string();
        self
    }

    pub fn with_method_str(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_max_position_size(mut self, max: f64) -> Self {
        self.max_position_size = max;
        self
    }

    pub fn with_min_position_size(mut self, min: f64) -> Self {
        self.min_position_size = min;
        self
    }

    pub fn with_kelly_fraction(mut self, fraction: f64) -> Self {
        self.kelly_fraction = fraction;
        self
    }

    pub fn with_max_kelly_position(mut self, max: f64) -> Self {
        self.max_kelly_position = max;
        self
    }

    /// Parses the configured method string.
    pub fn method(&self) -> Result<OptimizationMethod, OptimizationError> {
        self.method.parse()
    }

    pub fn method_str(&self) -> &str {
        &self.method
    }

    pub fn max_position_size(&self) -> f64 {
        self.max_position_size
    }

    pub fn min_position_size(&self) -> f64 {
        self.min_position_size
    }

    pub fn max_portfolio_risk(&self) -> f64 {
        self.max_portfolio_risk
    }

    pub fn rebalance_threshold(&self) -> f64 {
        self.rebalance_threshold
    }

    pub fn kelly_fraction(&self) -> f64 {
        self.kelly_fraction
    }

    pub fn max_kelly_position(&self) -> f64 {
        self.max_kelly_position
    }
}
