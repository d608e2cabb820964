use serde::{Deserialize, Serialize};

/// Risk/return statistics derived from the final weight vector.
///
/// The Sortino ratio uses `portfolio_risk / 2` as its downside proxy rather
/// than a true downside deviation; this is documented, retained behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_value: f64,
    pub expected_return: f64,
    pub portfolio_risk: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub diversification_ratio: f64,
    pub liquidity_score: f64,
    /// 1.0 when every asset contributes equally to portfolio risk.
    pub risk_parity_score: f64,
}

impl PortfolioMetrics {
    /// Metrics for an empty allocation set: everything zero, no division.
    pub fn empty() -> Self {
        Self::default()
    }
}
