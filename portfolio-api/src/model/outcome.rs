use super::allocation::Allocation;
use super::asset::AssetId;
use super::metrics::PortfolioMetrics;
use super::rebalance::RebalanceAction;
use serde::{Deserialize, Serialize};

/// Capital-level summary of an optimization result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Capital committed to positions after quantization.
    pub allocated_capital: f64,
    /// Capital left unallocated (quantization remainder plus any deliberate
    /// under-allocation, e.g. partial Kelly sizing).
    pub cash_reserve: f64,
    /// Diversification ratio of the final weights.
    pub diversification_score: f64,
    /// Portfolio risk relative to the advisory `max_portfolio_risk` target,
    /// scaled to 0-100 and capped.
    pub risk_score: f64,
    /// Set when a solver fell back to a simpler strategy; callers surface
    /// this as a degradation note, never as a failure.
    pub strategy_note: Option<String>,
}

/// Record of the data-gathering fan-out: which candidates were requested,
/// which resolved, and which were dropped with the reason. A dropped asset is
/// never silently replaced by a guessed score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UniverseReport {
    pub requested: usize,
    pub resolved: usize,
    pub dropped: Vec<(AssetId, String)>,
}

impl UniverseReport {
    pub fn is_degraded(&self) -> bool {
        !self.dropped.is_empty()
    }
}

/// Full result of one optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    pub allocations: Vec<Allocation>,
    pub metrics: PortfolioMetrics,
    pub actions: Vec<RebalanceAction>,
    pub summary: PortfolioSummary,
}
