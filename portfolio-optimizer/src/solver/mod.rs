use log::warn;
use nalgebra::{DMatrix, DVector};
use portfolio_api::model::allocation::Allocation;
use portfolio_api::model::asset::Asset;
use portfolio_api::model::config::{OptimizationConfig, OptimizationMethod};
use thiserror::Error;

pub mod kelly;
pub mod mean_variance;
pub mod risk_parity;

/// Iteration cap shared by the iterative solvers.
pub const MAX_ITERATIONS: usize = 1000;

/// Convergence tolerance on the weight-vector delta.
pub const TOLERANCE: f64 = 1e-8;

/// Weights below this are dropped from the allocation entirely.
const NEGLIGIBLE_WEIGHT: f64 = 0.001;

/// Solver failure, recovered locally via the per-strategy fallback chain.
/// Never surfaced to the caller as an error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("{strategy} did not converge: {reason}")]
    DidNotConverge {
        strategy: &'static str,
        reason: String,
    },
}

/// Per-asset weight bounds for the solver-driven strategies. The upper bound
/// folds the trade limit in: a position can never require more units than the
/// asset allows per period.
pub struct WeightBounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl WeightBounds {
    pub fn from_config(universe: &[Asset], total_capital: f64, config: &OptimizationConfig) -> Self {
        let mut lower = Vec::with_capacity(universe.len());
        let mut upper = Vec::with_capacity(universe.len());
        for asset in universe {
            let limit_weight = asset.trade_limit() * asset.price() / total_capital;
            let hi = config.max_position_size().min(limit_weight);
            lower.push(config.min_position_size().min(hi));
            upper.push(hi);
        }
        Self { lower, upper }
    }

    pub fn lower(&self, i: usize) -> f64 {
        self.lower[i]
    }

    pub fn upper(&self, i: usize) -> f64 {
        self.upper[i]
    }

    /// Clamps into the box, then redistributes toward a full budget without
    /// leaving the box. If the box cannot hold a sum of 1 the remainder stays
    /// unallocated and ends up as cash reserve.
    pub fn project(&self, mut w: DVector<f64>) -> DVector<f64> {
        let n = w.len();
        for i in 0..n {
            w[i] = w[i].clamp(self.lower[i], self.upper[i]);
        }
        for _ in 0..100 {
            let deficit = 1.0 - w.sum();
            if deficit.abs() < 1e-9 {
                break;
            }
            if deficit > 0.0 {
                let headroom: f64 = (0..n).map(|i| self.upper[i] - w[i]).sum();
                if headroom <= 1e-12 {
                    break;
                }
                for i in 0..n {
                    w[i] += deficit * (self.upper[i] - w[i]) / headroom;
                }
            } else {
                let slack: f64 = (0..n).map(|i| w[i] - self.lower[i]).sum();
                if slack <= 1e-12 {
                    break;
                }
                for i in 0..n {
                    w[i] += deficit * (w[i] - self.lower[i]) / slack;
                }
            }
            for i in 0..n {
                w[i] = w[i].clamp(self.lower[i], self.upper[i]);
            }
        }
        w
    }
}

/// Ideal (pre-quantization) weights plus an optional degradation note when a
/// fallback was applied.
pub struct SolvedWeights {
    pub weights: DVector<f64>,
    pub note: Option<String>,
}

pub fn equal_weights(n: usize) -> DVector<f64> {
    DVector::from_element(n, 1.0 / n as f64)
}

/// Runs the selected strategy with its documented fallback chain:
/// mean-variance falls back to risk parity, risk parity and Kelly fall back
/// to equal weight. Fallbacks are deterministic and logged as warnings.
pub fn solve(
    method: OptimizationMethod,
    universe: &[Asset],
    sigma: &DMatrix<f64>,
    total_capital: f64,
    config: &OptimizationConfig,
) -> SolvedWeights {
    let bounds = WeightBounds::from_config(universe, total_capital, config);
    match method {
        OptimizationMethod::EqualWeight => SolvedWeights {
            weights: equal_weights(universe.len()),
            note: None,
        },
        OptimizationMethod::RiskParity => match risk_parity::optimize(sigma, &bounds) {
            Ok(weights) => SolvedWeights {
                weights,
                note: None,
            },
            Err(e) => {
                warn!("{e}; falling back to equal weight");
                SolvedWeights {
                    weights: equal_weights(universe.len()),
                    note: Some("risk_parity fell back to equal_weight".to_string()),
                }
            }
        },
        OptimizationMethod::MeanVariance => {
            let returns =
                DVector::from_iterator(universe.len(), universe.iter().map(|a| a.expected_return()));
            match mean_variance::optimize(sigma, &returns, &bounds) {
                Ok(weights) => SolvedWeights {
                    weights,
                    note: None,
                },
                Err(e) => {
                    warn!("{e}; falling back to risk parity");
                    match risk_parity::optimize(sigma, &bounds) {
                        Ok(weights) => SolvedWeights {
                            weights,
                            note: Some("mean_variance fell back to risk_parity".to_string()),
                        },
                        Err(e) => {
                            warn!("{e}; falling back to equal weight");
                            SolvedWeights {
                                weights: equal_weights(universe.len()),
                                note: Some(
                                    "mean_variance fell back to equal_weight".to_string(),
                                ),
                            }
                        }
                    }
                }
            }
        }
        OptimizationMethod::Kelly => match kelly::optimize(universe, config) {
            Some(weights) => SolvedWeights {
                weights,
                note: None,
            },
            None => {
                warn!("no asset has a positive Kelly weight; falling back to equal weight");
                SolvedWeights {
                    weights: equal_weights(universe.len()),
                    note: Some("kelly fell back to equal_weight".to_string()),
                }
            }
        },
    }
}

/// Shared post-processing: quantizes ideal weights into whole units and
/// recomputes the achievable weight per asset. Quantization drift is expected
/// and tolerated, never treated as an error.
pub fn build_allocations(
    universe: &[Asset],
    weights: &DVector<f64>,
    sigma: &DMatrix<f64>,
    total_capital: f64,
) -> Vec<Allocation> {
    let sigma_w = sigma * weights;
    let portfolio_vol = weights.dot(&sigma_w).max(0.0).sqrt();

    let mut allocations = Vec::new();
    for (i, asset) in universe.iter().enumerate() {
        let w = weights[i];
        if w < NEGLIGIBLE_WEIGHT {
            continue;
        }
        let target_amount = (w * total_capital).round();
        let target_quantity = (target_amount / asset.price()).floor().max(1.0);
        let actual_weight = target_quantity * asset.price() / total_capital;
        let risk_contribution = if portfolio_vol > 0.0 {
            w * sigma_w[i] / portfolio_vol
        } else {
            0.0
        };
        let trade_limit_utilization = if asset.trade_limit() > 0.0 {
            target_quantity / asset.trade_limit()
        } else {
            0.0
        };
        allocations.push(Allocation::new(
            asset.id(),
            actual_weight,
            target_amount,
            target_quantity,
            risk_contribution,
            asset.liquidity_score(),
            trade_limit_utilization,
        ));
    }
    allocations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covariance::{CovarianceModel, SimilarityCovariance};
    use portfolio_api::model::asset::PredictionTrend;

    pub(crate) fn asset(id: usize, price: f64, er: f64, risk: f64) -> Asset {
        Asset::new(
            id,
            format!("asset-{id}"),
            price,
            er,
            risk,
            0.9,
            1_000_000.0,
            PredictionTrend::Bullish,
            0.8,
        )
    }

    #[test]
    fn test_equal_weight_is_exact() {
        let w = equal_weights(4);
        for i in 0..4 {
            assert_eq!(w[i], 0.25);
        }
    }

    #[test]
    fn test_bounds_fold_in_trade_limit() {
        // 50 units max at price 100 against 100k capital: cap at 5%.
        let tight = Asset::new(
            1,
            "thin",
            100.0,
            0.05,
            30.0,
            0.9,
            50.0,
            PredictionTrend::Neutral,
            0.5,
        );
        let bounds =
            WeightBounds::from_config(&[tight], 100_000.0, &OptimizationConfig::default());
        assert!((bounds.upper(0) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_projection_respects_box_and_budget() {
        let universe: Vec<Asset> = (0..5).map(|i| asset(i, 100.0, 0.05, 30.0)).collect();
        let bounds =
            WeightBounds::from_config(&universe, 100_000.0, &OptimizationConfig::default());
        let skewed = DVector::from_vec(vec![0.9, 0.05, 0.03, 0.01, 0.01]);
        let w = bounds.project(skewed);
        for i in 0..5 {
            assert!(w[i] <= bounds.upper(i) + 1e-9);
            assert!(w[i] >= bounds.lower(i) - 1e-9);
        }
        assert!((w.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible_budget_leaves_cash() {
        // 3 assets capped at 25% each cannot absorb the full budget.
        let universe: Vec<Asset> = (0..3).map(|i| asset(i, 100.0, 0.05, 30.0)).collect();
        let bounds =
            WeightBounds::from_config(&universe, 100_000.0, &OptimizationConfig::default());
        let w = bounds.project(equal_weights(3));
        assert!((w.sum() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_quantization_recomputes_weight() {
        let universe = vec![asset(1, 1000.0, 0.05, 20.0), asset(2, 2000.0, 0.03, 50.0), asset(3, 500.0, 0.08, 80.0)];
        let sigma = SimilarityCovariance.covariance(&universe);
        let allocations =
            build_allocations(&universe, &equal_weights(3), &sigma, 100_000.0);
        assert_eq!(allocations.len(), 3);
        // floor(33333 / 1000) = 33 units -> 33% becomes 33 * 1000 / 100000.
        assert_eq!(allocations[0].target_quantity(), 33.0);
        assert!((allocations[0].target_weight() - 0.33).abs() < 1e-12);
    }

    #[test]
    fn test_negligible_weights_are_dropped() {
        let universe = vec![asset(1, 100.0, 0.05, 20.0), asset(2, 100.0, 0.05, 20.0), asset(3, 100.0, 0.05, 20.0)];
        let sigma = SimilarityCovariance.covariance(&universe);
        let weights = DVector::from_vec(vec![0.9995, 0.0005, 0.0]);
        let allocations = build_allocations(&universe, &weights, &sigma, 100_000.0);
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].asset_id(), 1);
    }
}
