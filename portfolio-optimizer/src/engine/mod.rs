use crate::covariance::{CovarianceModel, SimilarityCovariance};
use crate::{metrics, rebalance, solver, universe};
use anyhow::Context;
use log::info;
use nalgebra::DVector;
use portfolio_api::error::OptimizationError;
use portfolio_api::model::asset::Asset;
use portfolio_api::model::config::OptimizationConfig;
use portfolio_api::model::holding::Holding;
use portfolio_api::model::outcome::{OptimizationOutcome, PortfolioSummary};
use portfolio_api::traits::asset_repository::{AssetRepository, CandidateCriteria};
use portfolio_api::traits::holdings_ledger::HoldingsLedger;
use std::collections::HashMap;


/// One-shot portfolio optimization pipeline: filter, covariance, solve,
/// metrics, rebalance actions.
///
/// The engine holds only immutable defaults and a covariance model; every
/// call operates on its own snapshot, so independent calls can run fully in
/// parallel without locks.
pub struct OptimizationEngine {
    defaults: OptimizationConfig,
    covariance: Box<dyn CovarianceModel>,
}

impl Default for OptimizationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimizationEngine {
    pub fn new() -> Self {
        Self {
            defaults: OptimizationConfig::default(),
            covariance: Box::new(SimilarityCovariance),
        }
    }

    pub fn with_defaults(mut self, defaults: OptimizationConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Swaps the covariance estimator. The default similarity heuristic is a
    /// documented approximation; deployments with historical return series
    /// can inject a real estimator here.
    pub fn with_covariance_model(mut self, model: Box<dyn CovarianceModel>) -> Self {
        self.covariance = model;
        self
    }

    pub fn defaults(&self) -> &OptimizationConfig {
        &self.defaults
    }

    /// Runs the full pipeline over an immutable snapshot.
    ///
    /// Only three error kinds terminate a call: invalid capital, an unknown
    /// method string, and an insufficient universe. Solver non-convergence is
    /// absorbed via the per-strategy fallback and noted in the summary.
    pub fn optimize(
        &self,
        assets: &[Asset],
        holdings: &[Holding],
        total_capital: i64,
        config: &OptimizationConfig,
    ) -> Result<OptimizationOutcome, OptimizationError> {
        if total_capital <= 0 {
            return Err(OptimizationError::InvalidCapital(total_capital));
        }
        let method = config.method()?;
        let capital = total_capital as f64;

        let investable = universe::filter_universe(assets)?;
        info!(
            "optimizing {} of {} candidates with {} over capital {}",
            investable.len(),
            assets.len(),
            method,
            total_capital
        );

        let sigma = self.covariance.covariance(&investable);
        let solved = solver::solve(method, &investable, &sigma, capital, config);
        let allocations = solver::build_allocations(&investable, &solved.weights, &sigma, capital);

        // Metrics run over the achievable (quantized) weights.
        let achieved: HashMap<usize, f64> = allocations
            .iter()
            .map(|a| (a.asset_id(), a.target_weight()))
            .collect();
        let actual_weights = DVector::from_iterator(
            investable.len(),
            investable
                .iter()
                .map(|a| achieved.get(&a.id()).copied().unwrap_or(0.0)),
        );
        let portfolio_metrics = metrics::calculate(&investable, &actual_weights, &sigma, &allocations);

        let actions = rebalance::generate(&allocations, holdings, assets);

        let prices: HashMap<usize, f64> = investable.iter().map(|a| (a.id(), a.price())).collect();
        let allocated_capital: f64 = allocations
            .iter()
            .map(|a| a.target_quantity() * prices.get(&a.asset_id()).copied().unwrap_or(0.0))
            .sum();
        let risk_score = if config.max_portfolio_risk() > 0.0 {
            (portfolio_metrics.portfolio_risk / config.max_portfolio_risk() * 100.0).min(100.0)
        } else {
            0.0
        };

        if let Some(note) = &solved.note {
            info!("degraded strategy: {note}");
        }

        Ok(OptimizationOutcome {
            metrics: portfolio_metrics.clone(),
            actions,
            summary: PortfolioSummary {
                allocated_capital,
                cash_reserve: capital - allocated_capital,
                diversification_score: portfolio_metrics.diversification_ratio,
                risk_score,
                strategy_note: solved.note,
            },
            allocations,
        })
    }

    /// Convenience entry point wiring the external collaborators: fetches
    /// candidates and current holdings, then optimizes. Collaborator
    /// failures surface with context; optimization errors pass through.
    pub async fn optimize_for_user(
        &self,
        repository: &dyn AssetRepository,
        ledger: &dyn HoldingsLedger,
        user_id: &str,
        criteria: &CandidateCriteria,
        total_capital: i64,
        config: Option<&OptimizationConfig>,
    ) -> anyhow::Result<OptimizationOutcome> {
        let assets = repository
            .fetch_candidates(criteria)
            .await
            .context("fetching candidate assets")?;
        let holdings = ledger
            .current(user_id)
            .await
            .with_context(|| format!("fetching holdings for {user_id}"))?;
        let config = config.unwrap_or(&self.defaults);
        Ok(self.optimize(&assets, &holdings, total_capital, config)?)
    }
}
