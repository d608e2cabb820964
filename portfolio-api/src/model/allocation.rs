use super::asset::AssetId;
use serde::{Deserialize, Serialize};

/// Target position for a single asset, produced by the allocation optimizer.
///
/// `target_weight` is the post-quantization weight actually achievable with
/// whole units; it may drift slightly below the solver's ideal weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    asset_id: AssetId,
    target_weight: f64,
    target_amount: f64,
    target_quantity: f64,
    risk_contribution: f64,
    liquidity_score: f64,
    trade_limit_utilization: f64,
}

impl Allocation {
    pub fn new(
        asset_id: AssetId,
        target_weight: f64,
        target_amount: f64,
        target_quantity: f64,
        risk_contribution: f64,
        liquidity_score: f64,
        trade_limit_utilization: f64,
    ) -> Self {
        Self {
            asset_id,
            target_weight,
            target_amount,
            target_quantity,
            risk_contribution,
            liquidity_score,
            trade_limit_utilization,
        }
    }

    pub fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    pub fn target_weight(&self) -> f64 {
        self.target_weight
    }

    pub fn target_amount(&self) -> f64 {
        self.target_amount
    }

    pub fn target_quantity(&self) -> f64 {
        self.target_quantity
    }

    pub fn risk_contribution(&self) -> f64 {
        self.risk_contribution
    }

    pub fn liquidity_score(&self) -> f64 {
        self.liquidity_score
    }

    pub fn trade_limit_utilization(&self) -> f64 {
        self.trade_limit_utilization
    }
}
