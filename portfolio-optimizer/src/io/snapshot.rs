use async_trait::async_trait;
use portfolio_api::error::FetchError;
use portfolio_api::model::asset::{Asset, AssetId};
use portfolio_api::model::config::OptimizationConfig;
use portfolio_api::model::holding::Holding;
use portfolio_api::traits::asset_repository::{AssetRepository, CandidateCriteria};
use portfolio_api::traits::data_provider::AssetDataProvider;
use portfolio_api::traits::holdings_ledger::HoldingsLedger;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// On-disk snapshot consumed by the demo binary: a full asset universe plus
/// per-user holdings.
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub holdings: HashMap<String, Vec<Holding>>,
    #[serde(default)]
    pub config: Option<OptimizationConfig>,
}

impl Snapshot {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Snapshot-backed repository for local runs; the production deployment
/// substitutes a service-backed implementation behind the same trait.
pub struct SnapshotRepository {
    assets: Vec<Asset>,
}

impl SnapshotRepository {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }
}

#[async_trait]
impl AssetRepository for SnapshotRepository {
    async fn fetch_candidates(
        &self,
        criteria: &CandidateCriteria,
    ) -> Result<Vec<Asset>, FetchError> {
        let mut matched: Vec<Asset> = self
            .assets
            .iter()
            .filter(|a| criteria.min_price.map_or(true, |min| a.price() >= min))
            .filter(|a| criteria.max_price.map_or(true, |max| a.price() <= max))
            .filter(|a| {
                criteria
                    .min_liquidity
                    .map_or(true, |min| a.liquidity_score() >= min)
            })
            .cloned()
            .collect();
        if let Some(limit) = criteria.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }
}

#[async_trait]
impl AssetDataProvider for SnapshotRepository {
    async fn load(&self, id: AssetId) -> Result<Asset, FetchError> {
        self.assets
            .iter()
            .find(|a| a.id() == id)
            .cloned()
            .ok_or(FetchError::NotFound(id))
    }
}

/// Snapshot-backed holdings ledger keyed by user id. Unknown users hold
/// nothing.
pub struct SnapshotLedger {
    holdings: HashMap<String, Vec<Holding>>,
}

impl SnapshotLedger {
    pub fn new(holdings: HashMap<String, Vec<Holding>>) -> Self {
        Self { holdings }
    }
}

#[async_trait]
impl HoldingsLedger for SnapshotLedger {
    async fn current(&self, user_id: &str) -> Result<Vec<Holding>, FetchError> {
        Ok(self.holdings.get(user_id).cloned().unwrap_or_default())
    }
}
