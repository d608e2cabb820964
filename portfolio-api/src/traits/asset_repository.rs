use crate::error::FetchError;
use crate::model::asset::Asset;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Selection criteria for candidate discovery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateCriteria {
    /// Lower price bound, if any.
    pub min_price: Option<f64>,
    /// Upper price bound, if any.
    pub max_price: Option<f64>,
    /// Minimum liquidity score, if any.
    pub min_liquidity: Option<f64>,
    /// Cap on the number of candidates returned.
    pub limit: Option<usize>,
}

/// Source of candidate assets with profit/risk/liquidity/prediction fields
/// already computed upstream. The optimizer core never touches a database;
/// it only consumes typed snapshots from this seam.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn fetch_candidates(&self, criteria: &CandidateCriteria)
        -> Result<Vec<Asset>, FetchError>;
}
