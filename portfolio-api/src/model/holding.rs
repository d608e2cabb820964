use super::asset::AssetId;
use serde::{Deserialize, Serialize};

/// A current position, supplied by the external holdings ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    asset_id: AssetId,
    quantity: f64,
}

impl Holding {
    pub fn new(asset_id: AssetId, quantity: f64) -> Self {
        Self { asset_id, quantity }
    }

    pub fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }
}
