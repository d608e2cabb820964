use super::asset::AssetId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// High-priority actions concern positions above 10% of the portfolio and
/// should execute before the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPriority {
    High,
    Medium,
}

/// A concrete trade needed to move the current holdings to the target
/// allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceAction {
    asset_id: AssetId,
    direction: TradeDirection,
    quantity: f64,
    estimated_value: f64,
    priority: ActionPriority,
}

impl RebalanceAction {
    pub fn new(
        asset_id: AssetId,
        direction: TradeDirection,
        quantity: f64,
        estimated_value: f64,
        priority: ActionPriority,
    ) -> Self {
        Self {
            asset_id,
            direction,
            quantity,
            estimated_value,
            priority,
        }
    }

    pub fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    pub fn direction(&self) -> TradeDirection {
        self.direction
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn estimated_value(&self) -> f64 {
        self.estimated_value
    }

    pub fn priority(&self) -> ActionPriority {
        self.priority
    }
}
