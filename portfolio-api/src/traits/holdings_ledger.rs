use crate::error::FetchError;
use crate::model::holding::Holding;
use async_trait::async_trait;

/// Source of the caller's current positions.
#[async_trait]
pub trait HoldingsLedger: Send + Sync {
    async fn current(&self, user_id: &str) -> Result<Vec<Holding>, FetchError>;
}
