use crate::error::FetchError;
use crate::model::asset::{Asset, AssetId};
use async_trait::async_trait;

/// Per-asset lookup used by the bounded-concurrency gather stage.
///
/// A failed lookup drops that single asset from the universe; it must never
/// abort the batch or substitute a guessed score.
#[async_trait]
pub trait AssetDataProvider: Send + Sync {
    async fn load(&self, id: AssetId) -> Result<Asset, FetchError>;
}
