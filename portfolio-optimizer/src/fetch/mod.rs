use futures::stream::{self, StreamExt};
use log::{debug, warn};
use portfolio_api::model::asset::{Asset, AssetId};
use portfolio_api::model::outcome::UniverseReport;
use portfolio_api::traits::data_provider::AssetDataProvider;

/// Default fan-out width for per-asset lookups.
pub const DEFAULT_FETCH_WIDTH: usize = 20;

/// Assembles asset snapshots from the provider with a bounded-concurrency
/// fan-out. A slow or failing lookup affects only its own asset: failures are
/// recorded in the report and the batch continues. Results are re-sorted by
/// id so completion order never leaks into the output.
pub async fn gather_universe(
    provider: &dyn AssetDataProvider,
    ids: &[AssetId],
    width: usize,
) -> (Vec<Asset>, UniverseReport) {
    let width = width.max(1);
    let results: Vec<(AssetId, Result<Asset, _>)> = stream::iter(ids.iter().copied())
        .map(|id| async move { (id, provider.load(id).await) })
        .buffer_unordered(width)
        .collect()
        .await;

    let mut assets = Vec::new();
    let mut dropped = Vec::new();
    for (id, result) in results {
        match result {
            Ok(asset) => {
                debug!("resolved asset {id}");
                assets.push(asset);
            }
            Err(e) => {
                warn!("dropping asset {id} from universe: {e}");
                dropped.push((id, e.to_string()));
            }
        }
    }
    assets.sort_by_key(|a| a.id());
    dropped.sort_by_key(|(id, _)| *id);

    let report = UniverseReport {
        requested: ids.len(),
        resolved: assets.len(),
        dropped,
    };
    (assets, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use portfolio_api::error::FetchError;
    use portfolio_api::model::asset::PredictionTrend;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyProvider {
        fail_ids: Vec<AssetId>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl FlakyProvider {
        fn new(fail_ids: Vec<AssetId>) -> Self {
            Self {
                fail_ids,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AssetDataProvider for FlakyProvider {
        async fn load(&self, id: AssetId) -> Result<Asset, FetchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_ids.contains(&id) {
                return Err(FetchError::Unavailable {
                    id,
                    reason: "provider outage".to_string(),
                });
            }
            Ok(Asset::new(
                id,
                format!("asset-{id}"),
                100.0,
                0.05,
                30.0,
                0.9,
                1000.0,
                PredictionTrend::Neutral,
                0.5,
            ))
        }
    }

    #[tokio::test]
    async fn test_failures_drop_only_their_asset() {
        let provider = FlakyProvider::new(vec![2, 4]);
        let ids: Vec<AssetId> = (1..=6).collect();
        let (assets, report) = gather_universe(&provider, &ids, 3).await;

        assert_eq!(assets.len(), 4);
        assert_eq!(report.requested, 6);
        assert_eq!(report.resolved, 4);
        assert_eq!(report.dropped.len(), 2);
        assert!(report.is_degraded());
        assert_eq!(report.dropped[0].0, 2);
        assert_eq!(report.dropped[1].0, 4);
    }

    #[tokio::test]
    async fn test_output_is_sorted_by_id() {
        let provider = FlakyProvider::new(vec![]);
        let ids: Vec<AssetId> = vec![5, 1, 9, 3, 7];
        let (assets, report) = gather_universe(&provider, &ids, 2).await;
        let out: Vec<AssetId> = assets.iter().map(|a| a.id()).collect();
        assert_eq!(out, vec![1, 3, 5, 7, 9]);
        assert!(!report.is_degraded());
    }

    #[tokio::test]
    async fn test_width_bounds_concurrency() {
        let provider = FlakyProvider::new(vec![]);
        let ids: Vec<AssetId> = (1..=40).collect();
        let (_, report) = gather_universe(&provider, &ids, 4).await;
        assert_eq!(report.resolved, 40);
        assert!(provider.peak.load(Ordering::SeqCst) <= 4);
    }
}
