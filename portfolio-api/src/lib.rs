pub mod error;
pub mod model;
pub mod traits;

pub use error::{FetchError, OptimizationError};
pub use model::allocation::Allocation;
pub use model::asset::{Asset, AssetId, PredictionTrend};
pub use model::config::{OptimizationConfig, OptimizationMethod};
pub use model::holding::Holding;
pub use model::metrics::PortfolioMetrics;
pub use model::outcome::{OptimizationOutcome, PortfolioSummary, UniverseReport};
pub use model::rebalance::{ActionPriority, RebalanceAction, TradeDirection};
pub use traits::asset_repository::{AssetRepository, CandidateCriteria};
pub use traits::data_provider::AssetDataProvider;
pub use traits::holdings_ledger::HoldingsLedger;
