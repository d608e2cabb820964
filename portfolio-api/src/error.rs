use crate::model::asset::AssetId;
use thiserror::Error;

/// Minimum number of assets the optimizer needs after filtering.
pub const MIN_UNIVERSE_SIZE: usize = 3;

/// Fatal errors crossing the public optimization boundary.
///
/// Recoverable degradations (solver non-convergence, per-asset fetch
/// failures) never appear here; they are absorbed inside the engine and
/// reflected in the outcome summary or universe report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizationError {
    #[error("insufficient universe: {0} usable assets after filtering, need at least {MIN_UNIVERSE_SIZE}")]
    InsufficientUniverse(usize),

    #[error("unknown optimization method: {0}")]
    UnknownOptimizationMethod(String),

    #[error("invalid capital: {0} (must be positive)")]
    InvalidCapital(i64),
}

/// Per-asset failure during the data-gathering fan-out. The affected asset is
/// dropped from the universe; the batch continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("asset {0} not found")]
    NotFound(AssetId),

    #[error("lookup for asset {id} failed: {reason}")]
    Unavailable { id: AssetId, reason: String },

    #[error("lookup for asset {0} timed out")]
    Timeout(AssetId),
}

impl FetchError {
    pub fn asset_id(&self) -> AssetId {
        match self {
            FetchError::NotFound(id) => *id,
            FetchError::Unavailable { id, .. } => *id,
            FetchError::Timeout(id) => *id,
        }
    }
}
