pub mod covariance;
pub mod engine;
pub mod fetch;
pub mod io;
pub mod metrics;
pub mod rebalance;
pub mod solver;
pub mod universe;

pub use covariance::{CovarianceModel, SimilarityCovariance};
pub use engine::OptimizationEngine;
