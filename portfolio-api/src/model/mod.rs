pub mod allocation;
pub mod asset;
pub mod config;
pub mod holding;
pub mod metrics;
pub mod outcome;
pub mod rebalance;
