pub mod asset_repository;
pub mod data_provider;
pub mod holdings_ledger;
