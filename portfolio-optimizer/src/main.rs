use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use portfolio_api::model::asset::AssetId;
use portfolio_api::traits::holdings_ledger::HoldingsLedger;
use portfolio_optimizer::io::args::Args;
use portfolio_optimizer::io::snapshot::{Snapshot, SnapshotLedger, SnapshotRepository};
use portfolio_optimizer::{fetch, OptimizationEngine};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let snapshot = Snapshot::load(&args.snapshot)?;
    info!(
        "loaded snapshot with {} assets at {}",
        snapshot.assets.len(),
        chrono::Utc::now().to_rfc3339()
    );

    let mut config = snapshot.config.clone().unwrap_or_default();
    if let Some(method) = &args.method {
        config = config.with_method_str(method.clone());
    }

    let candidate_ids: Vec<AssetId> = snapshot.assets.iter().map(|a| a.id()).collect();
    let repository = SnapshotRepository::new(snapshot.assets);
    let ledger = SnapshotLedger::new(snapshot.holdings);

    let (assets, report) =
        fetch::gather_universe(&repository, &candidate_ids, args.fetch_width).await;
    if report.is_degraded() {
        warn!(
            "universe degraded: {} of {} candidates resolved",
            report.resolved, report.requested
        );
    }

    let holdings = ledger.current(&args.user).await?;
    let engine = OptimizationEngine::new();
    let outcome = engine.optimize(&assets, &holdings, args.capital, &config)?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
