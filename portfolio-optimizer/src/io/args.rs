use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a JSON snapshot file with assets, holdings and config
    #[arg(long)]
    pub snapshot: String,

    /// Available capital in whole currency units
    #[arg(long, default_value_t = 100_000)]
    pub capital: i64,

    /// Optimization method override (risk_parity, mean_variance, kelly,
    /// equal_weight)
    #[arg(long)]
    pub method: Option<String>,

    /// User whose holdings are loaded from the snapshot
    #[arg(long, default_value = "default")]
    pub user: String,

    /// Fan-out width for per-asset data gathering
    #[arg(long, default_value_t = crate::fetch::DEFAULT_FETCH_WIDTH)]
    pub fetch_width: usize,
}
