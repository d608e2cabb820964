use serde::{Deserialize, Serialize};

pub type AssetId = usize;

/// Directional prediction supplied by the upstream intelligence services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionTrend {
    Bullish,
    Neutral,
    Bearish,
}

/// Immutable per-call snapshot of a tradable asset.
///
/// All scored fields (expected return, risk, liquidity, prediction) are
/// computed by external services before the snapshot reaches the optimizer;
/// this crate never derives them from raw price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    id: AssetId,
    name: String,
    /// Unit price. Must be positive.
    price: f64,
    /// Expected fractional return per period (0.05 = 5%).
    expected_return: f64,
    /// Risk score on a 0-100 scale, higher is riskier.
    risk_score: f64,
    /// Liquidity score in [0, 1].
    liquidity_score: f64,
    /// Maximum tradable quantity per period.
    trade_limit: f64,
    prediction_trend: PredictionTrend,
    /// Confidence of the prediction in [0, 1].
    prediction_confidence: f64,
}

impl Asset {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: AssetId,
        name: impl Into<String>,
        price: f64,
        expected_return: f64,
        risk_score: f64,
        liquidity_score: f64,
        trade_limit: f64,
        prediction_trend: PredictionTrend,
        prediction_confidence: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            expected_return,
            risk_score,
            liquidity_score,
            trade_limit,
            prediction_trend,
            prediction_confidence,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn expected_return(&self) -> f64 {
        self.expected_return
    }

    pub fn risk_score(&self) -> f64 {
        self.risk_score
    }

    pub fn liquidity_score(&self) -> f64 {
        self.liquidity_score
    }

    pub fn trade_limit(&self) -> f64 {
        self.trade_limit
    }

    pub fn prediction_trend(&self) -> PredictionTrend {
        self.prediction_trend
    }

    pub fn prediction_confidence(&self) -> f64 {
        self.prediction_confidence
    }

    /// Volatility proxy derived from the risk score. The floor keeps
    /// zero-risk assets from producing a zero-variance row in Σ.
    pub fn volatility(&self) -> f64 {
        self.risk_score / 1000.0 + 0.01
    }
}
