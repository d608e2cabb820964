use log::debug;
use portfolio_api::error::{OptimizationError, MIN_UNIVERSE_SIZE};
use portfolio_api::model::asset::{Asset, PredictionTrend};

/// Suitability threshold below which a candidate is discarded.
const SUITABILITY_FLOOR: f64 = 0.3;

/// Maximum universe size handed to the optimizer.
const MAX_UNIVERSE_SIZE: usize = 20;

/// Composite suitability score: profitability, inverted risk, liquidity and
/// prediction confidence, weighted 30/25/25/20.
pub fn suitability(asset: &Asset) -> f64 {
    0.30 * profit_term(asset.expected_return())
        + 0.25 * (1.0 - asset.risk_score() / 100.0)
        + 0.25 * liquidity_term(asset.liquidity_score())
        + 0.20 * prediction_term(asset)
}

/// Tiered step function over expected return: full credit at 10%+, partial
/// credit at the 5% and 2% marks.
fn profit_term(expected_return: f64) -> f64 {
    if expected_return >= 0.10 {
        1.0
    } else if expected_return >= 0.05 {
        0.7
    } else if expected_return >= 0.02 {
        0.4
    } else {
        0.0
    }
}

fn liquidity_term(liquidity_score: f64) -> f64 {
    if liquidity_score >= 0.8 {
        1.0
    } else if liquidity_score >= 0.6 {
        0.75
    } else if liquidity_score >= 0.4 {
        0.5
    } else if liquidity_score >= 0.2 {
        0.25
    } else {
        0.0
    }
}

/// Prediction credit is only awarded above 60% confidence, weighted by trend
/// direction.
fn prediction_term(asset: &Asset) -> f64 {
    if asset.prediction_confidence() <= 0.6 {
        return 0.0;
    }
    let trend_weight = match asset.prediction_trend() {
        PredictionTrend::Bullish => 1.0,
        PredictionTrend::Neutral => 0.5,
        PredictionTrend::Bearish => 0.1,
    };
    trend_weight * asset.prediction_confidence()
}

/// Scores and trims raw candidates into an investable universe: suitability
/// above the floor, sorted descending, capped at the top 20.
///
/// Fewer than 3 survivors is fatal for the call; the caller decides what to
/// do next.
pub fn filter_universe(candidates: &[Asset]) -> Result<Vec<Asset>, OptimizationError> {
    let mut scored: Vec<(f64, &Asset)> = candidates
        .iter()
        .map(|asset| (suitability(asset), asset))
        .filter(|(score, _)| *score > SUITABILITY_FLOOR)
        .collect();

    // Ties broken by id so repeated calls order identically.
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.id().cmp(&b.1.id()))
    });

    let universe: Vec<Asset> = scored
        .into_iter()
        .take(MAX_UNIVERSE_SIZE)
        .map(|(score, asset)| {
            debug!("universe: {} (id {}) suitability {:.3}", asset.name(), asset.id(), score);
            asset.clone()
        })
        .collect();

    if universe.len() < MIN_UNIVERSE_SIZE {
        return Err(OptimizationError::InsufficientUniverse(universe.len()));
    }
    Ok(universe)
}
