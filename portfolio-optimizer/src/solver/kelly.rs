use nalgebra::DVector;
use portfolio_api::model::asset::Asset;
use portfolio_api::model::config::OptimizationConfig;
use statrs::function::erf::erf;

/// Standard normal CDF.
fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Fractional-Kelly position sizing.
///
/// Each asset with positive volatility and expected return gets
/// `win_prob = Φ(er / vol)` and a raw Kelly fraction
/// `(er · p − (1 − p)) / er`, scaled down by `kelly_fraction` and clipped at
/// `max_kelly_position`. Positions are only rescaled when they oversubscribe
/// the budget; a total below 1 stays as cash rather than being levered up to
/// a full allocation.
///
/// Returns `None` when no asset earns a positive weight; the caller applies
/// the equal-weight fallback.
pub fn optimize(universe: &[Asset], config: &OptimizationConfig) -> Option<DVector<f64>> {
    let n = universe.len();
    let mut w = DVector::zeros(n);

    for (i, asset) in universe.iter().enumerate() {
        let vol = asset.volatility();
        let er = asset.expected_return();
        if vol <= 0.0 || er <= 0.0 {
            continue;
        }
        let win_prob = normal_cdf(er / vol);
        let raw = (er * win_prob - (1.0 - win_prob)) / er;
        let sized = (raw * config.kelly_fraction()).clamp(0.0, config.max_kelly_position());
        w[i] = sized;
    }

    let total = w.sum();
    if total <= 0.0 {
        return None;
    }
    if total > 1.0 {
        w /= total;
    }
    Some(w)
}
