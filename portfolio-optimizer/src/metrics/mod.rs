use nalgebra::{DMatrix, DVector};
use portfolio_api::model::allocation::Allocation;
use portfolio_api::model::asset::Asset;
use portfolio_api::model::metrics::PortfolioMetrics;

/// Risk-free rate used in the Sharpe and Sortino ratios. Deliberately not a
/// config field; the call config enumerates exactly the optimizer options.
pub const RISK_FREE_RATE: f64 = 0.02;

/// Derives portfolio statistics from the quantized weights.
///
/// `weights` is aligned with `universe` (zero entries for assets dropped in
/// quantization); `allocations` carries the surviving positions. An empty
/// allocation set yields all-zero metrics with no division errors.
pub fn calculate(
    universe: &[Asset],
    weights: &DVector<f64>,
    sigma: &DMatrix<f64>,
    allocations: &[Allocation],
) -> PortfolioMetrics {
    if allocations.is_empty() {
        return PortfolioMetrics::empty();
    }

    let returns =
        DVector::from_iterator(universe.len(), universe.iter().map(|a| a.expected_return()));
    let vols = DVector::from_iterator(universe.len(), universe.iter().map(|a| a.volatility()));

    let total_value: f64 = allocations.iter().map(|a| a.target_amount()).sum();
    let expected_return = weights.dot(&returns);
    let portfolio_risk = weights.dot(&(sigma * weights)).max(0.0).sqrt();

    let sharpe_ratio = if portfolio_risk > 0.0 {
        (expected_return - RISK_FREE_RATE) / portfolio_risk
    } else {
        0.0
    };
    // Documented simplification: half the portfolio risk stands in for a true
    // downside deviation.
    let sortino_ratio = if portfolio_risk > 0.0 {
        (expected_return - RISK_FREE_RATE) / (portfolio_risk / 2.0)
    } else {
        0.0
    };
    let diversification_ratio = if portfolio_risk > 0.0 {
        weights.dot(&vols) / portfolio_risk
    } else {
        0.0
    };

    let weight_sum: f64 = weights.sum();
    let liquidity_score = if weight_sum > 0.0 {
        universe
            .iter()
            .enumerate()
            .map(|(i, a)| weights[i] * a.liquidity_score())
            .sum::<f64>()
            / weight_sum
    } else {
        0.0
    };

    PortfolioMetrics {
        total_value,
        expected_return,
        portfolio_risk,
        sharpe_ratio,
        sortino_ratio,
        diversification_ratio,
        liquidity_score,
        risk_parity_score: risk_parity_score(allocations),
    }
}

/// 1.0 when every position contributes equally to portfolio risk, degrading
/// toward 0 as contributions concentrate. Measured over risk-contribution
/// fractions so the `1/n` reference is meaningful.
fn risk_parity_score(allocations: &[Allocation]) -> f64 {
    let n = allocations.len();
    let total_rc: f64 = allocations.iter().map(|a| a.risk_contribution()).sum();
    if total_rc <= 0.0 {
        return 0.0;
    }
    let target = 1.0 / n as f64;
    let variance = allocations
        .iter()
        .map(|a| {
            let deviation = a.risk_contribution() / total_rc - target;
            deviation * deviation
        })
        .sum::<f64>()
        / n as f64;
    (1.0 - variance.sqrt()).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covariance::{CovarianceModel, SimilarityCovariance};
    use crate::solver::{build_allocations, equal_weights};
    use portfolio_api::model::asset::PredictionTrend;

    fn asset(id: usize, price: f64, er: f64, risk: f64, liq: f64) -> Asset {
        Asset::new(
            id,
            format!("asset-{id}"),
            price,
            er,
            risk,
            liq,
            1_000_000.0,
            PredictionTrend::Neutral,
            0.5,
        )
    }

    #[test]
    fn test_empty_allocations_yield_zero_metrics() {
        let metrics = calculate(&[], &DVector::zeros(0), &DMatrix::zeros(0, 0), &[]);
        assert_eq!(metrics, PortfolioMetrics::empty());
    }

    #[test]
    fn test_basic_identities() {
        let universe = vec![
            asset(1, 1000.0, 0.05, 20.0, 0.9),
            asset(2, 2000.0, 0.03, 50.0, 0.7),
            asset(3, 500.0, 0.08, 80.0, 0.8),
        ];
        let sigma = SimilarityCovariance.covariance(&universe);
        let w = equal_weights(3);
        let allocations = build_allocations(&universe, &w, &sigma, 100_000.0);
        let metrics = calculate(&universe, &w, &sigma, &allocations);

        let expected: f64 = (0.05 + 0.03 + 0.08) / 3.0;
        assert!((metrics.expected_return - expected).abs() < 1e-12);
        assert!(metrics.portfolio_risk > 0.0);
        assert!(
            (metrics.sharpe_ratio
                - (metrics.expected_return - RISK_FREE_RATE) / metrics.portfolio_risk)
                .abs()
                < 1e-12
        );
        // Sortino halves the risk denominator, doubling the ratio.
        assert!((metrics.sortino_ratio - 2.0 * metrics.sharpe_ratio).abs() < 1e-12);
        // Imperfect correlation keeps the diversification ratio above 1.
        assert!(metrics.diversification_ratio > 1.0);
        assert!(metrics.liquidity_score > 0.7 && metrics.liquidity_score < 0.9);
    }

    #[test]
    fn test_equal_contributions_score_one() {
        let allocations = vec![
            Allocation::new(1, 0.25, 25000.0, 25.0, 0.05, 0.9, 0.0),
            Allocation::new(2, 0.25, 25000.0, 25.0, 0.05, 0.9, 0.0),
            Allocation::new(3, 0.25, 25000.0, 25.0, 0.05, 0.9, 0.0),
            Allocation::new(4, 0.25, 25000.0, 25.0, 0.05, 0.9, 0.0),
        ];
        assert!((risk_parity_score(&allocations) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_concentrated_contributions_score_below_one() {
        let allocations = vec![
            Allocation::new(1, 0.5, 50000.0, 50.0, 0.09, 0.9, 0.0),
            Allocation::new(2, 0.25, 25000.0, 25.0, 0.005, 0.9, 0.0),
            Allocation::new(3, 0.25, 25000.0, 25.0, 0.005, 0.9, 0.0),
        ];
        let score = risk_parity_score(&allocations);
        assert!(score < 1.0);
        assert!(score >= 0.0);
    }
}
