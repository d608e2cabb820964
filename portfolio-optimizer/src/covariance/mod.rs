use nalgebra::{DMatrix, DVector};
use portfolio_api::model::asset::Asset;

/// Produces the N x N covariance matrix for a filtered universe.
///
/// Kept behind a trait because the default estimator is a similarity
/// heuristic, not a historical estimate; deployments with real return series
/// can swap in their own model without touching the solver.
pub trait CovarianceModel: Send + Sync {
    fn covariance(&self, universe: &[Asset]) -> DMatrix<f64>;

    /// Per-asset volatility vector matching the covariance diagonal.
    fn volatilities(&self, universe: &[Asset]) -> DVector<f64> {
        DVector::from_iterator(universe.len(), universe.iter().map(|a| a.volatility()))
    }
}

/// Default estimator: volatility proxied from the risk score, correlation
/// from a price/return-similarity heuristic.
///
/// `corr_ij = clamp(0.1 + 0.2 * price_ratio + max(0, 0.3 - 2 * |dr|), 0, 0.8)`
/// where `price_ratio = min(p_i, p_j) / max(p_i, p_j)`. Similarly priced
/// assets with similar expected returns are assumed to co-move more.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimilarityCovariance;

impl SimilarityCovariance {
    fn correlation(a: &Asset, b: &Asset) -> f64 {
        let price_ratio = a.price().min(b.price()) / a.price().max(b.price());
        let return_gap = (a.expected_return() - b.expected_return()).abs();
        let corr = 0.1 + 0.2 * price_ratio + (0.3 - 2.0 * return_gap).max(0.0);
        corr.clamp(0.0, 0.8)
    }
}

impl CovarianceModel for SimilarityCovariance {
    fn covariance(&self, universe: &[Asset]) -> DMatrix<f64> {
        let n = universe.len();
        let vols = self.volatilities(universe);
        DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                vols[i] * vols[i]
            } else {
                Self::correlation(&universe[i], &universe[j]) * vols[i] * vols[j]
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_api::model::asset::PredictionTrend;

    fn asset(id: usize, price: f64, er: f64, risk: f64) -> Asset {
        Asset::new(
            id,
            format!("asset-{id}"),
            price,
            er,
            risk,
            0.8,
            1000.0,
            PredictionTrend::Neutral,
            0.5,
        )
    }

    #[test]
    fn test_diagonal_is_squared_volatility() {
        let universe = vec![asset(1, 100.0, 0.05, 20.0), asset(2, 50.0, 0.08, 60.0)];
        let sigma = SimilarityCovariance.covariance(&universe);
        // vol = risk/1000 + 0.01
        assert!((sigma[(0, 0)] - 0.03f64.powi(2)).abs() < 1e-12);
        assert!((sigma[(1, 1)] - 0.07f64.powi(2)).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let universe = vec![
            asset(1, 1000.0, 0.05, 20.0),
            asset(2, 2000.0, 0.03, 50.0),
            asset(3, 500.0, 0.08, 80.0),
        ];
        let sigma = SimilarityCovariance.covariance(&universe);
        for i in 0..3 {
            for j in 0..3 {
                assert!((sigma[(i, j)] - sigma[(j, i)]).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_correlation_stays_in_band() {
        // Identical price and return: 0.1 + 0.2 + 0.3 = 0.6, inside the cap.
        let a = asset(1, 100.0, 0.05, 20.0);
        let b = asset(2, 100.0, 0.05, 20.0);
        assert!((SimilarityCovariance::correlation(&a, &b) - 0.6).abs() < 1e-12);

        // Wildly different returns lose the similarity bonus entirely.
        let c = asset(3, 100.0, 0.50, 20.0);
        let corr = SimilarityCovariance::correlation(&a, &c);
        assert!((corr - 0.3).abs() < 1e-12);
        assert!((0.0..=0.8).contains(&corr));
    }

    #[test]
    fn test_zero_risk_asset_keeps_positive_variance() {
        let universe = vec![asset(1, 100.0, 0.05, 0.0)];
        let sigma = SimilarityCovariance.covariance(&universe);
        assert!(sigma[(0, 0)] > 0.0);
    }
}
