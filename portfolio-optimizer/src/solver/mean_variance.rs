use super::{SolverError, WeightBounds};
use nalgebra::{DMatrix, DVector};

const STRATEGY: &str = "mean_variance";

/// Target return premium over the universe average.
const TARGET_RETURN_PREMIUM: f64 = 1.2;

/// Markowitz minimum-variance weights for a target return 20% above the
/// universe mean, solved in closed form with two equality constraints
/// (`wᵀr = target`, `Σw = 1`), then projected onto the bounds.
///
/// `w = Σ⁻¹ Aᵀ (A Σ⁻¹ Aᵀ)⁻¹ b` with `A = [rᵀ; 1ᵀ]`, `b = [target; 1]`.
/// A singular Σ or constraint system is a non-convergence; the caller falls
/// back to risk parity.
pub fn optimize(
    sigma: &DMatrix<f64>,
    returns: &DVector<f64>,
    bounds: &WeightBounds,
) -> Result<DVector<f64>, SolverError> {
    let n = sigma.nrows();
    let target_return = TARGET_RETURN_PREMIUM * returns.mean();

    let sigma_inv = sigma
        .clone()
        .try_inverse()
        .ok_or_else(|| SolverError::DidNotConverge {
            strategy: STRATEGY,
            reason: "covariance matrix is singular".to_string(),
        })?;

    let mut constraints = DMatrix::zeros(2, n);
    constraints.set_row(0, &returns.transpose());
    constraints.set_row(1, &DVector::from_element(n, 1.0).transpose());
    let budget = DVector::from_vec(vec![target_return, 1.0]);

    let sigma_inv_at = &sigma_inv * constraints.transpose();
    let gram = &constraints * &sigma_inv_at;
    // The 2x2 system degenerates when the return constraint is (numerically)
    // a multiple of the budget constraint, e.g. identical expected returns.
    let scale = (gram[(0, 0)] * gram[(1, 1)]).abs().max(f64::MIN_POSITIVE);
    if gram.determinant().abs() < 1e-9 * scale {
        return Err(SolverError::DidNotConverge {
            strategy: STRATEGY,
            reason: "constraint system is singular".to_string(),
        });
    }
    let gram_inv = gram
        .try_inverse()
        .ok_or_else(|| SolverError::DidNotConverge {
            strategy: STRATEGY,
            reason: "constraint system is singular".to_string(),
        })?;

    let w = sigma_inv_at * gram_inv * budget;
    if w.iter().any(|x| !x.is_finite()) {
        return Err(SolverError::DidNotConverge {
            strategy: STRATEGY,
            reason: "non-finite weights".to_string(),
        });
    }

    Ok(bounds.project(w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covariance::{CovarianceModel, SimilarityCovariance};
    use crate::solver::tests::asset;
    use portfolio_api::model::config::OptimizationConfig;

    #[test]
    fn test_weights_sum_to_one_within_bounds() {
        let universe = vec![
            asset(1, 1000.0, 0.05, 20.0),
            asset(2, 2000.0, 0.03, 50.0),
            asset(3, 500.0, 0.08, 80.0),
            asset(4, 750.0, 0.06, 40.0),
        ];
        let sigma = SimilarityCovariance.covariance(&universe);
        let returns = DVector::from_vec(vec![0.05, 0.03, 0.08, 0.06]);
        let config = OptimizationConfig::default();
        let bounds = WeightBounds::from_config(&universe, 1_000_000.0, &config);
        let w = optimize(&sigma, &returns, &bounds).unwrap();
        assert!((w.sum() - 1.0).abs() < 1e-6);
        for i in 0..4 {
            assert!(w[i] >= config.min_position_size() - 1e-9);
            assert!(w[i] <= config.max_position_size() + 1e-9);
        }
    }

    #[test]
    fn test_singular_covariance_does_not_converge() {
        // Rank-one matrix: every row a multiple of the first.
        let sigma = DMatrix::from_fn(3, 3, |_, _| 0.01);
        let returns = DVector::from_vec(vec![0.05, 0.03, 0.08]);
        let universe = vec![
            asset(1, 100.0, 0.05, 20.0),
            asset(2, 100.0, 0.03, 50.0),
            asset(3, 100.0, 0.08, 80.0),
        ];
        let bounds =
            WeightBounds::from_config(&universe, 1_000_000.0, &OptimizationConfig::default());
        assert!(matches!(
            optimize(&sigma, &returns, &bounds),
            Err(SolverError::DidNotConverge { .. })
        ));
    }

    #[test]
    fn test_identical_returns_make_constraints_degenerate() {
        // With every expected return equal, the return constraint is a
        // multiple of the budget constraint and the system is singular.
        let universe = vec![
            asset(1, 100.0, 0.05, 10.0),
            asset(2, 100.0, 0.05, 50.0),
            asset(3, 100.0, 0.05, 90.0),
        ];
        let sigma = SimilarityCovariance.covariance(&universe);
        let returns = DVector::from_element(3, 0.05);
        let bounds =
            WeightBounds::from_config(&universe, 1_000_000.0, &OptimizationConfig::default());
        assert!(matches!(
            optimize(&sigma, &returns, &bounds),
            Err(SolverError::DidNotConverge { .. })
        ));
    }
}
