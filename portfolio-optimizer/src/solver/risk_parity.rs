use super::{SolverError, WeightBounds, MAX_ITERATIONS, TOLERANCE};
use nalgebra::{DMatrix, DVector};

const STRATEGY: &str = "risk_parity";

/// Equalizes per-asset risk contributions `w_i (Σw)_i / sqrt(wᵀΣw)` via a
/// deterministic multiplicative iteration, then projects onto the bounds.
///
/// A degenerate Σ (zero portfolio volatility) or an exhausted iteration
/// budget is a non-convergence; the caller applies the equal-weight fallback.
pub fn optimize(sigma: &DMatrix<f64>, bounds: &WeightBounds) -> Result<DVector<f64>, SolverError> {
    let n = sigma.nrows();
    let mut w = DVector::from_element(n, 1.0 / n as f64);

    for _ in 0..MAX_ITERATIONS {
        let previous = w.clone();
        let sigma_w = sigma * &w;
        let variance = w.dot(&sigma_w);
        if variance <= f64::EPSILON {
            return Err(SolverError::DidNotConverge {
                strategy: STRATEGY,
                reason: "degenerate covariance matrix (zero portfolio volatility)".to_string(),
            });
        }
        let vol = variance.sqrt();
        let target = vol / n as f64;

        for i in 0..n {
            let contribution = w[i] * sigma_w[i] / vol;
            if contribution > f64::EPSILON {
                w[i] *= (target / contribution).sqrt();
            }
        }
        let sum = w.sum();
        if sum <= f64::EPSILON {
            return Err(SolverError::DidNotConverge {
                strategy: STRATEGY,
                reason: "weights collapsed to zero".to_string(),
            });
        }
        w /= sum;

        if (&w - &previous).norm() < TOLERANCE {
            return Ok(bounds.project(w));
        }
    }

    Err(SolverError::DidNotConverge {
        strategy: STRATEGY,
        reason: format!("iteration limit of {MAX_ITERATIONS} reached"),
    })
}
