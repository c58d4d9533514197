//! Problem data structures and validation.
//!
//! This module defines the trend-filtering problem representation and all
//! associated solver types.

use std::fmt;

use thiserror::Error;

/// One-dimensional ℓ₁ trend-filtering problem.
///
/// The solver computes the primal minimizer
///
/// ```text
/// x* = argmin_x  (1/2) ||y - x||² + λ ||D x||₁
/// ```
///
/// where `D` is the second-order difference operator
/// `(D x)_i = -x_i + 2 x_{i+1} - x_{i+2}` with `n - 2` rows.
///
/// # Dimensions
///
/// - `n`: number of observations (length of y and x), `n >= 4`
/// - dual variable z has length `n - 2`
#[derive(Debug, Clone)]
pub struct TrendProblem {
    /// Observations (length n). Read-only for the solver lifetime.
    pub y: Vec<f64>,

    /// Regularization weight, strictly positive.
    pub lambda: f64,
}

/// Invalid problem or settings, reported by the public entry point.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// Fewer than four observations
    #[error("series too short: need at least 4 observations, got {0}")]
    TooShort(usize),

    /// Non-positive or non-finite regularization weight
    #[error("lambda must be positive and finite, got {0}")]
    BadLambda(f64),

    /// NaN or infinity in the observations
    #[error("observation {0} is not finite")]
    NonFiniteObservation(usize),

    /// Reassignment proportion outside (0, 1]
    #[error("initial proportion must be in (0, 1], got {0}")]
    BadProportion(f64),

    /// Empty safeguard queue
    #[error("safeguard queue length must be at least 1")]
    EmptyQueue,

    /// Shrink/expand factors must satisfy 0 < shrink < 1 < expand
    #[error("schedule factors must satisfy 0 < shrink < 1 < expand, got shrink={shrink}, expand={expand}")]
    BadSchedule {
        /// Proportion shrink factor
        shrink: f64,
        /// Proportion expand factor
        expand: f64,
    },

    /// Zero iteration budget
    #[error("max_iter must be at least 1")]
    BadMaxIter,
}

impl TrendProblem {
    /// Number of observations (n).
    pub fn num_points(&self) -> usize {
        self.y.len()
    }

    /// Number of dual coordinates (n - 2).
    pub fn num_duals(&self) -> usize {
        self.y.len().saturating_sub(2)
    }

    /// Validate problem data.
    pub fn validate(&self) -> Result<(), ProblemError> {
        if self.y.len() < 4 {
            return Err(ProblemError::TooShort(self.y.len()));
        }
        if !(self.lambda > 0.0 && self.lambda.is_finite()) {
            return Err(ProblemError::BadLambda(self.lambda));
        }
        if let Some(i) = self.y.iter().position(|v| !v.is_finite()) {
            return Err(ProblemError::NonFiniteObservation(i));
        }
        Ok(())
    }

    /// Primal objective `(1/2) ||y - x||² + λ ||D x||₁` at `x`.
    ///
    /// Walks the stencil directly, no scratch allocation.
    pub fn objective(&self, x: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), self.y.len());
        let fit: f64 = self
            .y
            .iter()
            .zip(x.iter())
            .map(|(yi, xi)| (yi - xi) * (yi - xi))
            .sum();
        let mut penalty = 0.0;
        for i in 0..x.len() - 2 {
            penalty += (-x[i] + 2.0 * x[i + 1] - x[i + 2]).abs();
        }
        0.5 * fit + self.lambda * penalty
    }
}

/// Solver settings and tuning parameters.
#[derive(Debug, Clone)]
pub struct SolverSettings {
    /// Initial fraction of violators reassigned per iteration, in (0, 1]
    pub p_init: f64,

    /// Length of the safeguard queue of recent violator counts
    pub queue_len: usize,

    /// Factor by which the proportion is shrunk on stagnation, in (0, 1)
    pub shrink: f64,

    /// Factor by which the proportion is grown on progress, > 1
    pub expand: f64,

    /// Maximum number of outer iterations
    pub max_iter: usize,

    /// Emit one diagnostic record per iteration to stderr
    pub verbose: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            p_init: 0.5,
            queue_len: 5,
            shrink: 0.8,
            expand: 1.1,
            max_iter: 200,
            verbose: false,
        }
    }
}

impl SolverSettings {
    /// Validate tuning parameters.
    pub fn validate(&self) -> Result<(), ProblemError> {
        if !(self.p_init > 0.0 && self.p_init <= 1.0) {
            return Err(ProblemError::BadProportion(self.p_init));
        }
        if self.queue_len == 0 {
            return Err(ProblemError::EmptyQueue);
        }
        if !(self.shrink > 0.0 && self.shrink < 1.0 && self.expand > 1.0) {
            return Err(ProblemError::BadSchedule {
                shrink: self.shrink,
                expand: self.expand,
            });
        }
        if self.max_iter == 0 {
            return Err(ProblemError::BadMaxIter);
        }
        Ok(())
    }
}

/// Solution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// The violator scan came back empty; KKT conditions hold
    Converged,

    /// Iteration budget exhausted; `x`, `z` are best effort
    MaxIters,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Converged => write!(f, "Converged"),
            SolveStatus::MaxIters => write!(f, "MaxIters"),
        }
    }
}

/// Solve result with solution and diagnostics.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Solution status
    pub status: SolveStatus,

    /// Primal solution x (length n)
    pub x: Vec<f64>,

    /// Dual solution z (length n - 2), in [-1, 1] up to solver tolerance
    pub z: Vec<f64>,

    /// Primal objective value at the returned x
    pub obj_val: f64,

    /// Detailed solve information
    pub info: SolveInfo,
}

/// Detailed solve information and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct SolveInfo {
    /// Number of outer iterations completed
    pub iters: usize,

    /// Total solve time (milliseconds)
    pub solve_time_ms: u64,

    /// Active-set size after the last subspace solve
    pub n_active: usize,

    /// Violator count at the last scan (zero on convergence)
    pub final_violators: usize,

    /// Number of band factorizations that lost positive definiteness
    pub factor_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_validation() {
        let ok = TrendProblem { y: vec![0.0; 4], lambda: 1.0 };
        assert!(ok.validate().is_ok());

        let short = TrendProblem { y: vec![0.0; 3], lambda: 1.0 };
        assert_eq!(short.validate(), Err(ProblemError::TooShort(3)));

        let bad_lambda = TrendProblem { y: vec![0.0; 5], lambda: 0.0 };
        assert_eq!(bad_lambda.validate(), Err(ProblemError::BadLambda(0.0)));

        let nan = TrendProblem { y: vec![0.0, f64::NAN, 0.0, 0.0], lambda: 1.0 };
        assert_eq!(nan.validate(), Err(ProblemError::NonFiniteObservation(1)));
    }

    #[test]
    fn test_settings_validation() {
        assert!(SolverSettings::default().validate().is_ok());

        let bad_p = SolverSettings { p_init: 0.0, ..Default::default() };
        assert!(bad_p.validate().is_err());

        let bad_sched = SolverSettings { shrink: 1.2, ..Default::default() };
        assert!(matches!(
            bad_sched.validate(),
            Err(ProblemError::BadSchedule { .. })
        ));

        let no_iters = SolverSettings { max_iter: 0, ..Default::default() };
        assert_eq!(no_iters.validate(), Err(ProblemError::BadMaxIter));
    }

    #[test]
    fn test_objective_linear_data_has_zero_penalty() {
        let y: Vec<f64> = (0..6).map(|i| 2.0 * i as f64 + 1.0).collect();
        let prob = TrendProblem { y: y.clone(), lambda: 10.0 };
        // At x = y the fit term vanishes and D y = 0 for affine data.
        assert_eq!(prob.objective(&y), 0.0);
    }

    #[test]
    fn test_objective_counts_curvature() {
        let prob = TrendProblem { y: vec![0.0, 0.0, 1.0, 0.0, 0.0], lambda: 2.0 };
        let x = vec![0.0, 0.0, 1.0, 0.0, 0.0];
        // |D x| = [1, 2, 1] at the impulse, fit term zero.
        assert_eq!(prob.objective(&x), 2.0 * 4.0);
    }
}
