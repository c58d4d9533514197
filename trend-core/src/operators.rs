//! Second-order difference stencils and the fused primal update.
//!
//! The operator
//!
//! ```text
//!     | -1  2 -1  0  0 |
//! D = |  0 -1  2 -1  0 |        (n-2 rows, n columns)
//!     |  0  0 -1  2 -1 |
//! ```
//!
//! and its adjoint are applied as raw stencil walks; no matrix is ever
//! materialized.

/// Forward difference: `out[i] = -x[i] + 2 x[i+1] - x[i+2]`.
///
/// `x` has length n, `out` has length n - 2.
pub fn apply_d(x: &[f64], out: &mut [f64]) {
    let n = x.len();
    debug_assert_eq!(out.len(), n - 2);
    for i in 0..n - 2 {
        out[i] = -x[i] + 2.0 * x[i + 1] - x[i + 2];
    }
}

/// Adjoint: `out = Dᵀ z`, boundary rows truncated.
///
/// `z` has length n - 2, `out` has length n.
pub fn apply_dt(z: &[f64], out: &mut [f64]) {
    let n = out.len();
    debug_assert_eq!(z.len(), n - 2);
    out[0] = -z[0];
    out[1] = 2.0 * z[0] - z[1];
    for i in 2..n - 2 {
        out[i] = -z[i - 2] + 2.0 * z[i - 1] - z[i];
    }
    out[n - 2] = -z[n - 4] + 2.0 * z[n - 3];
    out[n - 1] = -z[n - 3];
}

/// Fused primal update: `x = y - λ Dᵀ z` in a single pass.
///
/// Each output materializes the adjoint stencil from up to three consecutive
/// dual values; the four boundary rows use the truncated stencil.
pub fn update_primal(x: &mut [f64], y: &[f64], z: &[f64], lambda: f64) {
    let n = y.len();
    debug_assert_eq!(x.len(), n);
    debug_assert_eq!(z.len(), n - 2);
    x[0] = y[0] + z[0] * lambda;
    x[1] = y[1] + (z[1] - 2.0 * z[0]) * lambda;
    for i in 2..n - 2 {
        x[i] = y[i] + (z[i - 2] - 2.0 * z[i - 1] + z[i]) * lambda;
    }
    x[n - 2] = y[n - 2] + (z[n - 4] - 2.0 * z[n - 3]) * lambda;
    x[n - 1] = y[n - 1] + z[n - 3] * lambda;
}
