//! Denoise an impulse with ℓ₁ trend filtering.
//!
//! Fits a piecewise-linear trend to a unit impulse riding on zeros. For a
//! small λ the fit keeps a tent around the impulse; for a large λ it flattens
//! toward the best affine fit.

use trend_core::{solve, SolverSettings, TrendProblem};

fn main() {
    let n = 21;
    let mut y = vec![0.0; n];
    y[n / 2] = 1.0;

    for lambda in [0.01, 0.1, 1.0] {
        let prob = TrendProblem { y: y.clone(), lambda };
        let settings = SolverSettings { verbose: true, ..Default::default() };

        match solve(&prob, &settings) {
            Ok(result) => {
                println!();
                println!("lambda = {lambda}");
                println!("status = {}, iters = {}", result.status, result.info.iters);
                println!("objective = {:.6}", result.obj_val);
                for (i, xi) in result.x.iter().enumerate() {
                    println!("x[{i:2}] = {xi:9.5}");
                }
            }
            Err(e) => {
                eprintln!("Solver failed: {}", e);
                std::process::exit(1);
            }
        }
    }
}
