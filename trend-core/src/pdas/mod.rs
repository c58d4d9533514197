//! Primal-dual active-set driver.
//!
//! Each outer iteration solves the reduced quadratic on the current active
//! set exactly, recomputes the primal and its curvature, scans for KKT
//! violators, and moves a damped proportion of the worst ones across the
//! partition boundary. The proportion is regulated by a safeguard queue of
//! recent violator counts: pure greedy reassignment oscillates on this
//! problem and one-at-a-time reassignment crawls, so the schedule adapts
//! between the extremes based on observed progress.

pub mod safeguard;
pub mod subspace;
pub mod violators;
pub mod workspace;

use std::time::Instant;

use crate::operators;
use crate::problem::{SolveInfo, SolveStatus, SolverSettings, TrendProblem};

pub use safeguard::{SafeguardQueue, Verdict};
pub use workspace::PdasWorkspace;

/// Run the active-set iteration on caller-owned state.
///
/// `z` is both the initial dual (all zeros for a cold start) and the final
/// dual on return; `x` is overwritten. `ws` must be sized for
/// `prob.num_points()`. No validation happens here; the public
/// [`crate::solve`] wrapper validates once at the seam.
///
/// On every return path `x = y - λ Dᵀ z` holds to floating point, converged
/// or not.
pub fn solve_in_place(
    prob: &TrendProblem,
    settings: &SolverSettings,
    x: &mut [f64],
    z: &mut [f64],
    ws: &mut PdasWorkspace,
) -> (SolveStatus, SolveInfo) {
    let n = prob.num_points();
    debug_assert_eq!(x.len(), n);
    debug_assert_eq!(z.len(), prob.num_duals());
    debug_assert_eq!(ws.len(), n);

    let mut p = settings.p_init;
    let mut queue = SafeguardQueue::new(settings.queue_len, n);
    let mut info = SolveInfo::default();
    let start = Instant::now();

    if settings.verbose {
        eprintln!("____________________________");
        eprintln!("|Iter|Violators|Active|Prop|");
    }

    for iter in 1..=settings.max_iter {
        // Subspace minimization: exact solve on A with I pinned at ±1.
        let outcome = subspace::update_dual(&prob.y, z, prob.lambda, ws);
        if let Some(err) = outcome.failure {
            info.factor_failures += 1;
            if settings.verbose {
                eprintln!("banded solve: {err}");
            }
        }
        operators::update_primal(x, &prob.y, z, prob.lambda);
        operators::apply_d(x, &mut ws.diff_x);

        let n_vio = violators::locate(z, prob.lambda, ws);

        match queue.observe(n_vio) {
            Verdict::Improved => p = (settings.expand * p).min(1.0),
            Verdict::Stagnant => p = (settings.shrink * p).max(1.0 / n_vio as f64),
            Verdict::Steady => {}
        }

        if settings.verbose {
            eprintln!("|{iter:4}|{n_vio:9}|{:6}|{p:4.2}|", outcome.n_active);
        }

        info.iters = iter;
        info.n_active = outcome.n_active;
        info.final_violators = n_vio;

        if n_vio == 0 {
            if settings.verbose {
                eprintln!("Solved");
            }
            info.solve_time_ms = start.elapsed().as_millis() as u64;
            return (SolveStatus::Converged, info);
        }

        // Reassigning on the final iteration would leave x inconsistent with
        // z on return; stop before the partition moves again.
        if iter == settings.max_iter {
            break;
        }

        violators::sort_by_fitness(n_vio, ws);
        let n_reassign = ((p * n_vio as f64).round() as usize).max(1);
        violators::reassign(n_reassign, z, ws);
    }

    if settings.verbose {
        eprintln!("MAXITER Exceeded");
    }
    info.solve_time_ms = start.elapsed().as_millis() as u64;
    (SolveStatus::MaxIters, info)
}
