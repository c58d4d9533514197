//! KKT violator location, scoring and reassignment.
//!
//! A dual coordinate violates the KKT conditions when its value is
//! inconsistent with its partition membership: a pinned coordinate whose
//! primal curvature pulls away from its bound, or an active coordinate whose
//! solved value left the box.

use crate::pdas::workspace::PdasWorkspace;

/// Scan the partition for violators and score each by fitness.
///
/// Reads the curvature from `ws.diff_x`, fills `ws.vio_index`,
/// `ws.vio_fitness` and resets `ws.vio_sort` to the identity permutation;
/// returns the violator count.
///
/// Fitness of a pinned violator is `max(λ |(Dx)_i|, 1)`; the 1-floor makes
/// any release from a bound at least as urgent as the weakest pin, keeping
/// the two violation kinds comparable under one ordering.
pub fn locate(z: &[f64], lambda: f64, ws: &mut PdasWorkspace) -> usize {
    let mut n_vio = 0;
    for i in 0..z.len() {
        let dxi = ws.diff_x[i];
        let violated = if z[i] == 1.0 {
            if dxi < 0.0 {
                ws.vio_fitness[n_vio] = (lambda * dxi.abs()).max(1.0);
                true
            } else {
                false
            }
        } else if z[i] == -1.0 {
            if dxi > 0.0 {
                ws.vio_fitness[n_vio] = (lambda * dxi.abs()).max(1.0);
                true
            } else {
                false
            }
        } else if z[i].abs() > 1.0 {
            ws.vio_fitness[n_vio] = (lambda * dxi.abs()).max(z[i].abs());
            true
        } else {
            false
        };
        if violated {
            ws.vio_index[n_vio] = i;
            ws.vio_sort[n_vio] = n_vio;
            n_vio += 1;
        }
    }
    n_vio
}

/// Stable-sort `ws.vio_sort[..n_vio]` by descending fitness.
///
/// The comparator closes over the fitness buffer, so no state outlives the
/// call and concurrent driver invocations cannot interfere.
pub fn sort_by_fitness(n_vio: usize, ws: &mut PdasWorkspace) {
    let PdasWorkspace { vio_fitness, vio_sort, .. } = ws;
    vio_sort[..n_vio].sort_by(|&a, &b| vio_fitness[b].total_cmp(&vio_fitness[a]));
}

/// Move the `n_reassign` highest-fitness violators across the partition.
///
/// Pinned violators are released to 0 (into the active set); active
/// violators are pinned to the bound they crossed. Every write is one of the
/// exact literals {1.0, 0.0, -1.0}, which keeps the partition encoding exact.
pub fn reassign(n_reassign: usize, z: &mut [f64], ws: &PdasWorkspace) {
    for &s in &ws.vio_sort[..n_reassign] {
        let i = ws.vio_index[s];
        if z[i] == 1.0 || z[i] == -1.0 {
            z[i] = 0.0;
        } else if z[i] > 1.0 {
            z[i] = 1.0;
        } else if z[i] < -1.0 {
            z[i] = -1.0;
        }
    }
}
