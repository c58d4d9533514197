//! Pre-allocated workspace for the active-set driver.
//!
//! All buffers are sized from the problem length at construction and reused
//! across iterations; the driver hot loop performs no allocation.

/// Scratch buffers for one driver invocation.
///
/// A workspace may be reused across invocations on problems of the same
/// length; every buffer is fully rewritten before it is read.
pub struct PdasWorkspace {
    /// Problem length the buffers were sized for
    n: usize,

    /// `D x`, length n - 2
    pub diff_x: Vec<f64>,

    /// `Dᵀ z_I` (divergence of the inactive part), length n
    pub div_zi: Vec<f64>,

    /// Dual indices of located violators; first `n_vio` entries meaningful
    pub vio_index: Vec<usize>,

    /// Fitness score per located violator
    pub vio_fitness: Vec<f64>,

    /// Permutation of `0..n_vio`, sorted by descending fitness
    pub vio_sort: Vec<usize>,

    /// Band storage for the reduced system, three rows of leading
    /// dimension k = |A| (see `linalg::banded` for the layout)
    pub ab: Vec<f64>,

    /// Right-hand side, overwritten with the subspace solution
    pub b: Vec<f64>,
}

impl PdasWorkspace {
    /// Allocate buffers for a length-`n` problem (`n >= 4`).
    pub fn new(n: usize) -> Self {
        let nd = n - 2;
        Self {
            n,
            diff_x: vec![0.0; nd],
            div_zi: vec![0.0; n],
            vio_index: vec![0; nd],
            vio_fitness: vec![0.0; nd],
            vio_sort: vec![0; nd],
            ab: vec![0.0; 3 * nd],
            b: vec![0.0; nd],
        }
    }

    /// Problem length this workspace was sized for.
    pub fn len(&self) -> usize {
        self.n
    }

    /// True when sized for a zero-length problem (never, in practice).
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}
