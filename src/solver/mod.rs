//! Numerical solvers
//!
//! This module turns an equation, a grid and a boundary condition into a
//! time-stepping simulation.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Physics** ([`crate::physics`]) - WHAT is being solved
//!    - Equation kind and its parameters
//!    - The grid the field lives on
//!
//! 2. **Boundary** ([`BoundaryCondition`]) - what happens at the domain edge
//!    - Dirichlet, Neumann, periodic or absorbing
//!    - Applied after every step, plus one flag for the stencil (wraparound)
//!
//! 3. **Method** ([`UpdateRule`]) - HOW one step is taken
//!    - [`FtcsScheme`] for the heat equation
//!    - [`LeapfrogScheme`] for the wave equation
//!
//! [`PdeSolver`] owns one of each together with the current field.
//!
//! # Module Organization
//!
//! - **`boundary`**: boundary conditions and the absorbing layer profile
//! - **`stencil`**: five-point Laplacian, optionally with wraparound
//! - **`methods`**: the two explicit update rules
//! - **`traits`**: lifecycle state and frame capture results
//! - **`pde`**: the stateful solver
//!
//! # Quick Start Example
//!
//! ```rust
//! use pde_rs::physics::{EquationKind, Grid};
//! use pde_rs::solver::{BoundaryCondition, PdeSolver};
//!
//! # fn main() -> pde_rs::Result<()> {
//! let mut solver = PdeSolver::new(EquationKind::Wave, (40, 40), BoundaryCondition::absorbing())?;
//! solver.set_parameters(&[("c", 1.0), ("dt", 0.1)])?;
//!
//! let u0 = Grid::from_fn(40, 40, |i, j| {
//!     let r2 = (i as f64 - 20.0).powi(2) + (j as f64 - 20.0).powi(2);
//!     (-r2 / 8.0).exp()
//! })?;
//! solver.set_initial_conditions(&u0)?;
//!
//! let frames = solver.solve_with_frames(100, 10)?;
//! println!("captured {} frames, final max {:.3}", frames.len(), frames.final_field.max());
//! # Ok(())
//! # }
//! ```
//!
//! # Stability
//!
//! Both methods are explicit and conditionally stable. The solver reports
//! whether the current parameters satisfy the bound
//! ([`PdeSolver::advisory_is_stable`]) and logs a warning when a run starts
//! outside it, but never refuses to run: the divergence of an unstable
//! scheme is a legitimate thing to observe.
//!
//! # Error Handling
//!
//! Configuration mistakes (unknown parameter names, shape mismatches,
//! stepping before initialization) are reported as [`crate::PdeError`].
//! Numerical blow-up is not an error; it is logged once per run.

// =================================================================================================
// Module Declarations
// =================================================================================================
mod boundary;
mod pde;
mod stencil;
mod traits;
pub mod methods;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// The threshold is stored in an AtomicUsize so that it can be changed at
// runtime (benchmarks, tests) without a mutex on every stencil evaluation.
// Relaxed ordering is sufficient: the value is a performance hint, not a
// synchronisation point.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;

/// Default number of cells above which the Laplacian is evaluated on the
/// rayon pool.
///
/// Below roughly 64x64 cells the per-column work is too small to amortise
/// the thread-pool dispatch.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Runtime-configurable parallel-execution threshold.
///
/// Read via [`parallel_threshold()`], written via [`set_parallel_threshold()`].
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// [`laplacian`] runs sequentially on grids with at most this many cells and
/// column-parallel above it, but only when the crate is compiled with the
/// `parallel` feature.
///
/// # Example
///
/// ```rust
/// use pde_rs::solver::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`.
///
/// # Example
///
/// ```rust
/// use pde_rs::solver::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(2048);
/// assert_eq!(parallel_threshold(), 2048);
///
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    debug!("parallel threshold set to {} cells", threshold);
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// RAII guard that saves the current threshold on construction and restores
/// it on drop.
///
/// Guards are serialised through a lock held for their lifetime, so tests
/// running on parallel threads never observe each other's threshold. Only
/// compiled in test builds.
///
/// ```rust,ignore
/// let _guard = crate::solver::ThresholdGuard::save(50);
/// // threshold is now 50 and is restored when _guard is dropped.
/// ```
#[cfg(test)]
static THRESHOLD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[cfg(test)]
impl ThresholdGuard {
    /// Set the threshold to `new_value` and return a guard that will
    /// restore the previous value on drop.
    pub(crate) fn save(new_value: usize) -> Self {
        // A panicking test poisons the lock; the threshold is restored anyway
        let lock = THRESHOLD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous, _lock: lock }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        // Bypass the public setter so that restoring never panics
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use boundary::{
    AbsorbingLayer,
    BoundaryCondition,
    DEFAULT_LAYER_FRACTION,
    DEFAULT_LAYER_STRENGTH,
    MIN_LAYER_WIDTH,
};

pub use traits::{SimulationResult, SolverState};

pub use stencil::laplacian;
pub use pde::PdeSolver;

pub use methods::{FtcsScheme, LeapfrogScheme, UpdateRule};

// =================================================================================================
// Tests
// =================================================================================================
