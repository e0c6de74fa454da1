//! Solver lifecycle and result types
//!
//! # Lifecycle
//!
//! ```text
//! Unconfigured --set_parameters--> Configured --set_initial_conditions--> Initialized
//!                                                                            |
//!                                     set_initial_conditions <-- Running <--step/solve
//! ```
//!
//! Stepping is only possible from `Initialized` or `Running`. Setting a new
//! initial condition from `Running` returns to `Initialized` and discards
//! the accumulated time and any wave history.

use std::collections::HashMap;
use std::fmt;

use crate::physics::Grid;

// =================================================================================================
// Solver state
// =================================================================================================

/// Where a solver is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverState {
    /// Created, parameters not yet set
    Unconfigured,

    /// Parameters set, no initial condition yet
    Configured,

    /// Initial condition set, no step taken since
    Initialized,

    /// At least one step taken
    Running,
}

impl SolverState {
    /// Whether `step`/`solve` may be called
    pub fn can_step(&self) -> bool {
        matches!(self, SolverState::Initialized | SolverState::Running)
    }

    /// Name identifier
    pub fn name(&self) -> &'static str {
        match self {
            SolverState::Unconfigured => "Unconfigured",
            SolverState::Configured => "Configured",
            SolverState::Initialized => "Initialized",
            SolverState::Running => "Running",
        }
    }
}

impl fmt::Display for SolverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =================================================================================================
// Simulation result
// =================================================================================================

/// Captured frames of a run
///
/// Produced by [`PdeSolver::solve_with_frames`]. `frames[k]` is the field at
/// `time_points[k]`; the first frame is the field before the run and the
/// last one is always the final field.
///
/// [`PdeSolver::solve_with_frames`]: crate::solver::PdeSolver::solve_with_frames
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Simulation time of each frame
    pub time_points: Vec<f64>,

    /// Field snapshots, aligned with `time_points`
    pub frames: Vec<Grid>,

    /// Field after the last step
    pub final_field: Grid,

    /// Free-form diagnostics (equation, boundary, dt, ...)
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    /// Build a result
    pub fn new(time_points: Vec<f64>, frames: Vec<Grid>, final_field: Grid) -> Self {
        Self {
            time_points,
            frames,
            final_field,
            metadata: HashMap::new(),
        }
    }

    /// Number of captured frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frame was captured
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Add a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Look up a metadata entry
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Apply a scalar reduction to every frame
    ///
    /// ```rust,ignore
    /// let energy = result.series(Grid::sum_of_squares);
    /// ```
    pub fn series<F>(&self, f: F) -> Vec<f64>
    where
        F: Fn(&Grid) -> f64,
    {
        self.frames.iter().map(f).collect()
    }
}
