//! Stateful finite-difference solver
//!
//! [`PdeSolver`] owns everything needed to advance one simulation: the
//! equation's update rule and parameters, the grid shape and spacing, the
//! boundary condition, the current field and (for waves) the previous one.
//!
//! # Workflow
//!
//! ```rust
//! use pde_rs::physics::{EquationKind, Grid};
//! use pde_rs::solver::{BoundaryCondition, PdeSolver};
//!
//! # fn main() -> pde_rs::Result<()> {
//! let mut solver = PdeSolver::new(EquationKind::Heat, (50, 50), BoundaryCondition::dirichlet(0.0)?)?;
//! solver.set_parameters(&[("alpha", 0.25), ("dt", 0.1)])?;
//!
//! let mut u0 = Grid::zeros(50, 50)?;
//! u0[(25, 25)] = 100.0;
//! solver.set_initial_conditions(&u0)?;
//!
//! assert!(solver.advisory_is_stable());
//! let u = solver.solve(100)?;
//! assert!(u.max() < 100.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Stepping takes `&mut self`: a solver cannot be advanced from two places at
//! once. Independent solvers share nothing and can run on separate threads,
//! which is what [`crate::explorer`] does.

use log::{debug, warn};
use std::fmt;
use std::str::FromStr;

use crate::error::{PdeError, Result, require_positive};
use crate::physics::grid::check_shape;
use crate::physics::{EquationKind, Grid, PhysicalParameters};
use crate::solver::boundary::BoundaryCondition;
use crate::solver::methods::UpdateRule;
use crate::solver::traits::{SimulationResult, SolverState};

/// Time-stepping solver for the heat and wave equations on a 2D grid
#[derive(Debug, Clone)]
pub struct PdeSolver {
    /// `(rows, cols)`, fixed
    shape: (usize, usize),

    /// Row-axis spacing
    dx: f64,

    /// Column-axis spacing
    dy: f64,

    /// Fixed for the solver's lifetime
    boundary: BoundaryCondition,

    /// Equation-specific update rule, owns the parameters
    rule: UpdateRule,

    /// Whether parameters were explicitly set
    configured: bool,

    /// Current field, `None` until an initial condition is set
    field: Option<Grid>,

    /// Steps taken since the last initial condition
    steps_taken: usize,

    /// Simulation time since the last initial condition
    elapsed: f64,

    /// Non-finite values already logged for this run
    non_finite_reported: bool,
}

impl PdeSolver {
    /// Create a solver for `kind` on a `(rows, cols)` grid
    ///
    /// Parameters start at the equation's defaults but must still be set
    /// (see [`set_parameters`](Self::set_parameters)) before stepping.
    ///
    /// # Errors
    ///
    /// [`PdeError::InvalidShape`] if either dimension is zero.
    pub fn new(kind: EquationKind, shape: (usize, usize), boundary: BoundaryCondition) -> Result<Self> {
        check_shape(shape.0, shape.1)?;

        debug!(
            "created {} solver on {}x{} grid with {} boundary",
            kind, shape.0, shape.1, boundary
        );

        Ok(Self {
            shape,
            dx: 1.0,
            dy: 1.0,
            boundary,
            rule: UpdateRule::for_kind(kind),
            configured: false,
            field: None,
            steps_taken: 0,
            elapsed: 0.0,
            non_finite_reported: false,
        })
    }

    /// Create a solver from an equation name (`"heat"`, `"wave"`)
    ///
    /// # Errors
    ///
    /// - [`PdeError::UnsupportedEquation`] for any other name
    /// - [`PdeError::InvalidShape`] if either dimension is zero
    pub fn from_name(kind: &str, shape: (usize, usize), boundary: BoundaryCondition) -> Result<Self> {
        Self::new(EquationKind::from_str(kind)?, shape, boundary)
    }

    /// Builder: grid spacing (`dx` along rows, `dy` along columns)
    pub fn with_spacing(mut self, dx: f64, dy: f64) -> Result<Self> {
        self.dx = require_positive("dx", dx)?;
        self.dy = require_positive("dy", dy)?;
        if let Some(field) = self.field.take() {
            self.field = Some(field.with_spacing(dx, dy)?);
        }
        Ok(self)
    }

    // ====================================== Configuration ======================================

    /// Set parameters by name
    ///
    /// Heat accepts `alpha` and `dt`, wave accepts `c` and `dt`. Names not
    /// listed keep their current value (the equation default at first).
    ///
    /// # Errors
    ///
    /// - [`PdeError::Configuration`] for an unknown name
    /// - [`PdeError::InvalidParameter`] for a non-finite or non-positive value
    ///
    /// On error the solver is left unchanged.
    pub fn set_parameters(&mut self, named: &[(&str, f64)]) -> Result<()> {
        let params = self.rule.parameters().with_named(named)?;
        self.configure(params)
    }

    /// Set parameters from a typed parameter set
    ///
    /// # Errors
    ///
    /// - [`PdeError::Configuration`] when the set belongs to the other equation
    /// - [`PdeError::InvalidParameter`] when it fails validation
    pub fn configure(&mut self, params: PhysicalParameters) -> Result<()> {
        self.rule.set_parameters(params)?;
        self.configured = true;

        debug!(
            "parameters set to {} (stability number {:.4}, limit {})",
            params,
            self.stability_number(),
            params.stability_limit()
        );
        Ok(())
    }

    /// Set the initial field
    ///
    /// The values are copied; the caller keeps ownership of `field`. Any
    /// previous run is discarded: time and step count restart at zero and the
    /// wave history is dropped (zero initial velocity).
    ///
    /// # Errors
    ///
    /// [`PdeError::ShapeMismatch`] when `field` does not match the grid shape.
    pub fn set_initial_conditions(&mut self, field: &Grid) -> Result<()> {
        if field.shape() != self.shape {
            return Err(PdeError::ShapeMismatch {
                expected: self.shape,
                found: field.shape(),
            });
        }

        let initial = Grid::from_matrix(field.snapshot())?.with_spacing(self.dx, self.dy)?;
        self.field = Some(initial);
        self.rule.reset();
        self.steps_taken = 0;
        self.elapsed = 0.0;
        self.non_finite_reported = false;

        debug!(
            "initial condition set (sum={:.6e}, max={:.6e})",
            field.sum(),
            field.max()
        );
        Ok(())
    }

    // ======================================== Stepping =========================================

    /// Advance one time step
    ///
    /// # Errors
    ///
    /// [`PdeError::Configuration`] when parameters or the initial condition
    /// are missing.
    pub fn step(&mut self) -> Result<()> {
        self.ensure_ready()?;
        self.advance(1);
        self.check_finite();
        Ok(())
    }

    /// Advance `steps` time steps and return a copy of the final field
    ///
    /// `solve(0)` returns the current field unchanged. Parameters violating
    /// the stability bound are logged, not rejected.
    ///
    /// # Errors
    ///
    /// [`PdeError::Configuration`] when parameters or the initial condition
    /// are missing.
    pub fn solve(&mut self, steps: usize) -> Result<Grid> {
        self.ensure_ready()?;
        self.warn_if_unstable();

        debug!(
            "solving {} steps of {} with {} boundary",
            steps,
            self.rule.name(),
            self.boundary
        );

        self.advance(steps);
        self.check_finite();
        self.current()
    }

    /// Advance `steps` time steps, capturing a frame every `every` steps
    ///
    /// Frames: the field before the run, the field after each multiple of
    /// `every`, and always the final field.
    ///
    /// # Errors
    ///
    /// - [`PdeError::Configuration`] when `every == 0`, or when parameters
    ///   or the initial condition are missing
    pub fn solve_with_frames(&mut self, steps: usize, every: usize) -> Result<SimulationResult> {
        if every == 0 {
            return Err(PdeError::Configuration(
                "frame interval must be at least 1 step".to_string(),
            ));
        }
        self.ensure_ready()?;
        self.warn_if_unstable();

        let capacity = steps / every + 2;
        let mut time_points = Vec::with_capacity(capacity);
        let mut frames = Vec::with_capacity(capacity);

        time_points.push(self.elapsed);
        frames.push(self.current()?);

        for k in 1..=steps {
            self.advance(1);
            if k % every == 0 || k == steps {
                time_points.push(self.elapsed);
                frames.push(self.current()?);
            }
        }

        self.check_finite();

        let final_field = self.current()?;
        let mut result = SimulationResult::new(time_points, frames, final_field);

        result.add_metadata("equation", self.kind().name());
        result.add_metadata("method", self.rule.name());
        result.add_metadata("boundary", &self.boundary.to_string());
        result.add_metadata("parameters", &self.parameters().to_string());
        result.add_metadata("steps", &steps.to_string());
        result.add_metadata("frame interval", &every.to_string());
        result.add_metadata("stability number", &self.stability_number().to_string());

        Ok(result)
    }

    // ======================================= Diagnostics =======================================

    /// Whether the current parameters satisfy the stability bound
    ///
    /// - heat: `alpha * dt * (1/dx^2 + 1/dy^2) <= 0.5`
    /// - wave: `c * dt * sqrt(1/dx^2 + 1/dy^2) <= 1.0`
    ///
    /// Advisory only: [`solve`](Self::solve) runs regardless.
    pub fn advisory_is_stable(&self) -> bool {
        self.rule.parameters().is_stable(self.dx, self.dy)
    }

    /// Current value of the stability number
    pub fn stability_number(&self) -> f64 {
        self.rule.parameters().stability_number(self.dx, self.dy)
    }

    /// Bound the stability number must not exceed
    pub fn stability_limit(&self) -> f64 {
        self.rule.parameters().stability_limit()
    }

    /// Largest stable `dt` for the current diffusivity / wave speed
    pub fn max_stable_dt(&self) -> f64 {
        self.rule.parameters().max_stable_dt(self.dx, self.dy)
    }

    // ========================================= Accessors ========================================

    /// Copy of the current field, `None` before an initial condition
    pub fn field(&self) -> Option<Grid> {
        self.field.clone()
    }

    /// Copy of the wave history `u_{n-1}`, if any
    pub fn previous_field(&self) -> Option<Grid> {
        match &self.rule {
            UpdateRule::Wave(scheme) => scheme.previous().cloned(),
            UpdateRule::Heat(_) => None,
        }
    }

    /// Lifecycle state
    pub fn state(&self) -> SolverState {
        match (self.configured, self.field.is_some(), self.steps_taken) {
            (false, _, _) => SolverState::Unconfigured,
            (true, false, _) => SolverState::Configured,
            (true, true, 0) => SolverState::Initialized,
            (true, true, _) => SolverState::Running,
        }
    }

    /// Equation kind
    pub fn kind(&self) -> EquationKind {
        self.rule.kind()
    }

    /// Current parameters
    pub fn parameters(&self) -> PhysicalParameters {
        self.rule.parameters()
    }

    /// Boundary condition
    pub fn boundary(&self) -> &BoundaryCondition {
        &self.boundary
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// `(dx, dy)`
    pub fn spacing(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    /// Steps taken since the last initial condition
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Simulation time since the last initial condition
    pub fn time(&self) -> f64 {
        self.elapsed
    }

    /// Name of the time-stepping method
    pub fn method_name(&self) -> &'static str {
        self.rule.name()
    }

    // ========================================= Internals ========================================

    fn ensure_ready(&self) -> Result<()> {
        match self.state() {
            state if state.can_step() => Ok(()),
            SolverState::Unconfigured => Err(PdeError::Configuration(format!(
                "parameters not set: call set_parameters with {:?} before solving",
                self.kind().parameter_names()
            ))),
            _ => Err(PdeError::Configuration(
                "initial conditions not set: call set_initial_conditions before solving".to_string(),
            )),
        }
    }

    fn current(&self) -> Result<Grid> {
        self.field
            .clone()
            .ok_or_else(|| PdeError::Configuration("initial conditions not set".to_string()))
    }

    fn advance(&mut self, steps: usize) {
        let Some(field) = self.field.as_mut() else {
            return;
        };
        let dt = self.rule.parameters().dt();

        for _ in 0..steps {
            self.rule.step(field, &self.boundary);
            self.steps_taken += 1;
            self.elapsed += dt;
        }
    }

    fn warn_if_unstable(&self) {
        if !self.advisory_is_stable() {
            warn!(
                "{} parameters {} exceed the stability bound ({:.4} > {}); max stable dt is {:.4e}",
                self.kind(),
                self.parameters(),
                self.stability_number(),
                self.stability_limit(),
                self.max_stable_dt()
            );
        }
    }

    fn check_finite(&mut self) {
        if self.non_finite_reported {
            return;
        }
        if let Some(field) = &self.field
            && !field.is_finite()
        {
            warn!(
                "non-finite values in the {} field after {} steps (stability number {:.4})",
                self.kind(),
                self.steps_taken,
                self.stability_number()
            );
            self.non_finite_reported = true;
        }
    }
}

impl fmt::Display for PdeSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PdeSolver({}, {}x{}, {}, {}, {})",
            self.kind(),
            self.shape.0,
            self.shape.1,
            self.boundary,
            self.parameters(),
            self.state()
        )
    }
}

// =================================================================================================
// Tests
// =================================================================================================
