//! pde-rs: Finite-Difference PDE Simulation Framework
//!
//! Explicit finite-difference solvers for the heat (diffusion) equation and
//! the scalar wave equation on a regular 2D grid, with four boundary
//! condition families and tools to explore parameter space.
//!
//! # Architecture
//!
//! pde-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - The grid and the equation parameters define what to solve
//!    - Stencil, time-stepping method and boundary condition define how
//!
//! 2. **Explicit state, explicit errors**
//!    - A solver owns its field; snapshots are copies
//!    - Contract violations are `Result` errors, stability is advisory
//!
//! # Quick Start
//!
//! ```rust
//! use pde_rs::prelude::*;
//!
//! # fn main() -> pde_rs::Result<()> {
//! // 1. Solver for the heat equation with cold edges
//! let mut solver = PdeSolver::new(EquationKind::Heat, (50, 50), BoundaryCondition::dirichlet(0.0)?)?;
//! solver.set_parameters(&[("alpha", 0.25), ("dt", 0.1)])?;
//!
//! // 2. Hot spot in the middle
//! let u0 = InitialConditions::point_source((50, 50), (25, 25), 100.0)?;
//! solver.set_initial_conditions(&u0)?;
//!
//! // 3. Run
//! assert!(solver.advisory_is_stable());
//! let u = solver.solve(100)?;
//!
//! println!("peak after {} steps: {:.3}", solver.steps_taken(), u.max());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: grid and equation definitions
//! - [`models`]: initial-condition generators
//! - [`solver`]: boundary conditions, stencil, time-stepping methods
//! - [`explorer`]: parameter sweeps, grids and sensitivity analysis
//! - [`output`]: result export
//! - [`error`]: crate error type

// Core modules
pub mod error;
pub mod physics;

pub mod models;
pub mod solver;

pub mod explorer;
pub mod output;

pub use error::{PdeError, Result};

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use pde_rs::prelude::*;
    //! ```
    pub use crate::error::{PdeError, Result};
    pub use crate::explorer::{FieldMetrics, ParameterExplorer, RunConfig, SweepResult};
    pub use crate::models::{InitialConditions, InitialProfile, SineDirection};
    pub use crate::physics::{EquationKind, Grid, HeatParameters, PhysicalParameters, WaveParameters};
    pub use crate::solver::{AbsorbingLayer, BoundaryCondition, PdeSolver, SimulationResult, SolverState};
}
