//! Physical definitions
//!
//! This module holds WHAT is being solved, independent of the numerical
//! method:
//!
//! - **Grid**: the 2D scalar field and its spacing
//! - **Equation kind**: heat (diffusion) or scalar wave
//! - **Parameters**: diffusivity / wave speed and time step, with the
//!   stability bound of each explicit scheme
//!
//! # Architecture
//!
//! Physics is **separate from numerics**:
//! - this module describes the field and the equation
//! - [`crate::solver`] applies the stencil, the time-stepping scheme and
//!   the boundary condition
//!
//! # Example
//!
//! ```rust
//! use pde_rs::physics::{EquationKind, Grid, HeatParameters, PhysicalParameters};
//!
//! let grid = Grid::zeros(50, 50).unwrap();
//! let params = PhysicalParameters::Heat(HeatParameters::new(0.25, 0.1).unwrap());
//!
//! assert_eq!(params.kind(), EquationKind::Heat);
//! assert!(params.is_stable(grid.spacing().0, grid.spacing().1));
//! ```

pub mod grid;
pub mod traits;

pub use grid::Grid;
pub use traits::{
    EquationKind,
    HeatParameters,
    PhysicalParameters,
    WaveParameters,
    HEAT_STABILITY_LIMIT,
    WAVE_CFL_LIMIT,
};
