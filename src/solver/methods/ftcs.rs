//! Forward-time centred-space scheme for the heat equation
//!
//! # Mathematical Background
//!
//! The diffusion equation
//!
//! ```text
//! du/dt = alpha * lap(u)
//! ```
//!
//! is advanced with a forward Euler step in time and the five-point
//! Laplacian in space:
//!
//! ```text
//! u_{n+1} = u_n + alpha * dt * lap(u_n)
//! ```
//!
//! followed by the boundary condition.
//!
//! # Characteristics
//!
//! - **Order**: first order in time, second order in space
//! - **Stability**: conditionally stable,
//!   `alpha * dt * (1/dx^2 + 1/dy^2) <= 0.5`
//! - **Memory**: one field, plus one Laplacian buffer per step
//!
//! Beyond the bound the scheme amplifies the highest spatial frequency every
//! step (checkerboard growth). This is reported by the solver's advisory
//! check, never prevented.

use crate::physics::{Grid, HeatParameters};
use crate::solver::boundary::BoundaryCondition;
use crate::solver::stencil::laplacian;

/// Explicit heat-equation stepper
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FtcsScheme {
    params: HeatParameters,
}

impl FtcsScheme {
    /// Stepper for the given parameters
    pub fn new(params: HeatParameters) -> Self {
        Self { params }
    }

    /// Current parameters
    pub fn parameters(&self) -> HeatParameters {
        self.params
    }

    pub(crate) fn set_parameters(&mut self, params: HeatParameters) {
        self.params = params;
    }

    /// Advance `field` by one time step
    ///
    /// Without wraparound the stencil leaves the outer ring unchanged, so
    /// edge cells reach [`BoundaryCondition::apply`] with their pre-step
    /// values.
    pub fn step(&self, field: &mut Grid, boundary: &BoundaryCondition) {
        let lap = laplacian(field, boundary.wraps_stencil());
        let r = self.params.alpha * self.params.dt;

        *field.as_mut_matrix() += lap * r;
        boundary.apply(field, self.params.dt);
    }

    /// Name used in logs and result metadata
    pub fn name(&self) -> &'static str {
        "FTCS (forward Euler)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hot_cell(rows: usize, cols: usize, at: (usize, usize), value: f64) -> Grid {
        let mut grid = Grid::zeros(rows, cols).unwrap();
        grid[at] = value;
        grid
    }

    #[test]
    fn test_single_step_matches_formula() {
        let scheme = FtcsScheme::new(HeatParameters::new(0.25, 0.1).unwrap());
        let mut field = hot_cell(7, 7, (3, 3), 100.0);
        scheme.step(&mut field, &BoundaryCondition::Dirichlet(0.0));

        let r = 0.25 * 0.1;
        assert!((field[(3, 3)] - (100.0 - 4.0 * r * 100.0)).abs() < 1e-12);
        assert!((field[(2, 3)] - r * 100.0).abs() < 1e-12);
        assert!((field[(3, 4)] - r * 100.0).abs() < 1e-12);
        assert_eq!(field[(2, 2)], 0.0);
    }

    #[test]
    fn test_uniform_field_is_steady() {
        let scheme = FtcsScheme::default();
        let mut field = Grid::filled(6, 6, 3.0).unwrap();

        for _ in 0..10 {
            scheme.step(&mut field, &BoundaryCondition::Neumann(0.0));
        }

        assert!(field.as_matrix().iter().all(|v| (v - 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_periodic_step_conserves_sum() {
        let scheme = FtcsScheme::new(HeatParameters::new(0.2, 0.5).unwrap());
        let mut field = hot_cell(8, 8, (0, 0), 10.0);

        for _ in 0..25 {
            scheme.step(&mut field, &BoundaryCondition::Periodic);
        }

        assert!((field.sum() - 10.0).abs() < 1e-10);
        // Corner source spread into all four corners of the tiled domain
        assert!(field[(7, 7)] > 0.0);
        assert!((field[(7, 0)] - field[(0, 7)]).abs() < 1e-12);
    }
}
