//! Leapfrog scheme for the scalar wave equation
//!
//! # Mathematical Background
//!
//! ```text
//! d2u/dt2 = c^2 * lap(u)
//! ```
//!
//! Centred differences in both time and space give the two-level update
//!
//! ```text
//! u_{n+1} = 2 u_n - u_{n-1} + (c dt)^2 * lap(u_n)
//! ```
//!
//! so the stepper keeps one historical field, `u_{n-1}`. When no history
//! exists (first step after an initial condition) it is taken equal to the
//! current field, which corresponds to a zero initial velocity.
//!
//! # Characteristics
//!
//! - **Order**: second order in time and space
//! - **Stability**: CFL condition `c * dt * sqrt(1/dx^2 + 1/dy^2) <= 1`
//! - **Memory**: two fields
//!
//! Without wraparound the edge cells of `u_{n+1}` hold `2 u_n - u_{n-1}`
//! (zero Laplacian) until the boundary condition overwrites them.
//!
//! An absorbing layer damps both `u_{n+1}` and the stored `u_n` with the same
//! factors. Damping only the new level would let `2 u_n - u_{n-1}` return the
//! removed amplitude as velocity.

use crate::physics::{Grid, WaveParameters};
use crate::solver::boundary::BoundaryCondition;
use crate::solver::stencil::laplacian;

/// Explicit wave-equation stepper
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeapfrogScheme {
    params: WaveParameters,

    /// `u_{n-1}`; `None` until the first step
    previous: Option<Grid>,
}

impl LeapfrogScheme {
    /// Stepper for the given parameters
    pub fn new(params: WaveParameters) -> Self {
        Self {
            params,
            previous: None,
        }
    }

    /// Current parameters
    pub fn parameters(&self) -> WaveParameters {
        self.params
    }

    pub(crate) fn set_parameters(&mut self, params: WaveParameters) {
        self.params = params;
    }

    /// Previous field, if a step has been taken
    pub fn previous(&self) -> Option<&Grid> {
        self.previous.as_ref()
    }

    /// Forget the history (zero initial velocity on the next step)
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Advance `field` by one time step
    pub fn step(&mut self, field: &mut Grid, boundary: &BoundaryCondition) {
        let lap = laplacian(field, boundary.wraps_stencil());
        let courant_sq = (self.params.c * self.params.dt).powi(2);

        let mut previous = self.previous.take().unwrap_or_else(|| field.clone());
        let next = field.as_matrix() * 2.0 - previous.as_matrix() + lap * courant_sq;

        // u_{n-1} <- u_n, u_n <- u_{n+1}
        let current = std::mem::replace(field.as_mut_matrix(), next);
        *previous.as_mut_matrix() = current;

        let dt = self.params.dt;
        boundary.apply(field, dt);
        boundary.attenuate(&mut previous, dt);
        self.previous = Some(previous);
    }

    /// Name used in logs and result metadata
    pub fn name(&self) -> &'static str {
        "Leapfrog"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
