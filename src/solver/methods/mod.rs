//! Time-stepping methods
//!
//! One explicit method per supported equation:
//!
//! - **[`FtcsScheme`]**: forward Euler in time, five-point Laplacian in space
//!   (heat equation). First order in time, one field of state.
//! - **[`LeapfrogScheme`]**: centred second differences in time and space
//!   (wave equation). Second order, keeps `u_{n-1}` as extra state.
//!
//! # Dispatch
//!
//! [`UpdateRule`] is a closed enum over the two methods. The methods share
//! the grid, the stencil and the boundary condition, and nothing else: the
//! wave method's history field has no counterpart in the heat method, so
//! there is no common base type beyond `(field, boundary)`.
//!
//! # Example
//!
//! ```rust
//! use pde_rs::physics::{EquationKind, Grid};
//! use pde_rs::solver::{BoundaryCondition, UpdateRule};
//!
//! let mut rule = UpdateRule::for_kind(EquationKind::Heat);
//! let mut field = Grid::filled(8, 8, 1.0).unwrap();
//!
//! rule.step(&mut field, &BoundaryCondition::Neumann(0.0));
//! assert_eq!(rule.kind(), EquationKind::Heat);
//! ```

pub mod ftcs;
pub mod leapfrog;

pub use ftcs::FtcsScheme;
pub use leapfrog::LeapfrogScheme;

use crate::error::{PdeError, Result};
use crate::physics::{EquationKind, Grid, PhysicalParameters};
use crate::solver::boundary::BoundaryCondition;

/// Closed selection of the update rule
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateRule {
    /// Heat equation, FTCS
    Heat(FtcsScheme),

    /// Wave equation, leapfrog
    Wave(LeapfrogScheme),
}

impl UpdateRule {
    /// Update rule with default parameters for `kind`
    pub fn for_kind(kind: EquationKind) -> Self {
        match kind {
            EquationKind::Heat => UpdateRule::Heat(FtcsScheme::default()),
            EquationKind::Wave => UpdateRule::Wave(LeapfrogScheme::default()),
        }
    }

    /// Equation handled by this rule
    pub fn kind(&self) -> EquationKind {
        match self {
            UpdateRule::Heat(_) => EquationKind::Heat,
            UpdateRule::Wave(_) => EquationKind::Wave,
        }
    }

    /// Method name
    pub fn name(&self) -> &'static str {
        match self {
            UpdateRule::Heat(scheme) => scheme.name(),
            UpdateRule::Wave(scheme) => scheme.name(),
        }
    }

    /// Current parameters
    pub fn parameters(&self) -> PhysicalParameters {
        match self {
            UpdateRule::Heat(scheme) => PhysicalParameters::Heat(scheme.parameters()),
            UpdateRule::Wave(scheme) => PhysicalParameters::Wave(scheme.parameters()),
        }
    }

    /// Replace the parameters
    ///
    /// # Errors
    ///
    /// - [`PdeError::Configuration`] when `params` belong to the other equation
    /// - [`PdeError::InvalidParameter`] when they fail validation
    pub fn set_parameters(&mut self, params: PhysicalParameters) -> Result<()> {
        params.validate()?;
        match (self, params) {
            (UpdateRule::Heat(scheme), PhysicalParameters::Heat(p)) => scheme.set_parameters(p),
            (UpdateRule::Wave(scheme), PhysicalParameters::Wave(p)) => scheme.set_parameters(p),
            (rule, params) => {
                return Err(PdeError::Configuration(format!(
                    "{} parameters cannot configure a {} solver",
                    params.kind(),
                    rule.kind()
                )));
            }
        }
        Ok(())
    }

    /// Drop any time history
    pub fn reset(&mut self) {
        if let UpdateRule::Wave(scheme) = self {
            scheme.reset();
        }
    }

    /// Advance `field` by one step, stencil then boundary
    pub fn step(&mut self, field: &mut Grid, boundary: &BoundaryCondition) {
        match self {
            UpdateRule::Heat(scheme) => scheme.step(field, boundary),
            UpdateRule::Wave(scheme) => scheme.step(field, boundary),
        }
    }
}
