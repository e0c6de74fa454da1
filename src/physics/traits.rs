//! Equation kinds and their physical parameters
//!
//! This module defines the physics side of the API:
//! - [`EquationKind`]: closed selector between the two supported PDEs
//! - [`HeatParameters`] / [`WaveParameters`]: typed parameter sets
//! - [`PhysicalParameters`]: the closed union the solver stores
//!
//! # Stability Numbers
//!
//! Both explicit schemes are conditionally stable. The dimensionless number
//! returned by `stability_number()` must stay below `stability_limit()`:
//!
//! ```text
//! heat : alpha * dt * (1/dx^2 + 1/dy^2)      <= 0.5
//! wave : c * dt * sqrt(1/dx^2 + 1/dy^2)      <= 1.0   (CFL)
//! ```
//!
//! Exceeding the bound is never an error; it is reported through
//! [`PhysicalParameters::is_stable`].

use std::fmt;
use std::str::FromStr;

use crate::error::{PdeError, Result, require_positive};

/// Stability bound of the explicit heat scheme (FTCS)
pub const HEAT_STABILITY_LIMIT: f64 = 0.5;

/// CFL bound of the leapfrog wave scheme
pub const WAVE_CFL_LIMIT: f64 = 1.0;

// =================================================================================================
// Equation kind
// =================================================================================================

/// Supported time-dependent PDEs
///
/// # Example
///
/// ```rust
/// use pde_rs::physics::EquationKind;
///
/// let kind: EquationKind = "wave".parse().unwrap();
/// assert_eq!(kind, EquationKind::Wave);
/// assert!("burgers".parse::<EquationKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquationKind {
    /// Diffusion `du/dt = alpha * lap(u)`
    Heat,

    /// Scalar wave `d2u/dt2 = c^2 * lap(u)`
    Wave,
}

impl EquationKind {
    /// Lowercase identifier
    pub fn name(&self) -> &'static str {
        match self {
            EquationKind::Heat => "heat",
            EquationKind::Wave => "wave",
        }
    }

    /// Parameter names accepted by `set_parameters` for this equation
    pub fn parameter_names(&self) -> &'static [&'static str] {
        match self {
            EquationKind::Heat => &["alpha", "dt"],
            EquationKind::Wave => &["c", "dt"],
        }
    }

    /// Default parameters for this equation
    pub fn default_parameters(&self) -> PhysicalParameters {
        match self {
            EquationKind::Heat => PhysicalParameters::Heat(HeatParameters::default()),
            EquationKind::Wave => PhysicalParameters::Wave(WaveParameters::default()),
        }
    }
}

impl FromStr for EquationKind {
    type Err = PdeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heat" | "diffusion" => Ok(EquationKind::Heat),
            "wave" => Ok(EquationKind::Wave),
            other => Err(PdeError::UnsupportedEquation(other.to_string())),
        }
    }
}

impl fmt::Display for EquationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =================================================================================================
// Parameter sets
// =================================================================================================

/// Parameters of the heat equation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatParameters {
    /// Diffusivity (> 0)
    pub alpha: f64,

    /// Time step (> 0)
    pub dt: f64,
}

impl Default for HeatParameters {
    fn default() -> Self {
        Self { alpha: 0.25, dt: 0.1 }
    }
}

impl HeatParameters {
    /// Validated constructor
    pub fn new(alpha: f64, dt: f64) -> Result<Self> {
        let params = Self { alpha, dt };
        params.validate()?;
        Ok(params)
    }

    /// Both values finite and strictly positive
    pub fn validate(&self) -> Result<()> {
        require_positive("alpha", self.alpha)?;
        require_positive("dt", self.dt)?;
        Ok(())
    }

    /// `alpha * dt * (1/dx^2 + 1/dy^2)`
    pub fn stability_number(&self, dx: f64, dy: f64) -> f64 {
        self.alpha * self.dt * (1.0 / (dx * dx) + 1.0 / (dy * dy))
    }

    /// Largest `dt` satisfying the bound for the current `alpha`
    pub fn max_stable_dt(&self, dx: f64, dy: f64) -> f64 {
        HEAT_STABILITY_LIMIT / (self.alpha * (1.0 / (dx * dx) + 1.0 / (dy * dy)))
    }
}

/// Parameters of the wave equation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParameters {
    /// Wave speed (> 0)
    pub c: f64,

    /// Time step (> 0)
    pub dt: f64,
}

impl Default for WaveParameters {
    fn default() -> Self {
        Self { c: 1.0, dt: 0.05 }
    }
}

impl WaveParameters {
    /// Validated constructor
    pub fn new(c: f64, dt: f64) -> Result<Self> {
        let params = Self { c, dt };
        params.validate()?;
        Ok(params)
    }

    /// Both values finite and strictly positive
    pub fn validate(&self) -> Result<()> {
        require_positive("c", self.c)?;
        require_positive("dt", self.dt)?;
        Ok(())
    }

    /// Courant number `c * dt * sqrt(1/dx^2 + 1/dy^2)`
    pub fn stability_number(&self, dx: f64, dy: f64) -> f64 {
        self.c * self.dt * (1.0 / (dx * dx) + 1.0 / (dy * dy)).sqrt()
    }

    /// Largest `dt` satisfying the CFL bound for the current `c`
    pub fn max_stable_dt(&self, dx: f64, dy: f64) -> f64 {
        WAVE_CFL_LIMIT / (self.c * (1.0 / (dx * dx) + 1.0 / (dy * dy)).sqrt())
    }
}

/// Closed union of parameter sets, tagged by equation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicalParameters {
    /// Heat equation parameters
    Heat(HeatParameters),

    /// Wave equation parameters
    Wave(WaveParameters),
}

impl PhysicalParameters {
    /// Equation these parameters belong to
    pub fn kind(&self) -> EquationKind {
        match self {
            PhysicalParameters::Heat(_) => EquationKind::Heat,
            PhysicalParameters::Wave(_) => EquationKind::Wave,
        }
    }

    /// Time step
    pub fn dt(&self) -> f64 {
        match self {
            PhysicalParameters::Heat(p) => p.dt,
            PhysicalParameters::Wave(p) => p.dt,
        }
    }

    /// Validate the wrapped set
    pub fn validate(&self) -> Result<()> {
        match self {
            PhysicalParameters::Heat(p) => p.validate(),
            PhysicalParameters::Wave(p) => p.validate(),
        }
    }

    /// Look up a parameter by name
    pub fn get(&self, name: &str) -> Option<f64> {
        match (self, name) {
            (PhysicalParameters::Heat(p), "alpha") => Some(p.alpha),
            (PhysicalParameters::Wave(p), "c") => Some(p.c),
            (_, "dt") => Some(self.dt()),
            _ => None,
        }
    }

    /// Return a copy with the named parameters replaced
    ///
    /// Names are checked against [`EquationKind::parameter_names`] and values
    /// validated, so a failed call never yields a half-updated set.
    ///
    /// # Errors
    ///
    /// - [`PdeError::Configuration`] for a name the equation does not know
    /// - [`PdeError::InvalidParameter`] for non-finite or non-positive values
    pub fn with_named(&self, named: &[(&str, f64)]) -> Result<Self> {
        let mut updated = *self;

        for &(name, value) in named {
            match (&mut updated, name) {
                (PhysicalParameters::Heat(p), "alpha") => p.alpha = require_positive(name, value)?,
                (PhysicalParameters::Wave(p), "c") => p.c = require_positive(name, value)?,
                (PhysicalParameters::Heat(p), "dt") => p.dt = require_positive(name, value)?,
                (PhysicalParameters::Wave(p), "dt") => p.dt = require_positive(name, value)?,
                (params, _) => {
                    let kind = params.kind();
                    return Err(PdeError::Configuration(format!(
                        "unknown parameter '{}' for {} equation (expected one of {:?})",
                        name,
                        kind,
                        kind.parameter_names()
                    )));
                }
            }
        }

        Ok(updated)
    }

    /// Dimensionless stability number for the given spacing
    pub fn stability_number(&self, dx: f64, dy: f64) -> f64 {
        match self {
            PhysicalParameters::Heat(p) => p.stability_number(dx, dy),
            PhysicalParameters::Wave(p) => p.stability_number(dx, dy),
        }
    }

    /// Upper bound the stability number must not exceed
    pub fn stability_limit(&self) -> f64 {
        match self {
            PhysicalParameters::Heat(_) => HEAT_STABILITY_LIMIT,
            PhysicalParameters::Wave(_) => WAVE_CFL_LIMIT,
        }
    }

    /// Whether the explicit scheme is stable for the given spacing
    pub fn is_stable(&self, dx: f64, dy: f64) -> bool {
        self.stability_number(dx, dy) <= self.stability_limit()
    }

    /// Largest stable time step for the given spacing
    pub fn max_stable_dt(&self, dx: f64, dy: f64) -> f64 {
        match self {
            PhysicalParameters::Heat(p) => p.max_stable_dt(dx, dy),
            PhysicalParameters::Wave(p) => p.max_stable_dt(dx, dy),
        }
    }
}

impl fmt::Display for PhysicalParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalParameters::Heat(p) => write!(f, "heat(alpha={}, dt={})", p.alpha, p.dt),
            PhysicalParameters::Wave(p) => write!(f, "wave(c={}, dt={})", p.c, p.dt),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
