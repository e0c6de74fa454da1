//! Error types for solver construction, configuration and stepping.
//!
//! Every contract violation is reported synchronously by the call that
//! violates it. Stability-bound violations are deliberately absent from this
//! enum: they are advisory (see [`PdeSolver::advisory_is_stable`]).
//!
//! [`PdeSolver::advisory_is_stable`]: crate::solver::PdeSolver::advisory_is_stable

use thiserror::Error;

/// Errors raised by grids, boundary conditions, solvers and the explorer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PdeError {
    /// Grid dimensions are not strictly positive.
    #[error("invalid grid shape ({rows}, {cols}): both dimensions must be > 0")]
    InvalidShape {
        /// Requested number of rows
        rows: usize,
        /// Requested number of columns
        cols: usize,
    },

    /// A field does not match the solver's grid shape.
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Shape the solver was built with
        expected: (usize, usize),
        /// Shape of the offending field
        found: (usize, usize),
    },

    /// Unknown parameter name, unknown boundary/equation kind, or an
    /// operation called out of lifecycle order.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A physical parameter is non-finite or outside its allowed range.
    #[error("invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Rejected value
        value: f64,
        /// Constraint that was violated
        reason: &'static str,
    },

    /// Equation kind outside {heat, wave}.
    #[error("unsupported equation '{0}' (supported: heat, wave)")]
    UnsupportedEquation(String),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, PdeError>;

impl PdeError {
    /// Shorthand for a [`PdeError::InvalidParameter`] on a named value.
    pub(crate) fn invalid(name: &str, value: f64, reason: &'static str) -> Self {
        PdeError::InvalidParameter {
            name: name.to_string(),
            value,
            reason,
        }
    }

    /// Returns `true` for grid-shape problems (bad dimensions or mismatch).
    pub fn is_shape_error(&self) -> bool {
        matches!(self, PdeError::InvalidShape { .. } | PdeError::ShapeMismatch { .. })
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, PdeError::Configuration(_))
    }

    /// Returns `true` if this is an invalid-parameter error.
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, PdeError::InvalidParameter { .. })
    }
}

/// Reject non-finite or non-positive values.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(PdeError::invalid(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(PdeError::invalid(name, value, "must be > 0"));
    }
    Ok(value)
}

/// Reject non-finite values.
pub(crate) fn require_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PdeError::invalid(name, value, "must be finite"))
    }
}
