//! Initial-condition generators
//!
//! Defines the field `u(i, j, t=0)` a solver starts from.
//!
//! Two entry points:
//!
//! - [`InitialProfile`]: a reusable description of the field, evaluated cell
//!   by cell and materialised with [`InitialProfile::generate`]
//! - [`InitialConditions`]: one-call constructors returning a [`Grid`]
//!   directly, for the common cases
//!
//! # Example
//!
//! ```rust
//! use pde_rs::models::{InitialConditions, SineDirection};
//!
//! # fn main() -> pde_rs::Result<()> {
//! let pulse = InitialConditions::gaussian_pulse((40, 40), (20.0, 20.0), 5.0, 2.0)?;
//! assert!((pulse.max() - 2.0).abs() < 1e-12);
//!
//! let stripes = InitialConditions::sine_wave((30, 30), 10.0, 1.0, SineDirection::Diagonal)?;
//! assert_eq!(stripes.shape(), (30, 30));
//! # Ok(())
//! # }
//! ```
//!
//! # Coordinates
//!
//! Positions are `(i, j)` cell indices: `i` is the row, `j` the column.
//! Profiles are defined in index space, independent of the grid spacing.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use crate::error::{PdeError, Result, require_finite, require_positive};
use crate::physics::grid::check_shape;
use crate::physics::Grid;

/// Axis along which a [`InitialProfile::SineWave`] oscillates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SineDirection {
    /// Varies with the column index `j`, constant down each column
    Horizontal,

    /// Varies with the row index `i`
    Vertical,

    /// Varies with `i + j`
    Diagonal,
}

impl SineDirection {
    fn phase(&self, i: usize, j: usize) -> f64 {
        match self {
            SineDirection::Horizontal => j as f64,
            SineDirection::Vertical => i as f64,
            SineDirection::Diagonal => (i + j) as f64,
        }
    }
}

/// Spatial profile of the initial field
pub enum InitialProfile {
    /// Zero everywhere
    Zeros,

    /// Isolated cells set to a value, everything else zero
    ///
    /// Repeated positions accumulate.
    PointSources(Vec<(usize, usize, f64)>),

    /// Gaussian bump
    ///
    /// ```text
    /// u(i, j) = A * exp(-((i - ci)^2 + (j - cj)^2) / (2 sigma^2))
    /// ```
    GaussianPulse {
        center: (f64, f64),
        sigma: f64,
        amplitude: f64,
    },

    /// Raised-cosine disc, `A` at the centre falling smoothly to zero at
    /// `radius`
    ///
    /// ```text
    /// u(r) = A * (1 + cos(pi r / R)) / 2   for r < R, else 0
    /// ```
    CircularWave {
        center: (f64, f64),
        radius: f64,
        amplitude: f64,
    },

    /// Plane sine wave, `A * sin(2 pi s / wavelength)` with `s` chosen by
    /// the direction
    SineWave {
        wavelength: f64,
        amplitude: f64,
        direction: SineDirection,
    },

    /// Constant value on the half-open block `[i0, i1) x [j0, j1)`
    SquarePatch {
        start: (usize, usize),
        end: (usize, usize),
        value: f64,
    },

    /// User-defined function of `(i, j)`
    Custom(Arc<dyn Fn(usize, usize) -> f64 + Send + Sync>),
}

// ==================== Manual Clone Implementation ====================

impl Clone for InitialProfile {
    fn clone(&self) -> Self {
        match self {
            Self::Zeros => Self::Zeros,
            Self::PointSources(sources) => Self::PointSources(sources.clone()),
            Self::GaussianPulse { center, sigma, amplitude } => Self::GaussianPulse {
                center: *center,
                sigma: *sigma,
                amplitude: *amplitude,
            },
            Self::CircularWave { center, radius, amplitude } => Self::CircularWave {
                center: *center,
                radius: *radius,
                amplitude: *amplitude,
            },
            Self::SineWave { wavelength, amplitude, direction } => Self::SineWave {
                wavelength: *wavelength,
                amplitude: *amplitude,
                direction: *direction,
            },
            Self::SquarePatch { start, end, value } => Self::SquarePatch {
                start: *start,
                end: *end,
                value: *value,
            },
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

// ==================== Manual Debug Implementation ====================

impl fmt::Debug for InitialProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zeros => f.debug_struct("Zeros").finish(),
            Self::PointSources(sources) => f.debug_tuple("PointSources").field(sources).finish(),
            Self::GaussianPulse { center, sigma, amplitude } => f
                .debug_struct("GaussianPulse")
                .field("center", center)
                .field("sigma", sigma)
                .field("amplitude", amplitude)
                .finish(),
            Self::CircularWave { center, radius, amplitude } => f
                .debug_struct("CircularWave")
                .field("center", center)
                .field("radius", radius)
                .field("amplitude", amplitude)
                .finish(),
            Self::SineWave { wavelength, amplitude, direction } => f
                .debug_struct("SineWave")
                .field("wavelength", wavelength)
                .field("amplitude", amplitude)
                .field("direction", direction)
                .finish(),
            Self::SquarePatch { start, end, value } => f
                .debug_struct("SquarePatch")
                .field("start", start)
                .field("end", end)
                .field("value", value)
                .finish(),
            Self::Custom(_) => f
                .debug_struct("Custom")
                .field("function", &"<user-defined>")
                .finish(),
        }
    }
}

// ==================== Implementation ====================

impl InitialProfile {
    /// Create a custom profile
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(usize, usize) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Check the profile against a grid shape
    ///
    /// # Errors
    ///
    /// - [`PdeError::InvalidShape`] for a zero dimension
    /// - [`PdeError::InvalidParameter`] for a non-positive sigma, radius or
    ///   wavelength, or a non-finite amplitude
    /// - [`PdeError::Configuration`] for a source or patch outside the grid
    pub fn validate(&self, shape: (usize, usize)) -> Result<()> {
        let (rows, cols) = shape;
        check_shape(rows, cols)?;

        match self {
            Self::Zeros | Self::Custom(_) => {}

            Self::PointSources(sources) => {
                for &(i, j, value) in sources {
                    if i >= rows || j >= cols {
                        return Err(PdeError::Configuration(format!(
                            "source at ({i}, {j}) lies outside the {rows}x{cols} grid"
                        )));
                    }
                    require_finite("value", value)?;
                }
            }

            Self::GaussianPulse { center, sigma, amplitude } => {
                require_finite("center.0", center.0)?;
                require_finite("center.1", center.1)?;
                require_positive("sigma", *sigma)?;
                require_finite("amplitude", *amplitude)?;
            }

            Self::CircularWave { center, radius, amplitude } => {
                require_finite("center.0", center.0)?;
                require_finite("center.1", center.1)?;
                require_positive("radius", *radius)?;
                require_finite("amplitude", *amplitude)?;
            }

            Self::SineWave { wavelength, amplitude, .. } => {
                require_positive("wavelength", *wavelength)?;
                require_finite("amplitude", *amplitude)?;
            }

            Self::SquarePatch { start, end, value } => {
                let (i0, j0) = *start;
                let (i1, j1) = *end;
                if i0 >= i1 || j0 >= j1 || i1 > rows || j1 > cols {
                    return Err(PdeError::Configuration(format!(
                        "patch [{i0}, {i1}) x [{j0}, {j1}) is empty or exceeds the {rows}x{cols} grid"
                    )));
                }
                require_finite("value", *value)?;
            }
        }

        Ok(())
    }

    /// Evaluate the profile at cell `(i, j)`
    pub fn evaluate(&self, i: usize, j: usize) -> f64 {
        match self {
            Self::Zeros => 0.0,

            Self::PointSources(sources) => sources
                .iter()
                .filter(|&&(si, sj, _)| si == i && sj == j)
                .map(|&(_, _, value)| value)
                .sum(),

            Self::GaussianPulse { center, sigma, amplitude } => {
                let r2 = squared_distance(i, j, *center);
                amplitude * (-r2 / (2.0 * sigma * sigma)).exp()
            }

            Self::CircularWave { center, radius, amplitude } => {
                let r = squared_distance(i, j, *center).sqrt();
                if r < *radius {
                    amplitude * 0.5 * (1.0 + (PI * r / radius).cos())
                } else {
                    0.0
                }
            }

            Self::SineWave { wavelength, amplitude, direction } => {
                amplitude * (2.0 * PI * direction.phase(i, j) / wavelength).sin()
            }

            Self::SquarePatch { start, end, value } => {
                if (start.0..end.0).contains(&i) && (start.1..end.1).contains(&j) {
                    *value
                } else {
                    0.0
                }
            }

            Self::Custom(f) => f(i, j),
        }
    }

    /// Materialise the profile on a `(rows, cols)` grid
    pub fn generate(&self, shape: (usize, usize)) -> Result<Grid> {
        self.validate(shape)?;

        if let Self::PointSources(sources) = self {
            let mut grid = Grid::zeros(shape.0, shape.1)?;
            for &(i, j, value) in sources {
                grid[(i, j)] += value;
            }
            return Ok(grid);
        }

        Grid::from_fn(shape.0, shape.1, |i, j| self.evaluate(i, j))
    }
}

fn squared_distance(i: usize, j: usize, center: (f64, f64)) -> f64 {
    let di = i as f64 - center.0;
    let dj = j as f64 - center.1;
    di * di + dj * dj
}

// =================================================================================================
// One-call constructors
// =================================================================================================

/// Shorthand constructors returning a ready [`Grid`]
///
/// Each function is `InitialProfile::<variant>.generate(shape)`.
pub struct InitialConditions;

impl InitialConditions {
    /// Zero field
    pub fn zeros(shape: (usize, usize)) -> Result<Grid> {
        InitialProfile::Zeros.generate(shape)
    }

    /// Single hot cell
    pub fn point_source(shape: (usize, usize), position: (usize, usize), value: f64) -> Result<Grid> {
        InitialProfile::PointSources(vec![(position.0, position.1, value)]).generate(shape)
    }

    /// Several hot cells, `(i, j, value)` each
    pub fn multiple_sources(shape: (usize, usize), sources: &[(usize, usize, f64)]) -> Result<Grid> {
        InitialProfile::PointSources(sources.to_vec()).generate(shape)
    }

    /// Gaussian bump of width `sigma` (in cells)
    pub fn gaussian_pulse(
        shape: (usize, usize),
        center: (f64, f64),
        sigma: f64,
        amplitude: f64,
    ) -> Result<Grid> {
        InitialProfile::GaussianPulse { center, sigma, amplitude }.generate(shape)
    }

    /// Raised-cosine disc of the given radius (in cells)
    pub fn circular_wave(
        shape: (usize, usize),
        center: (f64, f64),
        radius: f64,
        amplitude: f64,
    ) -> Result<Grid> {
        InitialProfile::CircularWave { center, radius, amplitude }.generate(shape)
    }

    /// Plane sine wave
    pub fn sine_wave(
        shape: (usize, usize),
        wavelength: f64,
        amplitude: f64,
        direction: SineDirection,
    ) -> Result<Grid> {
        InitialProfile::SineWave { wavelength, amplitude, direction }.generate(shape)
    }

    /// Constant block `[start.0, end.0) x [start.1, end.1)`
    pub fn square_patch(
        shape: (usize, usize),
        start: (usize, usize),
        end: (usize, usize),
        value: f64,
    ) -> Result<Grid> {
        InitialProfile::SquarePatch { start, end, value }.generate(shape)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zeros() {
        let grid = InitialConditions::zeros((4, 6)).unwrap();
        assert_eq!(grid.shape(), (4, 6));
        assert_eq!(grid.sum(), 0.0);
    }

    #[test]
    fn test_invalid_shape() {
        let err = InitialConditions::zeros((0, 3)).unwrap_err();
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_point_source() {
        let grid = InitialConditions::point_source((5, 5), (1, 3), 100.0).unwrap();
        assert_eq!(grid[(1, 3)], 100.0);
        assert_eq!(grid.sum(), 100.0);
    }

    #[test]
    fn test_source_outside_grid() {
        let err = InitialConditions::point_source((5, 5), (5, 0), 1.0).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_multiple_sources_accumulate() {
        let grid =
            InitialConditions::multiple_sources((6, 6), &[(1, 1, 2.0), (4, 4, 3.0), (1, 1, 0.5)]).unwrap();
        assert_eq!(grid[(1, 1)], 2.5);
        assert_eq!(grid[(4, 4)], 3.0);
        assert_eq!(grid.sum(), 5.5);

        let profile = InitialProfile::PointSources(vec![(1, 1, 2.0), (1, 1, 0.5)]);
        assert_eq!(profile.evaluate(1, 1), 2.5);
    }

    #[test]
    fn test_gaussian_pulse() {
        let grid = InitialConditions::gaussian_pulse((21, 21), (10.0, 10.0), 2.0, 3.0).unwrap();

        assert_relative_eq!(grid[(10, 10)], 3.0);
        // One sigma away: exp(-1/2)
        assert_relative_eq!(grid[(12, 10)], 3.0 * (-0.5f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(grid[(10, 8)], grid[(12, 10)], epsilon = 1e-12);
        assert!(grid[(0, 0)] < 1e-8);
    }

    #[test]
    fn test_gaussian_rejects_bad_sigma() {
        let err = InitialConditions::gaussian_pulse((5, 5), (2.0, 2.0), 0.0, 1.0).unwrap_err();
        assert!(err.is_parameter_error());
    }

    #[test]
    fn test_circular_wave() {
        let grid = InitialConditions::circular_wave((40, 40), (20.0, 20.0), 8.0, 1.0).unwrap();

        assert_relative_eq!(grid[(20, 20)], 1.0);
        assert_relative_eq!(grid[(24, 20)], 0.5, epsilon = 1e-12);
        assert_eq!(grid[(28, 20)], 0.0);
        assert_eq!(grid[(0, 0)], 0.0);
        assert!(grid.min() >= 0.0);
    }

    #[test]
    fn test_sine_wave_directions() {
        let h = InitialConditions::sine_wave((8, 8), 4.0, 1.0, SineDirection::Horizontal).unwrap();
        assert_relative_eq!(h[(0, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(h[(5, 1)], 1.0, epsilon = 1e-12);

        let v = InitialConditions::sine_wave((8, 8), 4.0, 1.0, SineDirection::Vertical).unwrap();
        assert_relative_eq!(v[(1, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(v[(1, 5)], 1.0, epsilon = 1e-12);

        let d = InitialConditions::sine_wave((8, 8), 4.0, 1.0, SineDirection::Diagonal).unwrap();
        assert_relative_eq!(d[(1, 2)], d[(2, 1)], epsilon = 1e-12);
        assert_relative_eq!(d[(1, 2)], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sine_wave_rejects_bad_wavelength() {
        let err = InitialConditions::sine_wave((5, 5), -1.0, 1.0, SineDirection::Vertical).unwrap_err();
        assert!(err.is_parameter_error());
    }

    #[test]
    fn test_square_patch() {
        let grid = InitialConditions::square_patch((10, 10), (2, 3), (5, 7), 4.0).unwrap();
        assert_eq!(grid[(2, 3)], 4.0);
        assert_eq!(grid[(4, 6)], 4.0);
        assert_eq!(grid[(5, 6)], 0.0);
        assert_eq!(grid[(4, 7)], 0.0);
        assert_eq!(grid.sum(), 3.0 * 4.0 * 4.0);

        let err = InitialConditions::square_patch((10, 10), (2, 3), (11, 7), 1.0).unwrap_err();
        assert!(err.is_configuration_error());
        let err = InitialConditions::square_patch((10, 10), (5, 3), (5, 7), 1.0).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_custom_profile() {
        let profile = InitialProfile::custom(|i, j| (i * 10 + j) as f64);
        let grid = profile.generate((3, 4)).unwrap();

        assert_eq!(grid[(2, 3)], 23.0);
        assert_eq!(format!("{:?}", profile), "Custom { function: \"<user-defined>\" }");
    }
}
