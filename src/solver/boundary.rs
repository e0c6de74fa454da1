//! Boundary conditions on the outer ring of a 2D grid
//!
//! # Design
//!
//! The set of conditions is closed: [`BoundaryCondition`] is an enum and the
//! solver pattern-matches on it. Each variant exposes the same two
//! capabilities:
//!
//! - [`apply`](BoundaryCondition::apply): correct the edge cells of a
//!   post-stencil field, in place
//! - [`wraps_stencil`](BoundaryCondition::wraps_stencil): whether the
//!   stencil itself must wrap neighbour indices (periodic domains)
//!
//! Both time-stepping schemes call the exact same code, so a condition
//! behaves identically for heat and wave problems.
//!
//! # Variants
//!
//! | Variant       | Edge cells after `apply`                                   |
//! |---------------|------------------------------------------------------------|
//! | `Dirichlet`   | fixed value                                                |
//! | `Neumann`     | nearest interior neighbour + `flux * spacing`              |
//! | `Periodic`    | untouched, the stencil reads the opposite edge instead     |
//! | `Absorbing`   | zero-gradient copy, then a damping ramp over an edge layer |
//!
//! # Example
//!
//! ```rust
//! use pde_rs::physics::Grid;
//! use pde_rs::solver::BoundaryCondition;
//!
//! let mut grid = Grid::filled(4, 4, 1.0).unwrap();
//! BoundaryCondition::dirichlet(0.0).unwrap().apply(&mut grid, 0.1);
//!
//! assert_eq!(grid[(0, 2)], 0.0);
//! assert_eq!(grid[(1, 1)], 1.0);
//! ```

use std::fmt;

use crate::error::{PdeError, Result, require_finite, require_positive};
use crate::physics::Grid;

/// Fraction of the smaller grid dimension used as default layer width
pub const DEFAULT_LAYER_FRACTION: f64 = 0.15;

/// Minimum default layer width in cells
pub const MIN_LAYER_WIDTH: usize = 2;

/// Default peak damping rate on the outer ring, per unit time
pub const DEFAULT_LAYER_STRENGTH: f64 = 0.5;

// =================================================================================================
// Absorbing layer
// =================================================================================================

/// Damping layer used by [`BoundaryCondition::Absorbing`]
///
/// Cells at depth `d` from the nearest edge (`d = 0` on the outer ring) with
/// `d < width` are attenuated at the rate
///
/// ```text
/// sigma(d) = strength * ((width - d) / width)^2
/// ```
///
/// and multiplied after every step by `exp(-sigma(d) * dt)`. The per-step
/// factor is close to 1 for small `dt`, so the layer attenuates an incoming
/// wave over many steps instead of acting as a wall. The ramp is monotonic:
/// strongest on the outer ring and exactly 1.0 at the inner side of the
/// layer.
///
/// Wave solvers attenuate their stored history with the same factors (see
/// [`BoundaryCondition::attenuate`]); damping only the current field would
/// turn the removed displacement into velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsorbingLayer {
    /// Layer width in cells; `None` picks 15% of the smaller dimension
    /// (at least [`MIN_LAYER_WIDTH`])
    pub width: Option<usize>,

    /// Peak damping rate on the outer ring, per unit time
    pub strength: f64,
}

impl Default for AbsorbingLayer {
    fn default() -> Self {
        Self {
            width: None,
            strength: DEFAULT_LAYER_STRENGTH,
        }
    }
}

impl AbsorbingLayer {
    /// Layer with explicit width and peak damping rate
    pub fn new(width: usize, strength: f64) -> Result<Self> {
        let layer = Self {
            width: Some(width),
            strength,
        };
        layer.validate()?;
        Ok(layer)
    }

    /// Strength finite and positive, width at least one cell
    pub fn validate(&self) -> Result<()> {
        require_positive("strength", self.strength)?;
        if self.width == Some(0) {
            return Err(PdeError::invalid("width", 0.0, "must be at least one cell"));
        }
        Ok(())
    }

    /// Width actually used on a `(rows, cols)` grid
    ///
    /// Never more than half of the smaller dimension (rounded up).
    pub fn resolved_width(&self, rows: usize, cols: usize) -> usize {
        let smaller = rows.min(cols);
        let width = self.width.unwrap_or_else(|| {
            ((smaller as f64 * DEFAULT_LAYER_FRACTION).round() as usize).max(MIN_LAYER_WIDTH)
        });
        width.min(smaller.div_ceil(2))
    }

    /// Damping rate at `depth` inside a layer of `width` cells
    pub fn rate(&self, depth: usize, width: usize) -> f64 {
        if depth >= width {
            return 0.0;
        }
        let s = (width - depth) as f64 / width as f64;
        self.strength * s * s
    }

    /// Per-step multiplier at `depth` for a time step `dt`
    pub fn factor(&self, depth: usize, width: usize, dt: f64) -> f64 {
        (-self.rate(depth, width) * dt).exp()
    }

    fn damp(&self, field: &mut Grid, dt: f64) {
        let (rows, cols) = field.shape();
        let width = self.resolved_width(rows, cols);
        if width == 0 {
            return;
        }

        let factors: Vec<f64> = (0..width).map(|d| self.factor(d, width, dt)).collect();
        let values = field.as_mut_matrix();
        for j in 0..cols {
            let depth_j = j.min(cols - 1 - j);
            for i in 0..rows {
                let depth = depth_j.min(i.min(rows - 1 - i));
                if depth < width {
                    values[(i, j)] *= factors[depth];
                }
            }
        }
    }
}

// =================================================================================================
// Boundary condition
// =================================================================================================

/// Treatment of the domain edges
///
/// Exactly one condition is attached to a solver, for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
    /// Edge cells clamped to a fixed value
    Dirichlet(f64),

    /// Edge cells set so the outward normal derivative equals `flux`
    ///
    /// `flux = 0` gives zero-gradient: insulated walls for heat, reflecting
    /// walls for waves.
    Neumann(f64),

    /// Wraparound: the grid behaves as if tiled
    Periodic,

    /// Damping layer approximating an open (radiating) boundary
    Absorbing(AbsorbingLayer),
}

impl Default for BoundaryCondition {
    fn default() -> Self {
        BoundaryCondition::Dirichlet(0.0)
    }
}

impl BoundaryCondition {
    /// Fixed-value edges
    ///
    /// # Errors
    ///
    /// [`PdeError::InvalidParameter`] when `value` is not finite.
    pub fn dirichlet(value: f64) -> Result<Self> {
        Ok(BoundaryCondition::Dirichlet(require_finite("value", value)?))
    }

    /// Fixed-flux edges
    ///
    /// # Errors
    ///
    /// [`PdeError::InvalidParameter`] when `flux` is not finite.
    pub fn neumann(flux: f64) -> Result<Self> {
        Ok(BoundaryCondition::Neumann(require_finite("flux", flux)?))
    }

    /// Wraparound edges
    pub fn periodic() -> Self {
        BoundaryCondition::Periodic
    }

    /// Damping layer with default width and edge factor
    pub fn absorbing() -> Self {
        BoundaryCondition::Absorbing(AbsorbingLayer::default())
    }

    /// Damping layer with a custom profile
    pub fn absorbing_with(layer: AbsorbingLayer) -> Result<Self> {
        layer.validate()?;
        Ok(BoundaryCondition::Absorbing(layer))
    }

    /// Build a condition from its kind name
    ///
    /// `value` is the Dirichlet value or Neumann flux (default `0.0`) and is
    /// ignored by the other kinds.
    ///
    /// # Errors
    ///
    /// - [`PdeError::Configuration`] for an unknown kind
    /// - [`PdeError::InvalidParameter`] for a non-finite value
    ///
    /// # Example
    ///
    /// ```rust
    /// use pde_rs::solver::BoundaryCondition;
    ///
    /// let bc = BoundaryCondition::from_kind("neumann", None).unwrap();
    /// assert_eq!(bc, BoundaryCondition::Neumann(0.0));
    /// assert!(BoundaryCondition::from_kind("robin", Some(1.0)).is_err());
    /// ```
    pub fn from_kind(kind: &str, value: Option<f64>) -> Result<Self> {
        let value = value.unwrap_or(0.0);
        match kind.trim().to_ascii_lowercase().as_str() {
            "dirichlet" => Self::dirichlet(value),
            "neumann" => Self::neumann(value),
            "periodic" => Ok(Self::periodic()),
            "absorbing" => Ok(Self::absorbing()),
            other => Err(PdeError::Configuration(format!(
                "unknown boundary condition '{}' (expected dirichlet, neumann, periodic or absorbing)",
                other
            ))),
        }
    }

    /// Lowercase kind name
    pub fn name(&self) -> &'static str {
        match self {
            BoundaryCondition::Dirichlet(_) => "dirichlet",
            BoundaryCondition::Neumann(_) => "neumann",
            BoundaryCondition::Periodic => "periodic",
            BoundaryCondition::Absorbing(_) => "absorbing",
        }
    }

    /// Whether neighbour lookups in the stencil wrap around the grid
    pub fn wraps_stencil(&self) -> bool {
        matches!(self, BoundaryCondition::Periodic)
    }

    /// Correct the edge cells of a post-stencil field
    ///
    /// Only the outer ring is written, except for `Absorbing` which also
    /// damps the cells of its layer for a step of length `dt`.
    pub fn apply(&self, field: &mut Grid, dt: f64) {
        match *self {
            BoundaryCondition::Dirichlet(value) => fill_edges(field, value),
            BoundaryCondition::Neumann(flux) => extrapolate_edges(field, flux),
            BoundaryCondition::Periodic => {}
            BoundaryCondition::Absorbing(layer) => {
                extrapolate_edges(field, 0.0);
                layer.damp(field, dt);
            }
        }
    }

    /// Damp a stored time level with the same layer factors as [`apply`](Self::apply)
    ///
    /// No-op for every condition except `Absorbing`. Multi-level schemes call
    /// it on their history so the damped field and its history stay
    /// consistent.
    pub fn attenuate(&self, field: &mut Grid, dt: f64) {
        if let BoundaryCondition::Absorbing(layer) = self {
            layer.damp(field, dt);
        }
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryCondition::Dirichlet(v) => write!(f, "dirichlet({})", v),
            BoundaryCondition::Neumann(flux) => write!(f, "neumann({})", flux),
            BoundaryCondition::Periodic => write!(f, "periodic"),
            BoundaryCondition::Absorbing(layer) => match layer.width {
                Some(w) => write!(f, "absorbing(width={}, strength={})", w, layer.strength),
                None => write!(f, "absorbing(strength={})", layer.strength),
            },
        }
    }
}

// =================================================================================================
// Edge helpers
// =================================================================================================

fn fill_edges(field: &mut Grid, value: f64) {
    let (rows, cols) = field.shape();
    let values = field.as_mut_matrix();

    values.row_mut(0).fill(value);
    values.row_mut(rows - 1).fill(value);
    values.column_mut(0).fill(value);
    values.column_mut(cols - 1).fill(value);
}

/// Edge = neighbour + flux * spacing; rows first, then columns (corners
/// therefore follow the column rule).
fn extrapolate_edges(field: &mut Grid, flux: f64) {
    let (rows, cols) = field.shape();
    let (dx, dy) = field.spacing();
    let values = field.as_mut_matrix();

    if rows >= 2 {
        for j in 0..cols {
            values[(0, j)] = values[(1, j)] + flux * dx;
            values[(rows - 1, j)] = values[(rows - 2, j)] + flux * dx;
        }
    }

    if cols >= 2 {
        for i in 0..rows {
            values[(i, 0)] = values[(i, 1)] + flux * dy;
            values[(i, cols - 1)] = values[(i, cols - 2)] + flux * dy;
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp(rows: usize, cols: usize) -> Grid {
        Grid::from_fn(rows, cols, |i, j| (i * cols + j) as f64).unwrap()
    }

    // ====== Construction ======

    #[test]
    fn test_non_finite_payload_rejected() {
        assert!(BoundaryCondition::dirichlet(f64::NAN).unwrap_err().is_parameter_error());
        assert!(BoundaryCondition::neumann(f64::INFINITY).unwrap_err().is_parameter_error());
        assert!(BoundaryCondition::dirichlet(-3.5).is_ok());
    }

    #[test]
    fn test_from_kind() {
        assert_eq!(
            BoundaryCondition::from_kind("Dirichlet", Some(50.0)).unwrap(),
            BoundaryCondition::Dirichlet(50.0)
        );
        assert_eq!(
            BoundaryCondition::from_kind("periodic", Some(3.0)).unwrap(),
            BoundaryCondition::Periodic
        );
        assert!(matches!(
            BoundaryCondition::from_kind("absorbing", None).unwrap(),
            BoundaryCondition::Absorbing(_)
        ));
        assert!(BoundaryCondition::from_kind("mirror", None).unwrap_err().is_configuration_error());
    }

    #[test]
    fn test_wraps_stencil_only_for_periodic() {
        assert!(BoundaryCondition::periodic().wraps_stencil());
        assert!(!BoundaryCondition::Dirichlet(0.0).wraps_stencil());
        assert!(!BoundaryCondition::Neumann(0.0).wraps_stencil());
        assert!(!BoundaryCondition::absorbing().wraps_stencil());
    }

    // ====== Dirichlet ======

    #[test]
    fn test_dirichlet_sets_whole_ring() {
        let mut grid = ramp(5, 6);
        let before = grid.clone();
        BoundaryCondition::Dirichlet(7.0).apply(&mut grid, 0.1);

        for i in 0..5 {
            for j in 0..6 {
                if grid.is_edge(i, j) {
                    assert_eq!(grid[(i, j)], 7.0);
                } else {
                    assert_eq!(grid[(i, j)], before[(i, j)]);
                }
            }
        }
    }

    // ====== Neumann ======

    #[test]
    fn test_neumann_zero_copies_neighbour() {
        let mut grid = ramp(4, 5);
        BoundaryCondition::Neumann(0.0).apply(&mut grid, 0.1);

        // Interior untouched
        assert_eq!(grid[(1, 1)], 6.0);
        assert_eq!(grid[(2, 3)], 13.0);

        // Row edges copy the adjacent row
        assert_eq!(grid[(0, 2)], grid[(1, 2)]);
        assert_eq!(grid[(3, 2)], grid[(2, 2)]);

        // Column edges copy the adjacent column
        assert_eq!(grid[(2, 0)], grid[(2, 1)]);
        assert_eq!(grid[(2, 4)], grid[(2, 3)]);
    }

    #[test]
    fn test_neumann_flux_uses_spacing() {
        let mut grid = Grid::zeros(4, 4).unwrap().with_spacing(0.5, 2.0).unwrap();
        BoundaryCondition::Neumann(1.0).apply(&mut grid, 0.1);

        // Row edges: + flux * dx
        assert_eq!(grid[(0, 1)], 0.5);
        assert_eq!(grid[(3, 2)], 0.5);
        // Column edges: + flux * dy
        assert_eq!(grid[(1, 0)], 2.0);
        assert_eq!(grid[(2, 3)], 2.0);
    }

    #[test]
    fn test_neumann_on_single_row_grid() {
        let mut grid = Grid::from_rows(&[vec![1.0, 2.0, 3.0, 4.0]]).unwrap();
        BoundaryCondition::Neumann(0.0).apply(&mut grid, 0.1);
        assert_eq!(grid.to_row_major(), vec![2.0, 2.0, 3.0, 3.0]);
    }

    // ====== Periodic ======

    #[test]
    fn test_periodic_apply_is_noop() {
        let mut grid = ramp(4, 4);
        let before = grid.clone();
        BoundaryCondition::periodic().apply(&mut grid, 0.1);
        assert_eq!(grid, before);
    }

    // ====== Absorbing ======

    #[test]
    fn test_default_layer_width() {
        let layer = AbsorbingLayer::default();
        assert_eq!(layer.resolved_width(100, 100), 15);
        assert_eq!(layer.resolved_width(60, 60), 9);
        assert_eq!(layer.resolved_width(40, 60), 6);
        assert_eq!(layer.resolved_width(10, 10), 2);
        assert_eq!(layer.resolved_width(3, 50), 2);
        assert_eq!(layer.resolved_width(1, 50), 1);
    }

    #[test]
    fn test_layer_profile_is_monotonic() {
        let layer = AbsorbingLayer::default();
        let width = 5;
        let factors: Vec<f64> = (0..=width).map(|d| layer.factor(d, width, 0.05)).collect();

        assert_relative_eq!(factors[0], (-DEFAULT_LAYER_STRENGTH * 0.05).exp(), epsilon = 1e-15);
        assert_eq!(factors[width], 1.0);
        assert!(factors.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_layer_factor_scales_with_dt() {
        let layer = AbsorbingLayer::new(4, 2.0).unwrap();

        // Two half steps damp exactly as much as one full step
        let full = layer.factor(1, 4, 0.2);
        let half = layer.factor(1, 4, 0.1);
        assert_relative_eq!(half * half, full, epsilon = 1e-15);
        assert!(layer.factor(0, 4, 0.01) > 0.97);
    }

    #[test]
    fn test_absorbing_damps_layer_without_clamping() {
        let mut grid = Grid::filled(20, 20, 1.0).unwrap();
        let layer = AbsorbingLayer::default();
        BoundaryCondition::absorbing().apply(&mut grid, 0.1);

        // Width 3 on 20x20; outer ring damped, never clamped to a constant
        assert_relative_eq!(grid[(0, 10)], layer.factor(0, 3, 0.1), epsilon = 1e-15);
        assert!(grid[(0, 10)] > 0.0 && grid[(0, 10)] < 1.0);
        // Inside the layer: less damping
        assert!(grid[(1, 10)] > grid[(0, 10)] && grid[(1, 10)] < 1.0);
        // Beyond the layer: untouched
        assert_eq!(grid[(3, 10)], 1.0);
        assert_eq!(grid[(10, 10)], 1.0);
    }

    #[test]
    fn test_attenuate_only_touches_absorbing_layer() {
        let base = Grid::filled(12, 12, 2.0).unwrap();

        for bc in [BoundaryCondition::Dirichlet(0.0), BoundaryCondition::Neumann(0.0), BoundaryCondition::Periodic] {
            let mut grid = base.clone();
            bc.attenuate(&mut grid, 0.1);
            assert_eq!(grid, base);
        }

        // Constant field: the zero-gradient copy is a no-op, so apply and
        // attenuate agree cell by cell
        let bc = BoundaryCondition::absorbing();
        let mut applied = base.clone();
        let mut attenuated = base.clone();
        bc.apply(&mut applied, 0.1);
        bc.attenuate(&mut attenuated, 0.1);
        assert_eq!(applied, attenuated);
        assert!(attenuated[(0, 5)] < 2.0);
    }

    #[test]
    fn test_absorbing_layer_validation() {
        assert!(AbsorbingLayer::new(3, 0.1).is_ok());
        assert!(AbsorbingLayer::new(0, 0.1).is_err());
        assert!(AbsorbingLayer::new(3, 0.0).is_err());
        assert!(AbsorbingLayer::new(3, -1.0).is_err());
        assert!(AbsorbingLayer::new(3, f64::NAN).is_err());
        assert!(BoundaryCondition::absorbing_with(AbsorbingLayer { width: None, strength: -2.0 }).is_err());
    }
}
