//! Dense 2D scalar field with uniform spacing
//!
//! A [`Grid`] is the only data container the solver works with. It is a thin
//! wrapper around a column-major [`DMatrix`] plus the spacing of each axis:
//!
//! - axis 0 (rows, index `i`) is spaced by `dx`
//! - axis 1 (columns, index `j`) is spaced by `dy`
//!
//! # Shape Invariant
//!
//! The shape is fixed at construction. No method on `Grid` resizes it; the
//! solver only ever writes values in place.
//!
//! # Edge Ring
//!
//! Boundary conditions act on the outermost ring of cells:
//! row `0`, row `rows - 1`, column `0` and column `cols - 1`.
//!
//! # Example
//!
//! ```rust
//! use pde_rs::physics::Grid;
//!
//! let mut grid = Grid::zeros(5, 4).unwrap();
//! grid[(2, 2)] = 1.0;
//!
//! assert_eq!(grid.shape(), (5, 4));
//! assert_eq!(grid.sum(), 1.0);
//! assert!(grid.is_edge(0, 3));
//! ```

use nalgebra::DMatrix;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::{PdeError, Result, require_positive};

/// Uniformly spaced 2D field
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Field values, `values[(i, j)]`
    values: DMatrix<f64>,

    /// Spacing along the row axis
    dx: f64,

    /// Spacing along the column axis
    dy: f64,
}

impl Grid {
    // ======================================= constructors =======================================

    /// Zero-filled grid with unit spacing
    ///
    /// # Errors
    ///
    /// [`PdeError::InvalidShape`] when either dimension is zero.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        check_shape(rows, cols)?;
        Ok(Self {
            values: DMatrix::zeros(rows, cols),
            dx: 1.0,
            dy: 1.0,
        })
    }

    /// Uniform grid filled with `value`
    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Self> {
        check_shape(rows, cols)?;
        Ok(Self {
            values: DMatrix::from_element(rows, cols, value),
            dx: 1.0,
            dy: 1.0,
        })
    }

    /// Build from a closure evaluated at every `(i, j)`
    pub fn from_fn<F>(rows: usize, cols: usize, f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        check_shape(rows, cols)?;
        Ok(Self {
            values: DMatrix::from_fn(rows, cols, f),
            dx: 1.0,
            dy: 1.0,
        })
    }

    /// Wrap an existing matrix (unit spacing)
    pub fn from_matrix(values: DMatrix<f64>) -> Result<Self> {
        check_shape(values.nrows(), values.ncols())?;
        Ok(Self { values, dx: 1.0, dy: 1.0 })
    }

    /// Build from row-major nested vectors
    ///
    /// All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        check_shape(n_rows, n_cols)?;

        if let Some(bad) = rows.iter().find(|row| row.len() != n_cols) {
            return Err(PdeError::ShapeMismatch {
                expected: (n_rows, n_cols),
                found: (n_rows, bad.len()),
            });
        }

        Self::from_fn(n_rows, n_cols, |i, j| rows[i][j])
    }

    /// Builder: set spacing of both axes
    ///
    /// # Errors
    ///
    /// [`PdeError::InvalidParameter`] when a spacing is not finite and positive.
    pub fn with_spacing(mut self, dx: f64, dy: f64) -> Result<Self> {
        self.dx = require_positive("dx", dx)?;
        self.dy = require_positive("dy", dy)?;
        Ok(self)
    }

    // ========================================== Queries ==========================================

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: a grid has at least one cell
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(dx, dy)`
    pub fn spacing(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    /// Value at `(i, j)`, `None` when out of bounds
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get((i, j)).copied()
    }

    /// Whether `(i, j)` lies inside the grid
    pub fn contains(&self, i: usize, j: usize) -> bool {
        i < self.rows() && j < self.cols()
    }

    /// Whether `(i, j)` lies on the outer ring
    pub fn is_edge(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i + 1 == self.rows() || j + 1 == self.cols()
    }

    /// Owned copy of the field values
    ///
    /// Mutating the returned matrix never affects this grid.
    pub fn snapshot(&self) -> DMatrix<f64> {
        self.values.clone()
    }

    /// Read-only view of the values
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Consume into the underlying matrix
    pub fn into_matrix(self) -> DMatrix<f64> {
        self.values
    }

    /// Values in row-major order
    pub fn to_row_major(&self) -> Vec<f64> {
        self.values.transpose().as_slice().to_vec()
    }

    pub(crate) fn as_mut_matrix(&mut self) -> &mut DMatrix<f64> {
        &mut self.values
    }

    // ========================================= Reductions ========================================

    /// Sum of all values ("total heat")
    pub fn sum(&self) -> f64 {
        self.values.sum()
    }

    /// Sum of squared values ("total energy")
    pub fn sum_of_squares(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum()
    }

    /// Largest value
    pub fn max(&self) -> f64 {
        self.values.max()
    }

    /// Smallest value
    pub fn min(&self) -> f64 {
        self.values.min()
    }

    /// Largest absolute value
    pub fn max_abs(&self) -> f64 {
        self.values.amax()
    }

    /// Value at `(rows / 2, cols / 2)`
    pub fn center_value(&self) -> f64 {
        self.values[(self.rows() / 2, self.cols() / 2)]
    }

    /// Sum of values excluding the outer ring
    pub fn interior_sum(&self) -> f64 {
        let (rows, cols) = self.shape();
        if rows < 3 || cols < 3 {
            return 0.0;
        }
        self.values.view((1, 1), (rows - 2, cols - 2)).sum()
    }

    /// Sum of squared values on the four edges
    ///
    /// Each edge is counted separately, so corner cells contribute twice.
    pub fn edge_sum_of_squares(&self) -> f64 {
        let (rows, cols) = self.shape();
        let row_energy = |i: usize| self.values.row(i).iter().map(|v| v * v).sum::<f64>();
        let col_energy = |j: usize| self.values.column(j).iter().map(|v| v * v).sum::<f64>();

        row_energy(0) + row_energy(rows - 1) + col_energy(0) + col_energy(cols - 1)
    }

    /// Whether every value is finite
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// Largest absolute difference with another grid of the same shape
    pub fn max_abs_diff(&self, other: &Grid) -> Result<f64> {
        if self.shape() != other.shape() {
            return Err(PdeError::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        Ok(self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max))
    }
}

pub(crate) fn check_shape(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(PdeError::InvalidShape { rows, cols });
    }
    Ok(())
}

impl Index<(usize, usize)> for Grid {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.values[index]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.values[index]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.shape();
        write!(
            f,
            "Grid {}x{} (dx={}, dy={}, min={:.4e}, max={:.4e}, sum={:.4e})",
            rows,
            cols,
            self.dx,
            self.dy,
            self.min(),
            self.max(),
            self.sum()
        )
    }
}

// =================================================================================================
// Tests
// =================================================================================================
