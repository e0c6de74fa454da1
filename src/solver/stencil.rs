//! Five-point Laplacian
//!
//! ```text
//! lap(u)[i,j] = (u[i-1,j] - 2 u[i,j] + u[i+1,j]) / dx^2
//!             + (u[i,j-1] - 2 u[i,j] + u[i,j+1]) / dy^2
//! ```
//!
//! The stencil is boundary-agnostic apart from one flag: when `wrap` is set
//! (periodic domains) neighbour indices are taken modulo the grid dimensions
//! and every cell is updated. Otherwise only interior cells get a value and
//! the outer ring is left at zero for the boundary condition to handle.
//!
//! Columns are independent, so above [`parallel_threshold`] cells they are
//! computed on the rayon pool (feature `parallel`). The result is identical
//! in both modes.

use nalgebra::DMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::physics::Grid;
use crate::solver::parallel_threshold;

/// Discrete Laplacian of `field`
pub fn laplacian(field: &Grid, wrap: bool) -> DMatrix<f64> {
    laplacian_with_threshold(field, wrap, parallel_threshold())
}

fn laplacian_with_threshold(field: &Grid, wrap: bool, threshold: usize) -> DMatrix<f64> {
    let (rows, cols) = field.shape();
    let (dx, dy) = field.spacing();
    let stencil = Stencil {
        u: field.as_matrix(),
        rows,
        cols,
        inv_dx2: 1.0 / (dx * dx),
        inv_dy2: 1.0 / (dy * dy),
        wrap,
    };

    let mut out = DMatrix::zeros(rows, cols);

    if field.len() > threshold {
        #[cfg(feature = "parallel")]
        out.as_mut_slice()
            .par_chunks_mut(rows)
            .enumerate()
            .for_each(|(j, column)| stencil.fill_column(j, column));
        #[cfg(not(feature = "parallel"))]
        stencil.fill_all(&mut out);
    } else {
        stencil.fill_all(&mut out);
    }

    out
}

struct Stencil<'a> {
    u: &'a DMatrix<f64>,
    rows: usize,
    cols: usize,
    inv_dx2: f64,
    inv_dy2: f64,
    wrap: bool,
}

impl Stencil<'_> {
    fn fill_all(&self, out: &mut DMatrix<f64>) {
        // Column-major storage: chunk j is column j
        for (j, column) in out.as_mut_slice().chunks_mut(self.rows).enumerate() {
            self.fill_column(j, column);
        }
    }

    fn fill_column(&self, j: usize, column: &mut [f64]) {
        if self.wrap {
            let left = (j + self.cols - 1) % self.cols;
            let right = (j + 1) % self.cols;
            for (i, cell) in column.iter_mut().enumerate() {
                let up = (i + self.rows - 1) % self.rows;
                let down = (i + 1) % self.rows;
                *cell = self.at(i, j, up, down, left, right);
            }
        } else {
            if j == 0 || j + 1 >= self.cols {
                return;
            }
            for i in 1..self.rows.saturating_sub(1) {
                column[i] = self.at(i, j, i - 1, i + 1, j - 1, j + 1);
            }
        }
    }

    #[inline]
    fn at(&self, i: usize, j: usize, up: usize, down: usize, left: usize, right: usize) -> f64 {
        let u = self.u;
        let center = u[(i, j)];
        (u[(up, j)] - 2.0 * center + u[(down, j)]) * self.inv_dx2
            + (u[(i, left)] - 2.0 * center + u[(i, right)]) * self.inv_dy2
    }
}

// =================================================================================================
// Tests
// =================================================================================================
