//! Helper functions for integration tests

use pde_rs::models::InitialConditions;
use pde_rs::physics::{EquationKind, Grid};
use pde_rs::solver::{BoundaryCondition, PdeSolver};

/// Zero field with a single hot cell
pub fn hot_cell(shape: (usize, usize), at: (usize, usize), value: f64) -> Grid {
    InitialConditions::point_source(shape, at, value).unwrap()
}

/// Gaussian pulse centred on a cell
pub fn gaussian(shape: (usize, usize), center: (usize, usize), sigma: f64, amplitude: f64) -> Grid {
    InitialConditions::gaussian_pulse(shape, (center.0 as f64, center.1 as f64), sigma, amplitude).unwrap()
}

/// Route `log` output through the test harness (`RUST_LOG=debug cargo test`)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Heat solver, configured and initialised
pub fn heat_solver(boundary: BoundaryCondition, alpha: f64, dt: f64, initial: &Grid) -> PdeSolver {
    init_logging();
    let mut solver = PdeSolver::new(EquationKind::Heat, initial.shape(), boundary).unwrap();
    solver.set_parameters(&[("alpha", alpha), ("dt", dt)]).unwrap();
    solver.set_initial_conditions(initial).unwrap();
    solver
}

/// Wave solver, configured and initialised
pub fn wave_solver(boundary: BoundaryCondition, c: f64, dt: f64, initial: &Grid) -> PdeSolver {
    init_logging();
    let mut solver = PdeSolver::new(EquationKind::Wave, initial.shape(), boundary).unwrap();
    solver.set_parameters(&[("c", c), ("dt", dt)]).unwrap();
    solver.set_initial_conditions(initial).unwrap();
    solver
}

/// Assert that two fields have the same shape and are close cell by cell
pub fn assert_grids_close(actual: &Grid, expected: &Grid, tolerance: f64, message: &str) {
    assert_eq!(actual.shape(), expected.shape(), "{}: shape mismatch", message);

    let (rows, cols) = actual.shape();
    for i in 0..rows {
        for j in 0..cols {
            let diff = (actual[(i, j)] - expected[(i, j)]).abs();
            assert!(
                diff <= tolerance,
                "{}: cell ({}, {}) differs by {} (tolerance {})",
                message, i, j, diff, tolerance
            );
        }
    }
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}
