//! Performance benchmarks for the finite-difference solvers
//!
//! # What We're Measuring
//!
//! 1. **Step cost per equation**: FTCS (heat) against leapfrog (wave) on the
//!    same grid. Both evaluate one Laplacian per step; leapfrog also keeps a
//!    history field, so it should be somewhat slower.
//!
//! 2. **Scaling with grid size**: time per step should grow with the number
//!    of cells (`rows * cols`).
//!
//! 3. **Boundary cost**: Dirichlet and periodic touch only the edge ring,
//!    the absorbing layer rescales a band of cells on every step.
//!
//! 4. **Parallel stencil**: the same run with the parallel threshold forced
//!    above and below the grid size (feature `parallel`).
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Everything
//! cargo bench --bench solver_performance
//!
//! # Only the grid-size scaling group
//! cargo bench --bench solver_performance "Grid Scaling"
//!
//! # Sequential stencil only
//! cargo bench --bench solver_performance --no-default-features
//! ```
//!
//! # Understanding Results
//!
//! ```text
//! Grid Scaling/heat/128
//!   Time: [1.2 ms 1.3 ms 1.3 ms]
//!   Thrpt: [1.26 Gelem/s ...]
//! ```
//!
//! Throughput is reported in cell updates, so flat throughput across sizes
//! means linear scaling. A drop at large sizes usually marks the point where
//! the fields no longer fit in cache.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::time::Duration;

use pde_rs::models::InitialConditions;
use pde_rs::physics::{EquationKind, Grid};
use pde_rs::solver::{set_parallel_threshold, BoundaryCondition, PdeSolver, DEFAULT_PARALLEL_THRESHOLD};

/// Steps per measured run
const STEPS: usize = 20;

// =================================================================================================
// Setup
// =================================================================================================

fn pulse(n: usize) -> Grid {
    let center = n as f64 / 2.0;
    InitialConditions::gaussian_pulse((n, n), (center, center), n as f64 / 10.0, 1.0).unwrap()
}

/// Configured solver, stable parameters for unit spacing
fn solver(kind: EquationKind, boundary: BoundaryCondition, initial: &Grid) -> PdeSolver {
    let mut solver = PdeSolver::new(kind, initial.shape(), boundary).unwrap();
    match kind {
        EquationKind::Heat => solver.set_parameters(&[("alpha", 0.2), ("dt", 1.0)]).unwrap(),
        EquationKind::Wave => solver.set_parameters(&[("c", 1.0), ("dt", 0.5)]).unwrap(),
    }
    solver.set_initial_conditions(initial).unwrap();
    solver
}

/// Run `STEPS` steps from the initial condition
///
/// Re-setting the initial condition restarts the run, so every iteration
/// does the same work.
fn run(solver: &mut PdeSolver, initial: &Grid) -> Grid {
    solver.set_initial_conditions(initial).unwrap();
    solver.solve(black_box(STEPS)).unwrap()
}

// =================================================================================================
// Benchmark Functions
// =================================================================================================

/// Heat against wave on a 128x128 grid
fn benchmark_equations(c: &mut Criterion) {
    let mut group = c.benchmark_group("Equation Step Cost");
    let initial = pulse(128);
    group.throughput(Throughput::Elements((initial.len() * STEPS) as u64));

    for kind in [EquationKind::Heat, EquationKind::Wave] {
        let mut solver = solver(kind, BoundaryCondition::Neumann(0.0), &initial);
        group.bench_function(kind.name(), |b| b.iter(|| run(&mut solver, &initial)));
    }

    group.finish();
}

/// Time per run as the grid grows
///
/// # Expected Scaling
///
/// ```text
/// 32:   baseline
/// 64:   ~4x
/// 128:  ~16x
/// 256:  ~64x (less with the parallel stencil)
/// ```
fn benchmark_grid_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Grid Scaling");

    for kind in [EquationKind::Heat, EquationKind::Wave] {
        for n in [32, 64, 128, 256] {
            let initial = pulse(n);
            let mut solver = solver(kind, BoundaryCondition::Dirichlet(0.0), &initial);

            group.throughput(Throughput::Elements((n * n * STEPS) as u64));
            group.bench_with_input(BenchmarkId::new(kind.name(), n), &n, |b, _| {
                b.iter(|| run(&mut solver, &initial))
            });
        }
    }

    group.finish();
}

/// Wave run on 128x128 under each boundary family
fn benchmark_boundaries(c: &mut Criterion) {
    let mut group = c.benchmark_group("Boundary Cost");
    let initial = pulse(128);

    let boundaries = [
        BoundaryCondition::Dirichlet(0.0),
        BoundaryCondition::Neumann(0.0),
        BoundaryCondition::Periodic,
        BoundaryCondition::absorbing(),
    ];

    for boundary in boundaries {
        let mut solver = solver(EquationKind::Wave, boundary, &initial);
        group.bench_function(boundary.name(), |b| b.iter(|| run(&mut solver, &initial)));
    }

    group.finish();
}

/// Sequential against parallel stencil on a 512x512 grid
///
/// Without the `parallel` feature both entries take the sequential path.
fn benchmark_parallel_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parallel Stencil");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let initial = pulse(512);
    let mut solver = solver(EquationKind::Heat, BoundaryCondition::Periodic, &initial);
    group.throughput(Throughput::Elements((initial.len() * STEPS) as u64));

    for (label, threshold) in [("sequential", usize::MAX), ("parallel", 1)] {
        set_parallel_threshold(threshold);
        group.bench_function(label, |b| b.iter(|| run(&mut solver, &initial)));
    }
    set_parallel_threshold(DEFAULT_PARALLEL_THRESHOLD);

    group.finish();
}

criterion_group!(
    benches,
    benchmark_equations,
    benchmark_grid_scaling,
    benchmark_boundaries,
    benchmark_parallel_threshold,
);
criterion_main!(benches);
