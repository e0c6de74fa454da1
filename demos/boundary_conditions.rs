//! Demo: Boundary Condition Families
//!
//! Runs the heat and wave equations under every boundary family and prints
//! what each one does to the total heat or wave energy.
//!
//! ## Structure
//!
//! **Phase 1: Heat** (50x50, hot cell in the centre, 100 steps)
//! - Cold and hot Dirichlet edges, insulated (Neumann) edges, periodic domain
//!
//! **Phase 2: Wave** (60x60, Gaussian pulse, 200 steps)
//! - Fixed, reflecting, periodic and absorbing edges
//!
//! **Phase 3: Reflection vs absorption**
//! - Pulse launched near an edge, energy left after it hits the wall
//!
//! **Phase 4: Periodic wraparound**
//! - Square patch next to an edge, heat appearing on the opposite side
//!
//! Run with `RUST_LOG=debug` to see solver logs.

use pde_rs::models::InitialConditions;
use pde_rs::output::export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};
use pde_rs::physics::{EquationKind, Grid};
use pde_rs::solver::{BoundaryCondition, PdeSolver};

use std::error::Error;
use std::time::Instant;

// =============================================================================
// Helpers
// =============================================================================

fn run(
    kind: EquationKind,
    boundary: BoundaryCondition,
    parameters: &[(&str, f64)],
    initial: &Grid,
    steps: usize,
) -> Result<(PdeSolver, Grid), Box<dyn Error>> {
    let mut solver = PdeSolver::new(kind, initial.shape(), boundary)?;
    solver.set_parameters(parameters)?;
    solver.set_initial_conditions(initial)?;

    if !solver.advisory_is_stable() {
        println!("  ⚠ stability number {:.3} exceeds {}", solver.stability_number(), solver.stability_limit());
    }

    let result = solver.solve(steps)?;
    Ok((solver, result))
}

fn banner(title: &str) {
    println!("\n{}", title);
    println!("{}", "=".repeat(60));
}

// =============================================================================
// Phases
// =============================================================================

fn heat_comparison() -> Result<(), Box<dyn Error>> {
    banner("Heat Equation: Boundary Comparison");

    let u0 = InitialConditions::point_source((50, 50), (25, 25), 100.0)?;
    let cases = [
        ("Dirichlet (cold)", BoundaryCondition::dirichlet(0.0)?),
        ("Dirichlet (hot)", BoundaryCondition::dirichlet(50.0)?),
        ("Neumann (insulated)", BoundaryCondition::neumann(0.0)?),
        ("Periodic", BoundaryCondition::periodic()),
    ];

    for (name, boundary) in cases {
        let (_, u) = run(EquationKind::Heat, boundary, &[("alpha", 0.25), ("dt", 0.1)], &u0, 100)?;

        println!("\n{}:", name);
        println!("  Total heat:       {:.1}", u.sum());
        println!("  Max temperature:  {:.3}", u.max());
        println!("  Min temperature:  {:.3}", u.min());
        println!("  Heat retained:    {:.3}", u.sum() / 100.0);
    }

    Ok(())
}

fn wave_comparison() -> Result<(), Box<dyn Error>> {
    banner("Wave Equation: Boundary Comparison");

    let u0 = InitialConditions::gaussian_pulse((60, 60), (30.0, 30.0), 5.0, 2.0)?;
    let cases = [
        ("Dirichlet (fixed)", BoundaryCondition::dirichlet(0.0)?),
        ("Neumann (reflecting)", BoundaryCondition::neumann(0.0)?),
        ("Periodic", BoundaryCondition::periodic()),
        ("Absorbing", BoundaryCondition::absorbing()),
    ];

    for (name, boundary) in cases {
        let start = Instant::now();
        let (_, u) = run(EquationKind::Wave, boundary, &[("c", 1.0), ("dt", 0.05)], &u0, 200)?;

        println!("\n{} ({:.1} ms):", name, start.elapsed().as_secs_f64() * 1e3);
        println!("  Total energy:     {:.3}", u.sum_of_squares());
        println!("  Max amplitude:    {:.3}", u.max_abs());
        println!("  Boundary energy:  {:.3}", u.edge_sum_of_squares());
    }

    Ok(())
}

fn reflection_vs_absorption() -> Result<(), Box<dyn Error>> {
    banner("Wave Reflections vs Absorption");

    // Pulse near the top edge, long enough for the front to hit it
    let u0 = InitialConditions::gaussian_pulse((50, 50), (15.0, 25.0), 3.0, 1.0)?;
    let parameters = [("c", 1.0), ("dt", 0.05)];

    let (reflecting, u_reflecting) = run(EquationKind::Wave, BoundaryCondition::neumann(0.0)?, &parameters, &u0, 400)?;
    let (_, u_absorbing) = run(EquationKind::Wave, BoundaryCondition::absorbing(), &parameters, &u0, 400)?;

    let energy_reflecting = u_reflecting.sum_of_squares();
    let energy_absorbing = u_absorbing.sum_of_squares();

    println!("  Energy (reflecting): {:.3}", energy_reflecting);
    println!("  Energy (absorbing):  {:.3}", energy_absorbing);
    println!("  Fraction absorbed:   {:.3}", 1.0 - energy_absorbing / energy_reflecting);

    let frames = {
        let mut solver = reflecting;
        solver.set_initial_conditions(&u0)?;
        solver.solve_with_frames(400, 20)?
    };

    let metadata = CsvMetadata {
        equation: Some("wave".to_string()),
        boundary: Some(BoundaryCondition::Neumann(0.0).to_string()),
        ..Default::default()
    };
    let exporter = CsvExporter::new(CsvConfig::default().with_metadata(metadata));
    exporter.export_frames(&frames, "wave_reflecting_energy.csv")?;
    println!("  Saved: wave_reflecting_energy.csv ({} frames)", frames.len());

    Ok(())
}

fn periodic_wraparound() -> Result<(), Box<dyn Error>> {
    banner("Periodic Wraparound");

    let u0 = InitialConditions::square_patch((40, 40), (10, 1), (15, 4), 50.0)?;
    let (_, u) = run(EquationKind::Heat, BoundaryCondition::periodic(), &[("alpha", 0.15), ("dt", 0.1)], &u0, 200)?;

    let far_column: f64 = (0..40).map(|i| u[(i, 39)]).sum();
    println!("  Heat conservation:          {:.6}", u.sum() / u0.sum());
    println!("  Heat in the opposite column: {:.3}", far_column);

    let u0_wave = InitialConditions::gaussian_pulse((40, 40), (10.0, 20.0), 3.0, 1.0)?;
    let (_, w) = run(EquationKind::Wave, BoundaryCondition::periodic(), &[("c", 1.0), ("dt", 0.05)], &u0_wave, 150)?;
    println!("  Wave energy:                {:.3}", w.sum_of_squares());

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== Boundary Condition Families ===");

    heat_comparison()?;
    wave_comparison()?;
    reflection_vs_absorption()?;
    periodic_wraparound()?;

    println!("\n✓ All boundary condition demos completed");
    Ok(())
}
