//! Demo: Parameter Exploration
//!
//! Sweeps, grids, sensitivity analysis and side-by-side comparisons with
//! `ParameterExplorer`. Sweep tables are written to CSV for plotting with
//! an external tool.
//!
//! Run with `RUST_LOG=info` to see one log line per exploration.

use pde_rs::explorer::{ParameterExplorer, RunConfig};
use pde_rs::models::{InitialConditions, SineDirection};
use pde_rs::output::export::{CsvExporter, Exporter};
use pde_rs::physics::EquationKind;
use pde_rs::solver::BoundaryCondition;

use std::error::Error;

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    (0..n).map(|k| start + (end - start) * k as f64 / (n - 1) as f64).collect()
}

fn banner(title: &str) {
    println!("\n{}", title);
    println!("{}", "=".repeat(60));
}

// =============================================================================
// Phases
// =============================================================================

fn heat_alpha_sweep() -> Result<(), Box<dyn Error>> {
    banner("Heat Diffusion: alpha sweep");

    let mut explorer = ParameterExplorer::new(EquationKind::Heat, (50, 50))?;
    explorer.set_initial_conditions(&InitialConditions::multiple_sources(
        (50, 50),
        &[(15, 15, 100.0), (35, 35, 80.0), (25, 10, 60.0)],
    )?)?;

    let alphas = linspace(0.1, 0.8, 8);
    let sweep = explorer.parameter_sweep("alpha", &alphas, 150)?;

    println!("  {:>6}  {:>10}  {:>12}  {}", "alpha", "max", "energy", "stable");
    for (k, alpha) in sweep.parameter_values.iter().enumerate() {
        let m = &sweep.metrics[k];
        println!("  {:>6.2}  {:>10.3}  {:>12.3}  {}", alpha, m.max_value, m.total_energy, sweep.stable[k]);
    }

    let peaks = sweep.metric("max_value").unwrap_or_default();
    if let (Some(first), Some(last)) = (peaks.first(), peaks.last()) {
        println!("  Higher alpha gives {} diffusion", if last < first { "faster" } else { "slower" });
    }

    CsvExporter::default().export_sweep(&sweep, "heat_alpha_sweep.csv")?;
    println!("  Saved: heat_alpha_sweep.csv");

    Ok(())
}

fn wave_parameter_grid() -> Result<(), Box<dyn Error>> {
    banner("Wave Propagation: c x dt grid");

    let mut explorer = ParameterExplorer::new(EquationKind::Wave, (40, 40))?.with_boundary(BoundaryCondition::absorbing());
    explorer.set_initial_conditions(&InitialConditions::circular_wave((40, 40), (20.0, 20.0), 8.0, 1.0)?)?;

    let c_values = [0.5, 1.0, 1.5];
    let dt_values = [0.02, 0.05, 0.8];
    let grid = explorer.parameter_grid("c", &c_values, "dt", &dt_values, 100)?;

    print!("  {:>6}", "c \\ dt");
    for dt in dt_values {
        print!("  {:>16}", dt);
    }
    println!();
    for (ia, c) in c_values.iter().enumerate() {
        print!("  {:>6}", c);
        for ib in 0..dt_values.len() {
            let energy = grid.metrics_at(ia, ib).map_or(f64::NAN, |m| m.total_energy);
            let flag = if grid.is_stable(ia, ib) == Some(true) { " " } else { "!" };
            print!("  {:>15.4e}{}", energy, flag);
        }
        println!();
    }
    println!("  (! = outside the CFL bound)");

    Ok(())
}

fn boundary_comparison() -> Result<(), Box<dyn Error>> {
    banner("Heat: boundary families under the same sweep");

    let u0 = InitialConditions::gaussian_pulse((40, 40), (20.0, 20.0), 5.0, 100.0)?;
    let cases = [
        ("Dirichlet (cold)", BoundaryCondition::Dirichlet(0.0)),
        ("Neumann (insulated)", BoundaryCondition::Neumann(0.0)),
        ("Periodic", BoundaryCondition::Periodic),
    ];

    for (name, boundary) in cases {
        let mut explorer = ParameterExplorer::new(EquationKind::Heat, (40, 40))?.with_boundary(boundary);
        explorer.set_initial_conditions(&u0)?;

        let sweep = explorer.parameter_sweep("alpha", &[0.1, 0.3, 0.5], 100)?;
        let energies = sweep.metric("total_energy").unwrap_or_default();
        println!("  {:<20} final energy (alpha=0.5): {:.1}", name, energies.last().copied().unwrap_or(f64::NAN));
    }

    Ok(())
}

fn wave_sensitivity() -> Result<(), Box<dyn Error>> {
    banner("Wave: sensitivity to c");

    let mut explorer = ParameterExplorer::new(EquationKind::Wave, (30, 30))?;
    explorer.set_initial_conditions(&InitialConditions::sine_wave((30, 30), 10.0, 1.0, SineDirection::Diagonal)?)?;

    let result = explorer.sensitivity_analysis("c", 1.0, 25.0, 7, 100)?;
    let values = result.parameter_values();

    println!("  Base c:        {}", result.base_value);
    println!("  Perturbation:  ±{}%", result.perturbation_percent);
    println!(
        "  Range tested:  {:.3} to {:.3}",
        values.first().copied().unwrap_or(f64::NAN),
        values.last().copied().unwrap_or(f64::NAN)
    );

    println!("\n  Sensitivity coefficients:");
    for (metric, coefficient) in &result.coefficients {
        let level = if *coefficient > 0.5 {
            "high"
        } else if *coefficient > 0.1 {
            "medium"
        } else {
            "low"
        };
        println!("    {:<14} {:>8.3} ({})", metric, coefficient, level);
    }

    if let Some((metric, coefficient)) = result.most_sensitive() {
        println!("  Most sensitive: {} ({:.3})", metric, coefficient);
    }

    Ok(())
}

fn custom_comparison() -> Result<(), Box<dyn Error>> {
    banner("Heat: labelled configurations");

    let mut explorer = ParameterExplorer::new(EquationKind::Heat, (40, 40))?.with_boundary(BoundaryCondition::Neumann(0.0));
    explorer.set_initial_conditions(&InitialConditions::point_source((40, 40), (20, 20), 100.0)?)?;

    let configs = [
        RunConfig::new(&[("alpha", 0.1), ("dt", 0.1)], 100),
        RunConfig::new(&[("alpha", 0.2), ("dt", 0.1)], 100),
        RunConfig::new(&[("alpha", 0.1), ("dt", 0.2)], 100),
        RunConfig::new(&[("alpha", 0.1), ("dt", 0.1)], 200),
    ];
    let labels = ["baseline", "double alpha", "double dt", "double steps"];

    for (label, field) in explorer.compare_parameters(&configs, &labels)? {
        println!("  {:<14} peak {:>8.4}  total {:>8.3}", label, field.max(), field.sum());
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    println!("=== Parameter Exploration ===");

    heat_alpha_sweep()?;
    wave_parameter_grid()?;
    boundary_comparison()?;
    wave_sensitivity()?;
    custom_comparison()?;

    println!("\n✓ All parameter exploration demos completed");
    Ok(())
}
