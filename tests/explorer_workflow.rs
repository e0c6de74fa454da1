//! Integration tests: parameter exploration and result export
//!
//! Exploration runs are checked against direct `PdeSolver` runs, then
//! written to temporary CSV files and read back.

use std::fs;

use tempfile::NamedTempFile;

use pde_rs::explorer::{ParameterExplorer, RunConfig, METRIC_NAMES};
use pde_rs::output::export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};
use pde_rs::physics::EquationKind;
use pde_rs::solver::BoundaryCondition;

mod common;
use common::{gaussian, heat_solver, hot_cell, init_logging, wave_solver};

fn heat_explorer(boundary: BoundaryCondition) -> ParameterExplorer {
    init_logging();
    let mut explorer = ParameterExplorer::new(EquationKind::Heat, (20, 20))
        .unwrap()
        .with_boundary(boundary)
        .with_base_parameters(&[("alpha", 0.2), ("dt", 0.5)])
        .unwrap();
    explorer.set_initial_conditions(&hot_cell((20, 20), (10, 10), 100.0)).unwrap();
    explorer
}

/// Data lines of a CSV file, header comments skipped
fn data_lines(path: &std::path::Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

// =================================================================================================
// Exploration
// =================================================================================================

#[test]
fn test_sweep_matches_independent_runs() {
    let explorer = heat_explorer(BoundaryCondition::Neumann(0.0));
    let alphas = [0.1, 0.2, 0.4];

    let sweep = explorer.parameter_sweep("alpha", &alphas, 25).unwrap();

    assert_eq!(sweep.len(), 3);
    for (k, &alpha) in alphas.iter().enumerate() {
        let expected = heat_solver(BoundaryCondition::Neumann(0.0), alpha, 0.5, &hot_cell((20, 20), (10, 10), 100.0))
            .solve(25)
            .unwrap();
        assert_eq!(sweep.solutions[k], expected, "alpha = {}", alpha);
    }

    // Faster diffusion, lower peak
    let peaks = sweep.metric("max_value").unwrap();
    assert!(peaks[0] > peaks[1] && peaks[1] > peaks[2]);
    assert_eq!(sweep.stable, vec![true, true, true]);
}

#[test]
fn test_wave_sweep_flags_cfl_violations() {
    let mut explorer = ParameterExplorer::new(EquationKind::Wave, (20, 20))
        .unwrap()
        .with_boundary(BoundaryCondition::Periodic)
        .with_base_parameters(&[("dt", 0.5)])
        .unwrap();
    explorer.set_initial_conditions(&gaussian((20, 20), (10, 10), 2.0, 1.0)).unwrap();

    let sweep = explorer.parameter_sweep("c", &[0.5, 1.0, 3.0], 30).unwrap();

    // c * dt * sqrt(2): 0.35, 0.71, 2.12
    assert_eq!(sweep.stable, vec![true, true, false]);
    assert!(sweep.metrics[2].max_value.abs() > sweep.metrics[0].max_value.abs());
}

#[test]
fn test_grid_is_row_major_over_first_parameter() {
    let explorer = heat_explorer(BoundaryCondition::Dirichlet(0.0));

    let grid = explorer
        .parameter_grid("alpha", &[0.1, 0.3], "dt", &[0.2, 0.5, 1.5], 10)
        .unwrap();

    assert_eq!(grid.solutions.len(), 6);

    let expected = heat_solver(BoundaryCondition::Dirichlet(0.0), 0.3, 0.5, &hot_cell((20, 20), (10, 10), 100.0))
        .solve(10)
        .unwrap();
    assert_eq!(grid.solution(1, 1), Some(&expected));

    // alpha * dt * 2 <= 0.5
    assert_eq!(grid.is_stable(0, 2), Some(true));
    assert_eq!(grid.is_stable(1, 2), Some(false));
    assert_eq!(grid.is_stable(2, 0), None);
}

#[test]
fn test_sensitivity_separates_conserved_metrics() {
    let explorer = heat_explorer(BoundaryCondition::Periodic);

    let result = explorer.sensitivity_analysis("alpha", 0.2, 10.0, 5, 20).unwrap();

    assert_eq!(result.parameter_values().len(), 5);
    assert!((result.parameter_values()[0] - 0.18).abs() < 1e-12);
    assert!((result.parameter_values()[4] - 0.22).abs() < 1e-12);

    // Periodic heat keeps the total; the peak responds to alpha
    assert!(result.coefficient("total_sum").unwrap() < 1e-9);
    assert!(result.coefficient("max_value").unwrap() > 0.1);

    let (name, _) = result.most_sensitive().unwrap();
    assert_ne!(name, "total_sum");
    assert_eq!(result.coefficients.len(), METRIC_NAMES.len());
}

#[test]
fn test_compare_runs_each_configuration() {
    let mut explorer = ParameterExplorer::new(EquationKind::Wave, (24, 24))
        .unwrap()
        .with_boundary(BoundaryCondition::absorbing());
    let u0 = gaussian((24, 24), (12, 12), 2.0, 1.0);
    explorer.set_initial_conditions(&u0).unwrap();

    let configs = [
        RunConfig::new(&[("c", 1.0), ("dt", 0.1)], 30),
        RunConfig::new(&[("c", 0.5), ("dt", 0.2)], 15),
    ];
    let results = explorer.compare_parameters(&configs, &["fast", "slow"]).unwrap();

    assert_eq!(results[0].0, "fast");
    assert_eq!(results[1].0, "slow");

    let direct = wave_solver(BoundaryCondition::absorbing(), 0.5, 0.2, &u0).solve(15).unwrap();
    assert_eq!(results[1].1, direct);

    assert!(explorer
        .compare_parameters(&configs, &["only one"])
        .unwrap_err()
        .is_configuration_error());
}

#[test]
fn test_exploration_requires_initial_conditions() {
    let explorer = ParameterExplorer::new(EquationKind::Heat, (8, 8)).unwrap();

    let err = explorer.parameter_sweep("alpha", &[0.1], 5).unwrap_err();
    assert!(err.is_configuration_error());
}

// =================================================================================================
// Export
// =================================================================================================

#[test]
fn test_sweep_round_trips_through_csv() {
    let explorer = heat_explorer(BoundaryCondition::Periodic);
    let sweep = explorer.parameter_sweep("alpha", &[0.1, 0.2], 10).unwrap();

    let file = NamedTempFile::new().unwrap();
    let path = file.path().to_str().unwrap();
    CsvExporter::default().export_sweep(&sweep, path).unwrap();

    let lines = data_lines(file.path());
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("alpha,max_value,"));
    assert!(lines[0].ends_with(",stable"));

    let cells: Vec<&str> = lines[2].split(',').collect();
    assert_eq!(cells[0], "0.200000");
    let total: f64 = cells[3].parse().unwrap();
    assert!((total - 100.0).abs() < 1e-6);
    assert_eq!(cells[6], "true");
}

#[test]
fn test_frames_export_carries_solver_metadata() {
    let u0 = hot_cell((16, 16), (8, 8), 10.0);
    let mut solver = heat_solver(BoundaryCondition::Periodic, 0.2, 0.5, &u0);
    let frames = solver.solve_with_frames(12, 4).unwrap();

    let mut metadata = CsvMetadata::from_solver(&solver);
    metadata.add_custom("Run", "periodic check");
    let exporter = CsvExporter::new(CsvConfig::default().with_metadata(metadata));

    let file = NamedTempFile::new().unwrap();
    exporter.export_frames(&frames, file.path().to_str().unwrap()).unwrap();

    let content = fs::read_to_string(file.path()).unwrap();
    assert!(content.starts_with("# PDE Simulation Data\n"));
    assert!(content.contains("# Boundary: periodic\n"));
    assert!(content.contains("# Steps: 12\n"));
    assert!(content.contains("# Run: periodic check\n"));

    // Header plus frames at t = 0, 2, 4, 6
    let lines = data_lines(file.path());
    assert_eq!(lines.len(), 5);
    assert!(lines[4].starts_with("6.000000,"));
}

#[test]
fn test_field_export_is_one_line_per_row() {
    let u0 = gaussian((6, 9), (3, 4), 1.5, 1.0);

    let file = NamedTempFile::new().unwrap();
    CsvExporter::new(CsvConfig::european())
        .export_field(&u0, file.path().to_str().unwrap())
        .unwrap();

    let lines = data_lines(file.path());
    assert_eq!(lines.len(), 6);
    assert!(lines.iter().all(|line| line.split(';').count() == 9));
}
