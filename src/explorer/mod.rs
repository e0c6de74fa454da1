//! Parameter exploration
//!
//! A [`ParameterExplorer`] holds everything a run needs except the
//! parameters: equation, grid shape, boundary condition and initial field.
//! Each exploration builds one independent [`PdeSolver`] per parameter
//! point, runs it and reduces the final field to [`FieldMetrics`].
//!
//! # Operations
//!
//! - [`parameter_sweep`](ParameterExplorer::parameter_sweep): one parameter
//!   varied over a list of values
//! - [`parameter_grid`](ParameterExplorer::parameter_grid): two parameters
//!   over their Cartesian product
//! - [`sensitivity_analysis`](ParameterExplorer::sensitivity_analysis):
//!   relative response of each metric to a relative parameter change
//! - [`compare_parameters`](ParameterExplorer::compare_parameters): labelled
//!   runs with arbitrary parameter sets and step counts
//!
//! # Parallelism
//!
//! Runs share nothing, so with the `parallel` feature they are distributed
//! over the rayon pool. Results always come back in input order.
//!
//! # Example
//!
//! ```rust
//! use pde_rs::explorer::ParameterExplorer;
//! use pde_rs::models::InitialConditions;
//! use pde_rs::physics::EquationKind;
//!
//! # fn main() -> pde_rs::Result<()> {
//! let mut explorer = ParameterExplorer::new(EquationKind::Heat, (30, 30))?;
//! explorer.set_initial_conditions(&InitialConditions::point_source((30, 30), (15, 15), 100.0)?)?;
//!
//! let sweep = explorer.parameter_sweep("alpha", &[0.1, 0.2, 0.4], 50)?;
//! let peaks = sweep.metric("max_value").unwrap_or_default();
//! assert!(peaks[0] > peaks[2]);
//! # Ok(())
//! # }
//! ```

mod metrics;

pub use metrics::{FieldMetrics, METRIC_NAMES};

use log::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{PdeError, Result, require_positive};
use crate::physics::grid::check_shape;
use crate::physics::{EquationKind, Grid, PhysicalParameters};
use crate::solver::{BoundaryCondition, PdeSolver};

/// Base-metric magnitude below which sensitivity uses absolute change
const SENSITIVITY_ZERO_TOLERANCE: f64 = 1e-12;

// =================================================================================================
// Result types
// =================================================================================================

/// Outcome of a one-parameter sweep, aligned index-for-index
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    /// Swept parameter
    pub parameter_name: String,

    /// Values in input order
    pub parameter_values: Vec<f64>,

    /// Final field of each run
    pub solutions: Vec<Grid>,

    /// Metrics of each final field
    pub metrics: Vec<FieldMetrics>,

    /// Whether each point satisfied the stability bound
    pub stable: Vec<bool>,
}

impl SweepResult {
    /// Number of sweep points
    pub fn len(&self) -> usize {
        self.parameter_values.len()
    }

    /// Whether the sweep is empty
    pub fn is_empty(&self) -> bool {
        self.parameter_values.is_empty()
    }

    /// One metric across the sweep, `None` for an unknown name
    pub fn metric(&self, name: &str) -> Option<Vec<f64>> {
        self.metrics.iter().map(|m| m.get(name)).collect()
    }
}

/// Outcome of a two-parameter grid exploration
///
/// Points are stored row-major: `a` is the outer index.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    /// Outer parameter name
    pub name_a: String,

    /// Outer parameter values
    pub values_a: Vec<f64>,

    /// Inner parameter name
    pub name_b: String,

    /// Inner parameter values
    pub values_b: Vec<f64>,

    /// Final fields, `values_a.len() * values_b.len()` of them
    pub solutions: Vec<Grid>,

    /// Metrics of each final field
    pub metrics: Vec<FieldMetrics>,

    /// Stability of each point
    pub stable: Vec<bool>,
}

impl ParameterGrid {
    fn index(&self, ia: usize, ib: usize) -> Option<usize> {
        (ia < self.values_a.len() && ib < self.values_b.len()).then(|| ia * self.values_b.len() + ib)
    }

    /// Final field at `(values_a[ia], values_b[ib])`
    pub fn solution(&self, ia: usize, ib: usize) -> Option<&Grid> {
        self.index(ia, ib).map(|k| &self.solutions[k])
    }

    /// Metrics at `(values_a[ia], values_b[ib])`
    pub fn metrics_at(&self, ia: usize, ib: usize) -> Option<&FieldMetrics> {
        self.index(ia, ib).map(|k| &self.metrics[k])
    }

    /// Stability at `(values_a[ia], values_b[ib])`
    pub fn is_stable(&self, ia: usize, ib: usize) -> Option<bool> {
        self.index(ia, ib).map(|k| self.stable[k])
    }
}

/// Outcome of a sensitivity analysis
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityResult {
    /// Perturbed parameter
    pub parameter_name: String,

    /// Centre of the perturbation
    pub base_value: f64,

    /// Half-width of the sampled range, percent of `base_value`
    pub perturbation_percent: f64,

    /// Metrics at `base_value`
    pub base_metrics: FieldMetrics,

    /// Runs over the sampled range
    pub sweep: SweepResult,

    /// Normalised sensitivity coefficient per metric, [`METRIC_NAMES`] order
    pub coefficients: Vec<(&'static str, f64)>,
}

impl SensitivityResult {
    /// Sampled parameter values
    pub fn parameter_values(&self) -> &[f64] {
        &self.sweep.parameter_values
    }

    /// Coefficient of one metric
    pub fn coefficient(&self, metric: &str) -> Option<f64> {
        self.coefficients
            .iter()
            .find(|(name, _)| *name == metric)
            .map(|&(_, c)| c)
    }

    /// Metric with the largest coefficient
    pub fn most_sensitive(&self) -> Option<(&'static str, f64)> {
        self.coefficients
            .iter()
            .copied()
            .filter(|(_, c)| c.is_finite())
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// One labelled configuration for [`ParameterExplorer::compare_parameters`]
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Named parameters, merged onto the explorer's base parameters
    pub parameters: Vec<(String, f64)>,

    /// Number of steps to run
    pub steps: usize,
}

impl RunConfig {
    /// Build a configuration
    pub fn new(parameters: &[(&str, f64)], steps: usize) -> Self {
        Self {
            parameters: parameters
                .iter()
                .map(|&(name, value)| (name.to_string(), value))
                .collect(),
            steps,
        }
    }
}

// =================================================================================================
// Explorer
// =================================================================================================

/// Runs families of independent simulations over parameter values
#[derive(Debug, Clone)]
pub struct ParameterExplorer {
    kind: EquationKind,
    shape: (usize, usize),
    spacing: (f64, f64),
    boundary: BoundaryCondition,
    base: PhysicalParameters,
    initial: Option<Grid>,
}

impl ParameterExplorer {
    /// Explorer for `kind` on a `(rows, cols)` grid
    ///
    /// Defaults: Dirichlet(0) boundary, the equation's default parameters,
    /// unit spacing.
    pub fn new(kind: EquationKind, shape: (usize, usize)) -> Result<Self> {
        check_shape(shape.0, shape.1)?;
        Ok(Self {
            kind,
            shape,
            spacing: (1.0, 1.0),
            boundary: BoundaryCondition::default(),
            base: kind.default_parameters(),
            initial: None,
        })
    }

    /// Builder: boundary condition used by every run
    pub fn with_boundary(mut self, boundary: BoundaryCondition) -> Self {
        self.boundary = boundary;
        self
    }

    /// Builder: grid spacing used by every run
    pub fn with_spacing(mut self, dx: f64, dy: f64) -> Result<Self> {
        self.spacing = (require_positive("dx", dx)?, require_positive("dy", dy)?);
        Ok(self)
    }

    /// Builder: override base parameters by name
    pub fn with_base_parameters(mut self, named: &[(&str, f64)]) -> Result<Self> {
        self.base = self.base.with_named(named)?;
        Ok(self)
    }

    /// Set the field every run starts from
    pub fn set_initial_conditions(&mut self, field: &Grid) -> Result<()> {
        if field.shape() != self.shape {
            return Err(PdeError::ShapeMismatch {
                expected: self.shape,
                found: field.shape(),
            });
        }
        self.initial = Some(field.clone());
        Ok(())
    }

    /// Equation kind
    pub fn kind(&self) -> EquationKind {
        self.kind
    }

    /// Grid shape
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Boundary condition
    pub fn boundary(&self) -> &BoundaryCondition {
        &self.boundary
    }

    /// Parameters a run starts from before overrides
    pub fn base_parameters(&self) -> PhysicalParameters {
        self.base
    }

    // ===================================== Explorations =====================================

    /// Vary one parameter over `values`, all other parameters at base
    ///
    /// # Errors
    ///
    /// - [`PdeError::Configuration`] for an unknown name or missing initial
    ///   conditions
    /// - [`PdeError::InvalidParameter`] for a rejected value; nothing is
    ///   run in that case
    pub fn parameter_sweep(&self, name: &str, values: &[f64], steps: usize) -> Result<SweepResult> {
        let points = values
            .iter()
            .map(|&v| self.base.with_named(&[(name, v)]))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "{} sweep over '{}': {} points, {} steps each",
            self.kind,
            name,
            points.len(),
            steps
        );

        let runs: Vec<(PhysicalParameters, usize)> = points.iter().map(|&p| (p, steps)).collect();
        let solutions = self.run_all(&runs)?;

        Ok(SweepResult {
            parameter_name: name.to_string(),
            parameter_values: values.to_vec(),
            metrics: solutions.iter().map(FieldMetrics::from_grid).collect(),
            stable: points.iter().map(|p| self.is_stable(p)).collect(),
            solutions,
        })
    }

    /// Vary two parameters over the Cartesian product of their values
    pub fn parameter_grid(
        &self,
        name_a: &str,
        values_a: &[f64],
        name_b: &str,
        values_b: &[f64],
        steps: usize,
    ) -> Result<ParameterGrid> {
        if name_a == name_b {
            return Err(PdeError::Configuration(format!(
                "parameter grid needs two distinct parameters, got '{name_a}' twice"
            )));
        }

        let mut points = Vec::with_capacity(values_a.len() * values_b.len());
        for &a in values_a {
            for &b in values_b {
                points.push(self.base.with_named(&[(name_a, a), (name_b, b)])?);
            }
        }

        info!(
            "{} grid over '{}' x '{}': {}x{} points, {} steps each",
            self.kind,
            name_a,
            name_b,
            values_a.len(),
            values_b.len(),
            steps
        );

        let runs: Vec<(PhysicalParameters, usize)> = points.iter().map(|&p| (p, steps)).collect();
        let solutions = self.run_all(&runs)?;

        Ok(ParameterGrid {
            name_a: name_a.to_string(),
            values_a: values_a.to_vec(),
            name_b: name_b.to_string(),
            values_b: values_b.to_vec(),
            metrics: solutions.iter().map(FieldMetrics::from_grid).collect(),
            stable: points.iter().map(|p| self.is_stable(p)).collect(),
            solutions,
        })
    }

    /// Response of each metric to perturbing one parameter around `base_value`
    ///
    /// Samples `n_samples` evenly spaced values over
    /// `base * (1 ± perturbation_percent / 100)`. For each metric the
    /// coefficient is
    ///
    /// ```text
    /// (range(metric) / |metric(base)|) / (range(param) / base)
    /// ```
    ///
    /// with the absolute metric range used when `metric(base)` is zero.
    ///
    /// # Errors
    ///
    /// - [`PdeError::InvalidParameter`] for a non-positive base or a
    ///   perturbation outside `(0, 100)`
    /// - [`PdeError::Configuration`] for fewer than two samples
    pub fn sensitivity_analysis(
        &self,
        name: &str,
        base_value: f64,
        perturbation_percent: f64,
        n_samples: usize,
        steps: usize,
    ) -> Result<SensitivityResult> {
        require_positive(name, base_value)?;
        if !(perturbation_percent > 0.0 && perturbation_percent < 100.0) {
            return Err(PdeError::invalid(
                "perturbation_percent",
                perturbation_percent,
                "must lie in (0, 100)",
            ));
        }
        if n_samples < 2 {
            return Err(PdeError::Configuration(format!(
                "sensitivity analysis needs at least 2 samples, got {n_samples}"
            )));
        }

        let fraction = perturbation_percent / 100.0;
        let values = linspace(base_value * (1.0 - fraction), base_value * (1.0 + fraction), n_samples);

        info!(
            "{} sensitivity of '{}' around {} (±{}%)",
            self.kind, name, base_value, perturbation_percent
        );

        let base_params = self.base.with_named(&[(name, base_value)])?;
        let base_metrics = FieldMetrics::from_grid(&self.run(base_params, steps)?);
        let sweep = self.parameter_sweep(name, &values, steps)?;

        let relative_param = 2.0 * fraction;
        let coefficients = METRIC_NAMES
            .iter()
            .map(|&metric| {
                let series = sweep.metric(metric).unwrap_or_default();
                let (lo, hi) = series
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
                let change = hi - lo;

                let reference = base_metrics.get(metric).unwrap_or(0.0).abs();
                let relative_change = if reference > SENSITIVITY_ZERO_TOLERANCE {
                    change / reference
                } else {
                    change
                };

                (metric, relative_change / relative_param)
            })
            .collect();

        Ok(SensitivityResult {
            parameter_name: name.to_string(),
            base_value,
            perturbation_percent,
            base_metrics,
            sweep,
            coefficients,
        })
    }

    /// Run labelled configurations and return their final fields
    ///
    /// # Errors
    ///
    /// [`PdeError::Configuration`] when `labels` and `configs` differ in
    /// length, plus any parameter error of a configuration.
    pub fn compare_parameters(&self, configs: &[RunConfig], labels: &[&str]) -> Result<Vec<(String, Grid)>> {
        if configs.len() != labels.len() {
            return Err(PdeError::Configuration(format!(
                "{} configurations but {} labels",
                configs.len(),
                labels.len()
            )));
        }

        let runs = configs
            .iter()
            .map(|config| {
                let named: Vec<(&str, f64)> = config
                    .parameters
                    .iter()
                    .map(|(name, value)| (name.as_str(), *value))
                    .collect();
                Ok((self.base.with_named(&named)?, config.steps))
            })
            .collect::<Result<Vec<_>>>()?;

        info!("{} comparison of {} configurations", self.kind, runs.len());

        let solutions = self.run_all(&runs)?;
        Ok(labels
            .iter()
            .map(|label| label.to_string())
            .zip(solutions)
            .collect())
    }

    // ======================================= Internals ======================================

    fn is_stable(&self, params: &PhysicalParameters) -> bool {
        params.is_stable(self.spacing.0, self.spacing.1)
    }

    fn initial(&self) -> Result<&Grid> {
        self.initial.as_ref().ok_or_else(|| {
            PdeError::Configuration(
                "initial conditions not set: call set_initial_conditions before exploring".to_string(),
            )
        })
    }

    /// One independent run
    fn run(&self, params: PhysicalParameters, steps: usize) -> Result<Grid> {
        let initial = self.initial()?;

        let mut solver =
            PdeSolver::new(self.kind, self.shape, self.boundary)?.with_spacing(self.spacing.0, self.spacing.1)?;
        solver.configure(params)?;
        solver.set_initial_conditions(initial)?;
        solver.solve(steps)
    }

    /// Independent runs, results in input order
    fn run_all(&self, runs: &[(PhysicalParameters, usize)]) -> Result<Vec<Grid>> {
        self.initial()?;

        #[cfg(feature = "parallel")]
        let solutions = runs
            .par_iter()
            .map(|&(params, steps)| self.run(params, steps))
            .collect::<Result<Vec<_>>>();

        #[cfg(not(feature = "parallel"))]
        let solutions = runs
            .iter()
            .map(|&(params, steps)| self.run(params, steps))
            .collect::<Result<Vec<_>>>();

        solutions
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|k| if k == n - 1 { end } else { start + step * k as f64 })
                .collect()
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
