//! CSV export for fields, sweeps and frame captures
//!
//! CSV is readable by spreadsheets, pandas, MATLAB and most data tools.
//!
//! # Features
//!
//! - **Fields**: the grid written as a matrix, one line per row `i`
//! - **Sweeps**: one line per parameter value with every metric
//! - **Frames**: one line per captured frame with its time and metrics
//! - **Metadata**: optional `#` comment header with a UTC timestamp
//! - **Customizable**: delimiter, decimal separator, precision
//! - **Validation**: rejects empty data and NaN/Inf values
//!
//! # Output formats
//!
//! Field (`export_field`):
//! ```csv
//! 0.000000,0.000000,0.000000
//! 0.000000,1.000000,0.000000
//! 0.000000,0.000000,0.000000
//! ```
//!
//! Sweep (`export_sweep`):
//! ```csv
//! alpha,max_value,min_value,total_sum,total_energy,center_value,stable
//! 0.100000,41.012345,0.000000,100.000000,2210.123456,41.012345,true
//! ```
//!
//! With metadata:
//! ```csv
//! # PDE Simulation Data
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Equation: heat
//! # Boundary: dirichlet(0)
//! #
//! ...
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};

use thiserror::Error;

use super::Exporter;
use crate::explorer::{FieldMetrics, METRIC_NAMES, SweepResult};
use crate::physics::Grid;
use crate::solver::{PdeSolver, SimulationResult};

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while exporting to CSV
#[derive(Debug, Error)]
pub enum CsvError {
    /// Underlying file or writer failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Nothing to export
    #[error("empty data: {0}")]
    EmptyData(&'static str),

    /// NaN or Inf in the exported values
    #[error("invalid data: NaN or Inf detected in {0}")]
    NonFinite(String),
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use pde_rs::output::export::CsvConfig;
///
/// let config = CsvConfig {
///     delimiter: ';',
///     precision: 10,
///     ..Default::default()
/// };
/// assert_eq!(config.decimal_separator, '.');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// High precision (12 decimal places)
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }

    /// Format a number with the configured precision and decimal separator
    fn format_number(&self, value: f64) -> String {
        let formatted = format!("{:.prec$}", value, prec = self.precision);

        if self.decimal_separator != '.' {
            formatted.replace('.', &self.decimal_separator.to_string())
        } else {
            formatted
        }
    }
}

/// Metadata for CSV header comments
///
/// All fields are optional; only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    /// Equation name ("heat", "wave")
    pub equation: Option<String>,

    /// Time-stepping method
    pub method: Option<String>,

    /// Boundary condition
    pub boundary: Option<String>,

    /// Parameter set, as displayed
    pub parameters: Option<String>,

    /// Grid shape
    pub shape: Option<(usize, usize)>,

    /// Simulation time reached
    pub time: Option<f64>,

    /// Steps taken
    pub steps: Option<usize>,

    /// Additional custom entries
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Describe the current state of a solver
    pub fn from_solver(solver: &PdeSolver) -> Self {
        Self {
            equation: Some(solver.kind().name().to_string()),
            method: Some(solver.method_name().to_string()),
            boundary: Some(solver.boundary().to_string()),
            parameters: Some(solver.parameters().to_string()),
            shape: Some(solver.shape()),
            time: Some(solver.time()),
            steps: Some(solver.steps_taken()),
            custom: Vec::new(),
        }
    }

    /// Add custom entry
    pub fn add_custom(&mut self, key: &str, value: &str) {
        self.custom.push((key.to_string(), value.to_string()));
    }

    fn write_header<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "# PDE Simulation Data")?;
        writeln!(out, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

        if let Some(equation) = &self.equation {
            writeln!(out, "# Equation: {}", equation)?;
        }
        if let Some(method) = &self.method {
            writeln!(out, "# Method: {}", method)?;
        }
        if let Some(boundary) = &self.boundary {
            writeln!(out, "# Boundary: {}", boundary)?;
        }
        if let Some(parameters) = &self.parameters {
            writeln!(out, "# Parameters: {}", parameters)?;
        }
        if let Some((rows, cols)) = self.shape {
            writeln!(out, "# Grid: {}x{}", rows, cols)?;
        }
        if let Some(time) = self.time {
            writeln!(out, "# Time: {}", time)?;
        }
        if let Some(steps) = self.steps {
            writeln!(out, "# Steps: {}", steps)?;
        }
        for (key, value) in &self.custom {
            writeln!(out, "# {}: {}", key, value)?;
        }

        writeln!(out, "#")
    }
}

// =============================================================================
// Exporter
// =============================================================================

/// CSV implementation of [`Exporter`]
///
/// The `write_*` methods target any [`Write`]; the [`Exporter`] methods
/// wrap them around a buffered file.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    config: CsvConfig,
}

impl CsvExporter {
    /// Exporter with a given configuration
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Write a field as a matrix, row `i` on line `i`
    pub fn write_field<W: Write>(&self, field: &Grid, out: &mut W) -> Result<(), CsvError> {
        if !field.is_finite() {
            return Err(CsvError::NonFinite("field".to_string()));
        }

        self.write_metadata(out)?;

        let values = field.as_matrix();
        for i in 0..field.rows() {
            let line = values
                .row(i)
                .iter()
                .map(|&v| self.config.format_number(v))
                .collect::<Vec<_>>();
            self.write_line(out, &line)?;
        }

        Ok(())
    }

    /// Write a sweep table
    pub fn write_sweep<W: Write>(&self, sweep: &SweepResult, out: &mut W) -> Result<(), CsvError> {
        if sweep.is_empty() {
            return Err(CsvError::EmptyData("sweep has no points"));
        }

        self.write_metadata(out)?;

        let mut header = vec![sweep.parameter_name.clone()];
        header.extend(METRIC_NAMES.iter().map(|name| name.to_string()));
        header.push("stable".to_string());
        self.write_line(out, &header)?;

        for ((value, metrics), stable) in sweep
            .parameter_values
            .iter()
            .zip(&sweep.metrics)
            .zip(&sweep.stable)
        {
            // Unstable points may legitimately hold Inf/NaN metrics
            let mut line = vec![self.config.format_number(*value)];
            line.extend(self.format_metrics(metrics));
            line.push(stable.to_string());
            self.write_line(out, &line)?;
        }

        Ok(())
    }

    /// Write the per-frame time series of a frame capture
    pub fn write_frames<W: Write>(&self, result: &SimulationResult, out: &mut W) -> Result<(), CsvError> {
        if result.is_empty() {
            return Err(CsvError::EmptyData("result has no frames"));
        }
        if let Some(k) = result.time_points.iter().position(|t| !t.is_finite()) {
            return Err(CsvError::NonFinite(format!("time point {}", k)));
        }

        self.write_metadata(out)?;

        let mut header = vec!["time".to_string()];
        header.extend(METRIC_NAMES.iter().map(|name| name.to_string()));
        self.write_line(out, &header)?;

        for (time, frame) in result.time_points.iter().zip(&result.frames) {
            let mut line = vec![self.config.format_number(*time)];
            line.extend(self.format_metrics(&FieldMetrics::from_grid(frame)));
            self.write_line(out, &line)?;
        }

        Ok(())
    }

    fn format_metrics(&self, metrics: &FieldMetrics) -> Vec<String> {
        metrics
            .values()
            .iter()
            .map(|&(_, v)| self.config.format_number(v))
            .collect()
    }

    fn write_metadata<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match (&self.config.metadata, self.config.include_metadata) {
            (Some(metadata), true) => metadata.write_header(out),
            _ => Ok(()),
        }
    }

    fn write_line<W: Write>(&self, out: &mut W, cells: &[String]) -> io::Result<()> {
        writeln!(out, "{}", cells.join(&self.config.delimiter.to_string()))
    }

    fn to_file<F>(&self, path: &str, write: F) -> Result<(), CsvError>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<(), CsvError>,
    {
        let mut out = BufWriter::new(File::create(path)?);
        write(&mut out)?;
        out.flush()?;
        Ok(())
    }
}

impl Exporter for CsvExporter {
    type Error = CsvError;

    fn export_field(&self, field: &Grid, path: &str) -> Result<(), CsvError> {
        self.to_file(path, |out| self.write_field(field, out))
    }

    fn export_sweep(&self, sweep: &SweepResult, path: &str) -> Result<(), CsvError> {
        self.to_file(path, |out| self.write_sweep(sweep, out))
    }

    fn export_frames(&self, result: &SimulationResult, path: &str) -> Result<(), CsvError> {
        self.to_file(path, |out| self.write_frames(result, out))
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    use crate::physics::EquationKind;
    use crate::solver::BoundaryCondition;

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<(), CsvError>,
    {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn small_sweep() -> SweepResult {
        let solutions = vec![Grid::filled(3, 3, 1.0).unwrap(), Grid::filled(3, 3, 2.0).unwrap()];
        SweepResult {
            parameter_name: "alpha".to_string(),
            parameter_values: vec![0.1, 0.2],
            metrics: solutions.iter().map(FieldMetrics::from_grid).collect(),
            stable: vec![true, false],
            solutions,
        }
    }

    #[test]
    fn test_field_layout() {
        let field = Grid::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.5]]).unwrap();
        let exporter = CsvExporter::new(CsvConfig::default().precision(1));

        let text = render(|out| exporter.write_field(&field, out));
        assert_eq!(text, "1.0,2.0\n3.0,4.5\n");
    }

    #[test]
    fn test_european_format() {
        let field = Grid::from_rows(&[vec![1.25, 2.5]]).unwrap();
        let exporter = CsvExporter::new(CsvConfig { precision: 2, ..CsvConfig::european() });

        let text = render(|out| exporter.write_field(&field, out));
        assert_eq!(text, "1,25;2,50\n");
    }

    #[test]
    fn test_non_finite_field_rejected() {
        let mut field = Grid::zeros(2, 2).unwrap();
        field[(1, 0)] = f64::NAN;

        let mut buffer = Vec::new();
        let err = CsvExporter::default().write_field(&field, &mut buffer).unwrap_err();
        assert!(matches!(err, CsvError::NonFinite(_)));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_sweep_table() {
        let exporter = CsvExporter::new(CsvConfig::default().precision(1));
        let text = render(|out| exporter.write_sweep(&small_sweep(), out));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "alpha,max_value,min_value,total_sum,total_energy,center_value,stable"
        );
        assert_eq!(lines[1], "0.1,1.0,1.0,9.0,9.0,1.0,true");
        assert_eq!(lines[2], "0.2,2.0,2.0,18.0,36.0,2.0,false");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_sweep_rejected() {
        let sweep = SweepResult {
            parameter_name: "c".to_string(),
            parameter_values: vec![],
            solutions: vec![],
            metrics: vec![],
            stable: vec![],
        };
        let err = CsvExporter::default().write_sweep(&sweep, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CsvError::EmptyData(_)));
    }

    #[test]
    fn test_metadata_header() {
        let mut solver = PdeSolver::new(EquationKind::Heat, (4, 4), BoundaryCondition::Periodic).unwrap();
        solver.set_parameters(&[("alpha", 0.2)]).unwrap();

        let mut metadata = CsvMetadata::from_solver(&solver);
        metadata.add_custom("Run", "baseline");

        let exporter = CsvExporter::new(CsvConfig::default().with_metadata(metadata));
        let text = render(|out| exporter.write_field(&Grid::zeros(1, 1).unwrap(), out));

        assert!(text.starts_with("# PDE Simulation Data\n# Generated: "));
        assert!(text.contains("# Equation: heat\n"));
        assert!(text.contains("# Boundary: periodic\n"));
        assert!(text.contains("# Grid: 4x4\n"));
        assert!(text.contains("# Run: baseline\n"));
        assert!(text.ends_with("#\n0.000000\n"));
    }

    #[test]
    fn test_export_frames_to_file() {
        let mut solver = PdeSolver::new(EquationKind::Wave, (6, 6), BoundaryCondition::Neumann(0.0)).unwrap();
        solver.set_parameters(&[("c", 1.0), ("dt", 0.1)]).unwrap();
        let mut u0 = Grid::zeros(6, 6).unwrap();
        u0[(3, 3)] = 1.0;
        solver.set_initial_conditions(&u0).unwrap();
        let result = solver.solve_with_frames(4, 2).unwrap();

        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        CsvExporter::default().export_frames(&result, path).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[0].starts_with("time,max_value"));
        // t = 0, 0.2, 0.4
        assert_eq!(lines.len(), 4);
        assert!(lines[3].starts_with("0.400000,"));
    }

    #[test]
    fn test_export_field_to_file() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();

        CsvExporter::default()
            .export_field(&Grid::filled(3, 2, 0.5).unwrap(), path)
            .unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.lines().all(|line| line == "0.500000,0.500000"));
    }

    #[test]
    fn test_invalid_path() {
        let err = CsvExporter::default()
            .export_field(&Grid::zeros(2, 2).unwrap(), "/nonexistent/dir/field.csv")
            .unwrap_err();
        assert!(matches!(err, CsvError::Io(_)));
    }
}
