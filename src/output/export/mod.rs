//! Export module for simulation results.
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module, so a
//! new format is a new file.
//!
//! # Available formats
//!
//! | Format  | Module          |
//! |---------|-----------------|
//! | CSV     | [`csv`]         |
//!
//! # Usage example
//!
//! ```rust,no_run
//! use pde_rs::models::InitialConditions;
//! use pde_rs::output::export::{CsvExporter, Exporter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let field = InitialConditions::gaussian_pulse((20, 20), (10.0, 10.0), 3.0, 1.0)?;
//!
//! let exporter = CsvExporter::default();
//! exporter.export_field(&field, "pulse.csv")?;
//! # Ok(())
//! # }
//! ```

pub mod csv;

pub use csv::{CsvConfig, CsvError, CsvExporter, CsvMetadata};

use crate::explorer::SweepResult;
use crate::physics::Grid;
use crate::solver::SimulationResult;

/// Abstraction trait for all export formats.
///
/// # Associated type `Error`
///
/// Each format manages its own errors via the associated type, so callers
/// can react to the precise failure without boxing.
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Exports one field, one line per grid row.
    ///
    /// # Errors
    ///
    /// Returns an error if the field contains non-finite values or the file
    /// cannot be written.
    fn export_field(&self, field: &Grid, path: &str) -> Result<(), Self::Error>;

    /// Exports a parameter sweep, one line per sweep point with the
    /// parameter value, every metric and the stability flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep is empty or the file cannot be written.
    fn export_sweep(&self, sweep: &SweepResult, path: &str) -> Result<(), Self::Error>;

    /// Exports the time series of a frame capture: one line per frame with
    /// its time and summary metrics.
    ///
    /// # Errors
    ///
    /// Returns an error if the result holds no frame or the file cannot be
    /// written.
    fn export_frames(&self, result: &SimulationResult, path: &str) -> Result<(), Self::Error>;
}
