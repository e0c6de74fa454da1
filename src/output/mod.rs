//! Output module for simulation results
//!
//! Rendering is left to external tools; this module writes data they can
//! read.
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! └── export/             ← Data export
//!     ├── mod.rs          ← Exporter trait
//!     └── csv.rs
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pde_rs::output::export::{CsvExporter, Exporter};
//!
//! let exporter = CsvExporter::default();
//! exporter.export_field(&final_field, "field.csv")?;
//! exporter.export_sweep(&sweep, "alpha_sweep.csv")?;
//! exporter.export_frames(&frames, "energy.csv")?;
//! ```

pub mod export;
