//! Initial-condition models
//!
//! The solver is indifferent to where its starting field comes from: any
//! [`Grid`](crate::physics::Grid) of the right shape will do. This module
//! provides the usual shapes used to probe diffusion and wave propagation.
//!
//! # Available Profiles
//!
//! ## Localised sources
//!
//! [`InitialConditions::point_source`], [`InitialConditions::multiple_sources`]
//! and [`InitialConditions::square_patch`]: sharp features, good for watching
//! heat spread or for testing conservation.
//!
//! ## Smooth pulses
//!
//! [`InitialConditions::gaussian_pulse`] and
//! [`InitialConditions::circular_wave`]: smooth bumps that the wave equation
//! turns into expanding rings without grid-scale noise.
//!
//! ## Periodic patterns
//!
//! [`InitialConditions::sine_wave`]: plane waves, natural companions of the
//! periodic boundary condition.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod initial;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use initial::{InitialConditions, InitialProfile, SineDirection};
