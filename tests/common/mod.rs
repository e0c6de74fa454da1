//! Common utilities for integration tests

#![allow(dead_code)]

pub mod test_helpers;

// Re-export commonly used items
pub use test_helpers::{
    assert_grids_close,
    gaussian,
    heat_solver,
    hot_cell,
    init_logging,
    relative_error,
    wave_solver,
};
