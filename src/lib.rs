//! Lamb wave dispersion diagrams for free isotropic plates.
//!
//! The Rayleigh-Lamb equations are evaluated over a grid of frequency and
//! phase velocity. Their magnitude in dB is low wherever a guided mode
//! exists, so a grayscale rendering of the field shows the dispersion
//! curves as dark lines.
pub mod datatypes;
pub mod error;
pub mod grid;
pub mod input;
pub mod post_processor;
pub mod solver;

pub use datatypes::{
    DispersionDiagram, DispersionField, GridSpec, MaterialProperties, ModeFamily, PlateGeometry,
};
pub use error::LambError;
pub use solver::{run, SolverOptions};
