//! Stable-fluids smoke simulation on a small square grid.
//!
//! The [`Solver`] advances a velocity field and a passive density field
//! with implicit diffusion, semi-Lagrangian advection and a pressure
//! projection, so any time step stays stable. [`renderer`] and [`input`]
//! hold the display-side pieces: color ramps, texture packing and pointer
//! tracking.

pub mod config;
pub mod error;
pub mod field;
pub mod input;
pub mod renderer;
pub mod solver;

pub use error::{ConfigError, InjectError};
pub use field::Field;
pub use solver::{Boundary, Solver, SolverParams};
