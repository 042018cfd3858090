//! Reframe Path Solver
//!
//! Turns noisy, irregularly-timed position observations along one axis
//! into a smoothed, velocity-limited, bounded camera position:
//! - **History:** time-windowed observation buffer with a median filter
//! - **Motion gate:** hysteresis deciding when observed motion is real
//! - **Solver:** rate-limited velocity integration clamped to the frame
//! - **Replay:** drive a solver from a recorded trace
//!
//! This crate is pure computation: no I/O outside option-file loading.
//! All inputs are data; all outputs are data.

pub mod error;
pub mod history;
pub mod motion;
pub mod options;
pub mod replay;
pub mod solver;

pub use error::SolverError;
pub use options::KinematicOptions;
pub use solver::KinematicPathSolver;
