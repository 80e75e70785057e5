//! Simulation drivers and trace input.
//!
//! Provides the trace reader, the single-cache simulation driver, and the
//! parallel multi-geometry sweep.

/// Single-cache simulation driver.
pub mod simulator;

/// Parallel multi-geometry sweeps.
pub mod sweep;

/// Trace parsing and trace file discovery.
pub mod trace;

pub use simulator::{Simulator, simulate};
pub use sweep::simulate_many;
pub use trace::{TraceError, TraceRecord};
