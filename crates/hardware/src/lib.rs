//! Trace-driven cache simulator library.
//!
//! This crate models a set-associative cache with LRU replacement and replays
//! memory traces through it:
//! 1. **Common:** Geometry, address decoding, access types, and errors.
//! 2. **Cache:** The LRU set store and the cache model with hit/miss counters.
//! 3. **Simulation:** Trace reading, the simulation driver, and parallel sweeps.
//! 4. **Reporting:** Result summaries and report sinks.
//!
//! # Examples
//!
//! ```
//! use cachesim_core::{CacheGeometry, CacheModel, sim::{TraceRecord, simulate}};
//!
//! let geometry = CacheGeometry::new(2, 1, 1, 8).unwrap();
//! let mut cache = CacheModel::new(geometry);
//! let trace = [
//!     TraceRecord::read(0x01),
//!     TraceRecord::read(0x02),
//!     TraceRecord::read(0x01),
//!     TraceRecord::read(0x03),
//! ];
//!
//! let summary = simulate(&mut cache, trace, "example").unwrap();
//! assert_eq!(summary.read_misses, 3);
//! assert_eq!(summary.write_miss_rate, None);
//! ```

/// Cache model (LRU set store, counters).
pub mod cache;
/// Common types (geometry, addresses, access types, errors).
pub mod common;
/// Configuration (defaults and JSON-loadable structures).
pub mod config;
/// Trace input, simulation driver, and sweeps.
pub mod sim;
/// Result summaries and report sinks.
pub mod stats;

/// The cache model; drive it with `access` or through [`sim::simulate`].
pub use crate::cache::{AccessOutcome, CacheModel};
/// Validated cache shape and the simulator error type.
pub use crate::common::{AccessType, CacheGeometry, SimError};
/// Root configuration type.
pub use crate::config::Config;
/// Result record of a simulation run.
pub use crate::stats::ResultSummary;
