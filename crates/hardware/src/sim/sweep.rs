//! Multi-geometry sweeps.
//!
//! Simulates several cache geometries over one trace. Each geometry gets its
//! own [`CacheModel`] on the rayon pool; the trace is shared read-only and
//! nothing mutable crosses threads.

use rayon::prelude::*;
use tracing::debug;

use super::simulator::simulate;
use super::trace::TraceRecord;
use crate::cache::CacheModel;
use crate::common::{CacheGeometry, SimError};
use crate::stats::ResultSummary;

/// Simulates every geometry in `geometries` over `trace` in parallel.
///
/// # Returns
///
/// One result per geometry, in the order the geometries were given.
pub fn simulate_many(
    geometries: &[CacheGeometry],
    trace: &[TraceRecord],
    trace_id: &str,
) -> Vec<Result<ResultSummary, SimError>> {
    debug!(configurations = geometries.len(), trace = trace_id, "sweep started");
    geometries
        .par_iter()
        .map(|&geometry| {
            let mut cache = CacheModel::new(geometry);
            simulate(&mut cache, trace.iter().copied(), trace_id)
        })
        .collect()
}
