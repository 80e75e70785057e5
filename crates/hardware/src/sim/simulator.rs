//! Trace-driven simulation driver.
//!
//! Replays an ordered sequence of operations against a [`CacheModel`] and
//! produces a [`ResultSummary`]. Every call starts from a cold cache.

use std::time::Instant;

use tracing::{debug, info};

use super::trace::TraceRecord;
use crate::cache::CacheModel;
use crate::common::{CacheGeometry, SimError};
use crate::stats::ResultSummary;

/// Runs `trace` through `cache` from a cold start.
///
/// The sequence is consumed once, in order. The first invalid address aborts
/// the run.
///
/// # Arguments
///
/// * `cache` - The model to drive. It is reset before the first access.
/// * `trace` - Operations in program order.
/// * `trace_id` - Name recorded in the summary.
///
/// # Errors
///
/// * [`SimError::InvalidAddress`] for an address wider than the geometry allows.
/// * [`SimError::EmptyTrace`] if `trace` yields no operations.
///
/// # Panics
///
/// Panics if the model's counters disagree with the number of operations
/// processed, or if any set holds more than `ways` entries. Either indicates a
/// defect in the model, not bad input.
pub fn simulate<I>(
    cache: &mut CacheModel,
    trace: I,
    trace_id: &str,
) -> Result<ResultSummary, SimError>
where
    I: IntoIterator<Item = TraceRecord>,
{
    cache.reset();
    info!(trace = trace_id, geometry = %cache.geometry(), "simulation started");
    let start = Instant::now();

    let mut processed: u64 = 0;
    for record in trace {
        let _outcome = cache.access(record.op, record.address)?;
        processed += 1;
    }
    let elapsed = start.elapsed();

    let counters = *cache.counters();
    assert_eq!(
        counters.total_ops(),
        processed,
        "operation counters out of step with the trace"
    );
    assert!(
        cache.sets().max_occupancy() <= cache.geometry().ways(),
        "a set holds more than {} entries",
        cache.geometry().ways()
    );

    let summary = ResultSummary::from_counters(cache.geometry(), &counters, trace_id, elapsed)
        .ok_or(SimError::EmptyTrace)?;

    debug!(
        touched_sets = cache.sets().occupied_sets(),
        read_misses = counters.read_misses,
        write_misses = counters.write_misses,
        "final counters"
    );
    info!(
        trace = trace_id,
        ops = processed,
        miss_rate = summary.total_miss_rate,
        elapsed_ms = elapsed.as_millis() as u64,
        "simulation finished"
    );
    Ok(summary)
}

/// Top-level simulator: one cache model that can be replayed over many traces.
#[derive(Clone, Debug)]
pub struct Simulator {
    /// The simulated cache.
    pub cache: CacheModel,
}

impl Simulator {
    /// Creates a simulator around a cold cache of the given geometry.
    pub fn new(geometry: CacheGeometry) -> Self {
        Self {
            cache: CacheModel::new(geometry),
        }
    }

    /// Geometry of the simulated cache.
    pub const fn geometry(&self) -> &CacheGeometry {
        self.cache.geometry()
    }

    /// Replays `trace` from a cold cache. See [`simulate`].
    ///
    /// # Errors
    ///
    /// Same as [`simulate`].
    pub fn run<I>(&mut self, trace: I, trace_id: &str) -> Result<ResultSummary, SimError>
    where
        I: IntoIterator<Item = TraceRecord>,
    {
        simulate(&mut self.cache, trace, trace_id)
    }
}
