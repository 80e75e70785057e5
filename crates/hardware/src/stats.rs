//! Simulation statistics and reporting.
//!
//! This module turns the counters of a finished run into a result record and
//! hands it to report sinks. It provides:
//! 1. **Result Summary:** Geometry, raw counters, miss rates, trace name, and wall time.
//! 2. **Report Sinks:** A trait for consumers plus console and JSON-lines implementations.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

use crate::cache::CacheCounters;
use crate::common::CacheGeometry;

/// Immutable result of one simulation run.
///
/// Per-operation miss rates are `None` when the trace has no operation of that
/// kind; they serialize as `null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultSummary {
    /// Total data capacity in bytes.
    pub cache_size_bytes: usize,
    /// Associativity.
    pub ways: usize,
    /// Number of sets.
    pub sets: usize,
    /// Block size in bytes.
    pub block_size: usize,
    /// Address width in bits.
    pub address_width: u32,
    /// Read operations.
    pub read_ops: u64,
    /// Write operations.
    pub write_ops: u64,
    /// Read misses.
    pub read_misses: u64,
    /// Write misses.
    pub write_misses: u64,
    /// `(read_misses + write_misses) / (read_ops + write_ops)`.
    pub total_miss_rate: f64,
    /// `write_misses / write_ops`, absent for a trace without writes.
    pub write_miss_rate: Option<f64>,
    /// `read_misses / read_ops`, absent for a trace without reads.
    pub read_miss_rate: Option<f64>,
    /// Name the trace is reported under.
    pub trace_id: String,
    /// Wall time spent in the run.
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

/// `numerator / denominator`, or `None` when the denominator is zero.
fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator != 0).then(|| numerator as f64 / denominator as f64)
}

impl ResultSummary {
    /// Builds a summary from final counters.
    ///
    /// # Returns
    ///
    /// `None` if no operation was performed, since the total miss rate is then
    /// undefined.
    pub fn from_counters(
        geometry: &CacheGeometry,
        counters: &CacheCounters,
        trace_id: impl Into<String>,
        elapsed: Duration,
    ) -> Option<Self> {
        let total_miss_rate = ratio(counters.total_misses(), counters.total_ops())?;
        Some(Self {
            cache_size_bytes: geometry.size_bytes(),
            ways: geometry.ways(),
            sets: geometry.sets(),
            block_size: geometry.block_size(),
            address_width: geometry.address_width(),
            read_ops: counters.read_ops,
            write_ops: counters.write_ops,
            read_misses: counters.read_misses,
            write_misses: counters.write_misses,
            total_miss_rate,
            write_miss_rate: ratio(counters.write_misses, counters.write_ops),
            read_miss_rate: ratio(counters.read_misses, counters.read_ops),
            trace_id: trace_id.into(),
            elapsed,
        })
    }

    /// Total operations in the run.
    pub const fn total_ops(&self) -> u64 {
        self.read_ops + self.write_ops
    }

    /// Hits, derived from operations minus misses.
    pub const fn hits(&self) -> u64 {
        self.total_ops() - self.read_misses - self.write_misses
    }

    /// Compares everything except wall time.
    pub fn same_outcome(&self, other: &Self) -> bool {
        Self {
            elapsed: Duration::ZERO,
            ..self.clone()
        } == Self {
            elapsed: Duration::ZERO,
            ..other.clone()
        }
    }
}

fn write_rate(f: &mut fmt::Formatter<'_>, label: &str, rate: Option<f64>) -> fmt::Result {
    match rate {
        Some(r) => writeln!(f, "{label:<25}{:.4} ({:.2}%)", r, r * 100.0),
        None => writeln!(f, "{label:<25}n/a"),
    }
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "CACHE SIMULATION: {}", self.trace_id)?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "{:<25}{} B", "cache.size", self.cache_size_bytes)?;
        writeln!(f, "{:<25}{}", "cache.ways", self.ways)?;
        writeln!(f, "{:<25}{}", "cache.sets", self.sets)?;
        writeln!(f, "{:<25}{} B", "cache.block", self.block_size)?;
        writeln!(f, "{:<25}{} bits", "cache.address_width", self.address_width)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "{:<25}{}", "ops.read", self.read_ops)?;
        writeln!(f, "{:<25}{}", "ops.write", self.write_ops)?;
        writeln!(f, "{:<25}{}", "misses.read", self.read_misses)?;
        writeln!(f, "{:<25}{}", "misses.write", self.write_misses)?;
        write_rate(f, "miss_rate.total", Some(self.total_miss_rate))?;
        write_rate(f, "miss_rate.read", self.read_miss_rate)?;
        write_rate(f, "miss_rate.write", self.write_miss_rate)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "{:<25}{:.4} s", "host_seconds", self.elapsed.as_secs_f64())
    }
}

/// Errors raised while delivering a summary to a sink.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing to the destination failed.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),

    /// The summary could not be encoded.
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Consumer of finished result summaries.
pub trait ReportSink {
    /// Delivers one summary.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if the destination cannot be written.
    fn report(&mut self, summary: &ResultSummary) -> Result<(), ReportError>;
}

/// Pretty-prints summaries to a writer (stdout by default).
#[derive(Debug)]
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl ConsoleSink<io::Stdout> {
    /// A sink writing to standard output.
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleSink<W> {
    /// A sink writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn report(&mut self, summary: &ResultSummary) -> Result<(), ReportError> {
        write!(self.out, "{summary}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Appends each summary as one JSON object per line.
///
/// The file is opened in append mode for every report and created if missing,
/// so several runs (or processes) accumulate into a single log.
#[derive(Debug, Clone)]
pub struct JsonLogSink {
    path: PathBuf,
}

impl JsonLogSink {
    /// A sink appending to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Log file this sink appends to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for JsonLogSink {
    fn report(&mut self, summary: &ResultSummary) -> Result<(), ReportError> {
        let mut line = serde_json::to_string(summary)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        debug!(path = %self.path.display(), trace = %summary.trace_id, "appended result");
        Ok(())
    }
}
