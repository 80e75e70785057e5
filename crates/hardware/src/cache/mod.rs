//! Set-Associative Cache Model.
//!
//! This module implements a trace-driven set-associative cache with LRU
//! replacement. It models hits and misses only: there are no dirty bits, no
//! write policy, and no next level. Recency is tracked with a logical clock
//! that advances once per access.

/// LRU set storage.
pub mod lru;

use tracing::trace;

use self::lru::SetStore;
use crate::common::{AccessType, CacheGeometry, SimError, decode, parse_hex_address};

/// Outcome of a single cache access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessOutcome {
    /// The block was resident.
    Hit,
    /// The block was not resident and has been installed.
    Miss,
}

impl AccessOutcome {
    /// Returns `true` for [`AccessOutcome::Hit`].
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

impl std::fmt::Display for AccessOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => f.write_str("Hit"),
            Self::Miss => f.write_str("Miss"),
        }
    }
}

/// Operation and miss counters of a cache run.
///
/// Hits are not stored; they are derived from ops minus misses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// Read operations performed.
    pub read_ops: u64,
    /// Write operations performed.
    pub write_ops: u64,
    /// Reads that missed.
    pub read_misses: u64,
    /// Writes that missed.
    pub write_misses: u64,
}

impl CacheCounters {
    /// Total operations.
    pub const fn total_ops(&self) -> u64 {
        self.read_ops + self.write_ops
    }

    /// Total misses.
    pub const fn total_misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    /// Reads that hit.
    pub const fn read_hits(&self) -> u64 {
        self.read_ops - self.read_misses
    }

    /// Writes that hit.
    pub const fn write_hits(&self) -> u64 {
        self.write_ops - self.write_misses
    }

    fn record(&mut self, op: AccessType, outcome: AccessOutcome) {
        let miss = u64::from(outcome == AccessOutcome::Miss);
        match op {
            AccessType::Read => {
                self.read_ops += 1;
                self.read_misses += miss;
            }
            AccessType::Write => {
                self.write_ops += 1;
                self.write_misses += miss;
            }
        }
    }
}

/// A set-associative LRU cache driven one access at a time.
///
/// Not meant to be shared between concurrent runs; build one model per
/// geometry when exploring configurations in parallel.
#[derive(Clone, Debug)]
pub struct CacheModel {
    geometry: CacheGeometry,
    sets: SetStore,
    counters: CacheCounters,
    clock: u64,
}

impl CacheModel {
    /// Creates a cold cache with the given geometry.
    pub fn new(geometry: CacheGeometry) -> Self {
        Self {
            geometry,
            sets: SetStore::new(geometry.ways()),
            counters: CacheCounters::default(),
            clock: 0,
        }
    }

    /// The geometry this cache was built with.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Counters accumulated since the last reset.
    pub const fn counters(&self) -> &CacheCounters {
        &self.counters
    }

    /// Current logical time (number of accesses since the last reset).
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    /// Read-only view of the resident sets.
    pub const fn sets(&self) -> &SetStore {
        &self.sets
    }

    /// Performs one access.
    ///
    /// The address is decoded first; a decode failure leaves the cache,
    /// counters, and clock untouched.
    ///
    /// # Arguments
    ///
    /// * `op` - Read or write. Both are handled identically apart from counting.
    /// * `address` - Raw address, at most `address_width` bits wide.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidAddress`] if `address` is too wide.
    pub fn access(&mut self, op: AccessType, address: u64) -> Result<AccessOutcome, SimError> {
        let decoded = decode(&self.geometry, address)?;
        let now = self.clock;
        self.clock += 1;

        let outcome = if self.sets.lookup(decoded.index, decoded.tag, now) {
            AccessOutcome::Hit
        } else {
            if let Some(victim) = self.sets.insert(decoded.index, decoded.tag, now) {
                trace!(
                    index = decoded.index,
                    victim = format_args!("{victim:#x}"),
                    tag = format_args!("{:#x}", decoded.tag),
                    "evict"
                );
            }
            AccessOutcome::Miss
        };

        self.counters.record(op, outcome);
        trace!(%op, address = format_args!("{address:#x}"), %outcome, "access");
        Ok(outcome)
    }

    /// Performs one access on a bare hexadecimal address.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidAddress`] if the text is not hex or is too wide.
    pub fn access_hex(&mut self, op: AccessType, address: &str) -> Result<AccessOutcome, SimError> {
        let raw = parse_hex_address(address)?;
        self.access(op, raw).map_err(|_| SimError::InvalidAddress {
            address: address.to_owned(),
            width: self.geometry.address_width(),
        })
    }

    /// Returns the cache to its cold state: no resident blocks, zero counters,
    /// clock at zero.
    pub fn reset(&mut self) {
        self.sets.clear();
        self.counters = CacheCounters::default();
        self.clock = 0;
    }
}
