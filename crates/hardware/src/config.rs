//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to parameterize runs.
//! It provides:
//! 1. **Defaults:** Baseline cache shape and reporting settings.
//! 2. **Structures:** General settings plus one or more cache configurations.
//! 3. **Validation:** Conversion of raw cache settings into a [`CacheGeometry`].
//!
//! Configuration is supplied as JSON (see [`Config::from_json`]) or built with
//! `Config::default()` and command-line overrides.

use serde::Deserialize;

use crate::common::{CacheGeometry, SimError};

/// Default configuration constants for the simulator.
mod defaults {
    /// Default associativity (1 way = direct-mapped).
    pub const CACHE_WAYS: usize = 1;

    /// Default number of sets.
    pub const CACHE_SETS: usize = 64;

    /// Default block size in bytes (64 bytes).
    ///
    /// Matches typical modern processor cache line sizes.
    pub const CACHE_BLOCK: usize = 64;

    /// Default address width in bits.
    ///
    /// Trace addresses are 48-bit user-space virtual addresses.
    pub const ADDRESS_WIDTH: u32 = 48;
}

/// Shape of one simulated cache, as written in a config file.
///
/// Unvalidated; call [`CacheConfig::geometry`] before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Associativity (blocks per set).
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Number of sets (power of two).
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,

    /// Block size in bytes (power of two).
    #[serde(default = "CacheConfig::default_block_size")]
    pub block_size: usize,

    /// Raw address width in bits.
    #[serde(default = "CacheConfig::default_address_width")]
    pub address_width: u32,
}

impl CacheConfig {
    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    fn default_sets() -> usize {
        defaults::CACHE_SETS
    }

    fn default_block_size() -> usize {
        defaults::CACHE_BLOCK
    }

    fn default_address_width() -> u32 {
        defaults::ADDRESS_WIDTH
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidGeometry`] if the fields cannot form a cache.
    pub fn geometry(&self) -> Result<CacheGeometry, SimError> {
        CacheGeometry::new(self.ways, self.sets, self.block_size, self.address_width)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ways: defaults::CACHE_WAYS,
            sets: defaults::CACHE_SETS,
            block_size: defaults::CACHE_BLOCK,
            address_width: defaults::ADDRESS_WIDTH,
        }
    }
}

/// General run settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// Path of a JSON-lines file each result summary is appended to.
    #[serde(default)]
    pub log_file: Option<String>,

    /// Print a human-readable summary to stdout after each run.
    #[serde(default = "GeneralConfig::default_print_summary")]
    pub print_summary: bool,
}

impl GeneralConfig {
    fn default_print_summary() -> bool {
        true
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            print_summary: Self::default_print_summary(),
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::Config;
///
/// let json = r#"{
///     "general": { "log_file": "results.jsonl" },
///     "caches": [
///         { "ways": 2, "sets": 256 },
///         { "ways": 8, "sets": 64, "block_size": 32, "address_width": 32 }
///     ]
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.caches.len(), 2);
/// assert_eq!(config.caches[0].block_size, 64);
/// assert_eq!(config.caches[1].address_width, 32);
/// assert!(config.general.print_summary);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Caches to simulate. A single `run` uses the first entry.
    #[serde(default = "Config::default_caches")]
    pub caches: Vec<CacheConfig>,
}

impl Config {
    fn default_caches() -> Vec<CacheConfig> {
        vec![CacheConfig::default()]
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validates every configured cache.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimError::InvalidGeometry`] encountered.
    pub fn geometries(&self) -> Result<Vec<CacheGeometry>, SimError> {
        self.caches.iter().map(CacheConfig::geometry).collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            caches: Self::default_caches(),
        }
    }
}
