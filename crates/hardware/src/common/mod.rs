//! Common types shared across the cache simulator.
//!
//! This module provides the building blocks every other component depends on:
//! 1. **Geometry:** Validated cache shape and derived bit widths.
//! 2. **Addresses:** Hex parsing and tag/index/offset decoding.
//! 3. **Memory Access:** Read/write classification of trace operations.
//! 4. **Error Handling:** The simulator error taxonomy.

/// Address parsing and decoding.
pub mod addr;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

/// Cache geometry.
pub mod geometry;

pub use addr::{DecodedAddress, decode, decode_hex, parse_hex_address};
pub use data::{AccessType, ParseAccessTypeError};
pub use error::SimError;
pub use geometry::{CacheGeometry, MAX_ADDRESS_WIDTH};
