//! Simulation error definitions.
//!
//! This module defines the failures the cache core reports to its callers:
//! 1. **Construction:** A geometry that cannot decode any address.
//! 2. **Per-Access:** An address wider than the configured address width.
//! 3. **Per-Run:** A simulation over an empty trace, where no miss rate exists.
//!
//! None of these are recovered from inside the core; the caller decides whether
//! to reject the trace line or abort the run.

use thiserror::Error;

/// Errors raised by the cache model and simulator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    /// The geometry is inconsistent (zero ways, non-power-of-two sets or block
    /// size, or more index/offset bits than the address has).
    #[error("invalid cache geometry: {0}")]
    InvalidGeometry(String),

    /// The address is malformed or needs more than `width` bits.
    #[error("invalid address {address:?} for a {width}-bit address space")]
    InvalidAddress {
        /// The offending address as hex text.
        address: String,
        /// The address width it was checked against.
        width: u32,
    },

    /// `simulate` was called with no operations, so no miss rate is defined.
    #[error("trace contains no operations")]
    EmptyTrace,
}
