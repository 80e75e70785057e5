//! Cache geometry.
//!
//! This module defines the immutable shape of a simulated cache. It provides:
//! 1. **Validation:** Rejects associativities, set counts, block sizes, and address
//!    widths that cannot decode an address.
//! 2. **Derived Fields:** Index, offset, and tag bit widths, plus total capacity.

use super::error::SimError;

/// Widest raw address the decoder supports, in bits.
pub const MAX_ADDRESS_WIDTH: u32 = 64;

/// Validated geometry of a set-associative cache.
///
/// Construct with [`CacheGeometry::new`]; every instance satisfies
/// `tag_bits() + index_bits() + offset_bits() == address_width()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheGeometry {
    ways: usize,
    sets: usize,
    block_size: usize,
    address_width: u32,
    size_bytes: usize,
    index_bits: u32,
    offset_bits: u32,
}

impl CacheGeometry {
    /// Creates a geometry after validating every field.
    ///
    /// # Arguments
    ///
    /// * `ways` - Associativity (blocks per set), at least 1.
    /// * `sets` - Number of sets, a power of two.
    /// * `block_size` - Bytes per block, a power of two.
    /// * `address_width` - Bits in a raw address, `1..=64`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidGeometry`] if any field is out of range or if
    /// the index and offset fields together need more bits than the address has,
    /// or if the total capacity does not fit in a `usize`.
    pub fn new(
        ways: usize,
        sets: usize,
        block_size: usize,
        address_width: u32,
    ) -> Result<Self, SimError> {
        if ways == 0 {
            return Err(SimError::InvalidGeometry(
                "associativity must be at least 1".into(),
            ));
        }
        if !sets.is_power_of_two() {
            return Err(SimError::InvalidGeometry(format!(
                "set count {sets} is not a power of two"
            )));
        }
        if !block_size.is_power_of_two() {
            return Err(SimError::InvalidGeometry(format!(
                "block size {block_size} is not a power of two"
            )));
        }
        if address_width == 0 || address_width > MAX_ADDRESS_WIDTH {
            return Err(SimError::InvalidGeometry(format!(
                "address width {address_width} is outside 1..={MAX_ADDRESS_WIDTH}"
            )));
        }

        let index_bits = sets.trailing_zeros();
        let offset_bits = block_size.trailing_zeros();
        if index_bits + offset_bits > address_width {
            return Err(SimError::InvalidGeometry(format!(
                "{index_bits} index bits + {offset_bits} offset bits exceed a \
                 {address_width}-bit address"
            )));
        }

        let size_bytes = sets
            .checked_mul(ways)
            .and_then(|n| n.checked_mul(block_size))
            .ok_or_else(|| {
                SimError::InvalidGeometry(format!(
                    "{sets} sets x {ways} ways x {block_size} B blocks overflows the capacity"
                ))
            })?;

        Ok(Self {
            ways,
            sets,
            block_size,
            address_width,
            size_bytes,
            index_bits,
            offset_bits,
        })
    }

    /// Associativity (blocks per set).
    #[inline]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Number of sets.
    #[inline]
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Bytes per block.
    #[inline]
    pub const fn block_size(&self) -> usize {
        self.block_size
    }

    /// Bits in a raw address.
    #[inline]
    pub const fn address_width(&self) -> u32 {
        self.address_width
    }

    /// `log2(sets)`.
    #[inline]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// `log2(block_size)`.
    #[inline]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Bits left for the tag once index and offset are taken.
    #[inline]
    pub const fn tag_bits(&self) -> u32 {
        self.address_width - self.index_bits - self.offset_bits
    }

    /// Total data capacity in bytes (`sets * ways * block_size`).
    #[inline]
    pub const fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Largest raw address representable in `address_width` bits.
    #[inline]
    pub const fn max_address(&self) -> u64 {
        low_mask(self.address_width)
    }
}

impl std::fmt::Display for CacheGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} B, {}-way, {} sets, {} B blocks, {}-bit addresses",
            self.size_bytes(),
            self.ways,
            self.sets,
            self.block_size,
            self.address_width
        )
    }
}

/// Mask with the low `bits` bits set. `bits` may be 0 or 64.
#[inline]
pub(crate) const fn low_mask(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}
