//! Address decoding.
//!
//! This module splits raw addresses into the fields a set-associative cache uses.
//! It provides the following:
//! 1. **Text Boundary:** Parsing of bare hexadecimal address strings from traces.
//! 2. **Decoding:** Extraction of tag, index, and offset for a given geometry.
//! 3. **Reassembly:** The inverse mapping, used to check that decoding is lossless.

use super::error::SimError;
use super::geometry::{CacheGeometry, low_mask};

/// An address split into its cache fields, most-significant field first.
///
/// Derived per access and never stored by the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecodedAddress {
    /// Block identity within a set (`tag_bits` wide).
    pub tag: u64,
    /// Set selector, always `< sets`.
    pub index: u64,
    /// Byte position inside the block. Decoded but unused by the model.
    pub offset: u64,
}

impl DecodedAddress {
    /// Rebuilds the raw address from its fields.
    ///
    /// # Arguments
    ///
    /// * `geometry` - The geometry this address was decoded with.
    ///
    /// # Returns
    ///
    /// The raw address `tag ‖ index ‖ offset`.
    pub fn reassemble(&self, geometry: &CacheGeometry) -> u64 {
        let low_bits = geometry.index_bits() + geometry.offset_bits();
        let tag_part = if low_bits >= 64 { 0 } else { self.tag << low_bits };
        tag_part | (self.index << geometry.offset_bits()) | self.offset
    }

    /// Renders the address as a bit string zero-padded to `address_width`,
    /// with the tag, index, and offset fields concatenated in that order.
    pub fn bit_string(&self, geometry: &CacheGeometry) -> String {
        let mut bits = String::with_capacity(geometry.address_width() as usize);
        push_bits(&mut bits, self.tag, geometry.tag_bits());
        push_bits(&mut bits, self.index, geometry.index_bits());
        push_bits(&mut bits, self.offset, geometry.offset_bits());
        bits
    }
}

fn push_bits(out: &mut String, value: u64, width: u32) {
    for bit in (0..width).rev() {
        out.push(if (value >> bit) & 1 == 1 { '1' } else { '0' });
    }
}

/// Decodes a raw address against a cache geometry.
///
/// # Arguments
///
/// * `geometry` - The cache geometry supplying the field widths.
/// * `raw` - The raw address value.
///
/// # Returns
///
/// The tag, index, and offset fields of `raw`.
///
/// # Errors
///
/// Returns [`SimError::InvalidAddress`] if `raw` needs more than
/// `address_width` bits.
#[inline]
pub fn decode(geometry: &CacheGeometry, raw: u64) -> Result<DecodedAddress, SimError> {
    if raw > geometry.max_address() {
        return Err(SimError::InvalidAddress {
            address: format!("{raw:x}"),
            width: geometry.address_width(),
        });
    }

    let offset_bits = geometry.offset_bits();
    let low_bits = offset_bits + geometry.index_bits();

    let offset = raw & low_mask(offset_bits);
    let index = if offset_bits >= 64 {
        0
    } else {
        (raw >> offset_bits) & low_mask(geometry.index_bits())
    };
    let tag = if low_bits >= 64 { 0 } else { raw >> low_bits };

    Ok(DecodedAddress { tag, index, offset })
}

/// Parses a bare hexadecimal address as it appears in a trace.
///
/// Accepts upper- or lower-case digits with no `0x` prefix and no sign.
/// Leading zeros are allowed.
///
/// # Errors
///
/// Returns [`SimError::InvalidAddress`] for empty input, non-hex characters,
/// or values that do not fit in 64 bits. `width` is reported as 64 here since
/// no geometry is involved yet.
pub fn parse_hex_address(text: &str) -> Result<u64, SimError> {
    let invalid = || SimError::InvalidAddress {
        address: text.to_owned(),
        width: super::geometry::MAX_ADDRESS_WIDTH,
    };

    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u64::from_str_radix(text, 16).map_err(|_| invalid())
}

/// Parses a hexadecimal address and decodes it in one step.
///
/// # Errors
///
/// Returns [`SimError::InvalidAddress`] if the text is not a valid address or
/// if the value is too wide for `geometry`. The error carries the original text.
pub fn decode_hex(geometry: &CacheGeometry, text: &str) -> Result<DecodedAddress, SimError> {
    let raw = parse_hex_address(text)?;
    decode(geometry, raw).map_err(|_| SimError::InvalidAddress {
        address: text.to_owned(),
        width: geometry.address_width(),
    })
}
