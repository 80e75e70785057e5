//! # Address Decode Tests
//!
//! Verifies tag/index/offset extraction, the width check, hex parsing at the
//! trace boundary, and that decoding is lossless for every valid geometry.

use cachesim_core::common::{
    CacheGeometry, SimError, decode, decode_hex, parse_hex_address,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::harness::geometry;

#[test]
fn splits_fields_msb_first() {
    // 64 sets, 64-byte blocks, 48-bit addresses: 36 tag | 6 index | 6 offset.
    let g = geometry(1, 64, 64, 48);
    let d = decode(&g, 0x7f58_8cd8_eb58).unwrap();

    assert_eq!(d.offset, 0x7f58_8cd8_eb58 & 0x3F);
    assert_eq!(d.index, (0x7f58_8cd8_eb58 >> 6) & 0x3F);
    assert_eq!(d.tag, 0x7f58_8cd8_eb58 >> 12);
}

#[test]
fn whole_address_is_tag_without_index_or_offset() {
    let g = geometry(2, 1, 1, 8);
    let d = decode(&g, 0xA5).unwrap();
    assert_eq!((d.tag, d.index, d.offset), (0xA5, 0, 0));
}

#[test]
fn no_tag_bits_leaves_tag_zero() {
    let g = geometry(1, 16, 16, 8);
    let d = decode(&g, 0xAB).unwrap();
    assert_eq!((d.tag, d.index, d.offset), (0, 0xA, 0xB));
}

#[test]
fn index_is_always_below_set_count() {
    let g = geometry(4, 32, 16, 20);
    for raw in (0..=g.max_address()).step_by(997) {
        assert!(decode(&g, raw).unwrap().index < 32);
    }
}

#[test]
fn accepts_the_widest_address() {
    let g = geometry(1, 1, 1, 8);
    assert!(decode(&g, 0xFF).is_ok());
}

#[test]
fn rejects_address_wider_than_width() {
    let g = geometry(1, 1, 1, 8);
    let err = decode(&g, 0x100).unwrap_err();
    assert_eq!(
        err,
        SimError::InvalidAddress {
            address: "100".into(),
            width: 8
        }
    );
}

#[test]
fn full_width_geometry_decodes_u64_max() {
    let g = geometry(1, 1024, 64, 64);
    let d = decode(&g, u64::MAX).unwrap();
    assert_eq!(d.reassemble(&g), u64::MAX);
}

#[test]
fn bit_string_is_zero_padded() {
    let g = geometry(1, 4, 2, 8);
    let d = decode(&g, 0b0000_0110).unwrap();
    assert_eq!(d.bit_string(&g), "00000110");
    assert_eq!((d.tag, d.index, d.offset), (0, 0b11, 0));
}

#[test]
fn parse_hex_accepts_mixed_case_and_leading_zeros() {
    assert_eq!(parse_hex_address("7f588cd8eb58").unwrap(), 0x7f58_8cd8_eb58);
    assert_eq!(parse_hex_address("7F588CD8EB58").unwrap(), 0x7f58_8cd8_eb58);
    assert_eq!(parse_hex_address("0000000000000000001").unwrap(), 1);
}

#[test]
fn parse_hex_rejects_malformed_text() {
    for text in ["", "0x10", "+10", "-1", "12g4", " 10", "1_000", "1ffffffffffffffff"] {
        assert!(
            matches!(parse_hex_address(text), Err(SimError::InvalidAddress { .. })),
            "{text:?} should be rejected"
        );
    }
}

#[test]
fn decode_hex_reports_original_text() {
    let g = geometry(1, 1, 1, 8);
    let err = decode_hex(&g, "0100").unwrap_err();
    assert_eq!(
        err,
        SimError::InvalidAddress {
            address: "0100".into(),
            width: 8
        }
    );
    assert_eq!(decode_hex(&g, "00ff").unwrap().tag, 0xFF);
}

/// Valid geometries with their address width.
fn any_geometry() -> impl Strategy<Value = CacheGeometry> {
    (1u32..=64)
        .prop_flat_map(|width| {
            (0..=width.min(20)).prop_flat_map(move |index_bits| {
                let max_offset = (width - index_bits).min(12);
                (Just(width), Just(index_bits), 0..=max_offset, 1usize..=16)
            })
        })
        .prop_map(|(width, index_bits, offset_bits, ways)| {
            CacheGeometry::new(ways, 1 << index_bits, 1 << offset_bits, width).unwrap()
        })
}

proptest! {
    #[test]
    fn decode_round_trips(g in any_geometry(), seed in any::<u64>()) {
        let raw = seed & g.max_address();
        let d = decode(&g, raw).unwrap();

        prop_assert_eq!(d.reassemble(&g), raw);
        let expected = format!("{:0width$b}", raw, width = g.address_width() as usize);
        prop_assert_eq!(d.bit_string(&g), expected);
    }

    #[test]
    fn decode_is_deterministic(g in any_geometry(), seed in any::<u64>()) {
        let raw = seed & g.max_address();
        prop_assert_eq!(decode(&g, raw).unwrap(), decode(&g, raw).unwrap());
    }

    #[test]
    fn too_wide_addresses_fail(width in 1u32..64, excess in 1u64..1024) {
        let g = CacheGeometry::new(1, 1, 1, width).unwrap();
        let raw = g.max_address().saturating_add(excess);
        prop_assert!(
            matches!(decode(&g, raw), Err(SimError::InvalidAddress { .. })),
            "expected InvalidAddress"
        );
    }
}
