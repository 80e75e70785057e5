//! # Geometry Tests
//!
//! Validation of cache shapes and the derived bit widths.

use cachesim_core::common::{CacheGeometry, SimError};
use rstest::rstest;

#[rstest]
#[case::direct_mapped(1, 64, 64, 48, 6, 6, 36)]
#[case::four_way(4, 256, 64, 48, 8, 6, 34)]
#[case::tag_only(2, 1, 1, 8, 0, 0, 8)]
#[case::full_64_bit(8, 1024, 32, 64, 10, 5, 49)]
#[case::no_tag(1, 16, 16, 8, 4, 4, 0)]
fn derived_bit_widths(
    #[case] ways: usize,
    #[case] sets: usize,
    #[case] block: usize,
    #[case] width: u32,
    #[case] index_bits: u32,
    #[case] offset_bits: u32,
    #[case] tag_bits: u32,
) {
    let g = CacheGeometry::new(ways, sets, block, width).unwrap();
    assert_eq!(g.index_bits(), index_bits);
    assert_eq!(g.offset_bits(), offset_bits);
    assert_eq!(g.tag_bits(), tag_bits);
    assert_eq!(g.tag_bits() + g.index_bits() + g.offset_bits(), width);
}

#[test]
fn size_is_sets_times_ways_times_block() {
    let g = CacheGeometry::new(4, 256, 64, 48).unwrap();
    assert_eq!(g.size_bytes(), 256 * 4 * 64);
}

#[test]
fn largest_representable_size_is_accepted() {
    let g = CacheGeometry::new(1 << 40, 1 << 10, 1 << 10, 48).unwrap();
    assert_eq!(g.size_bytes(), 1 << 60);
}

#[test]
fn max_address_matches_width() {
    assert_eq!(CacheGeometry::new(1, 1, 1, 8).unwrap().max_address(), 0xFF);
    assert_eq!(
        CacheGeometry::new(1, 1, 1, 48).unwrap().max_address(),
        0xFFFF_FFFF_FFFF
    );
    assert_eq!(CacheGeometry::new(1, 1, 1, 64).unwrap().max_address(), u64::MAX);
}

#[rstest]
#[case::zero_ways(0, 64, 64, 48)]
#[case::zero_sets(1, 0, 64, 48)]
#[case::sets_not_power_of_two(1, 48, 64, 48)]
#[case::zero_block(1, 64, 0, 48)]
#[case::block_not_power_of_two(1, 64, 24, 48)]
#[case::zero_width(1, 1, 1, 0)]
#[case::width_over_64(1, 1, 1, 65)]
#[case::negative_tag_bits(1, 256, 256, 12)]
#[case::size_overflows(1 << 40, 1 << 20, 1 << 10, 48)]
#[case::ways_overflow_size(1 << 62, 4, 1, 48)]
fn rejects_invalid_geometry(
    #[case] ways: usize,
    #[case] sets: usize,
    #[case] block: usize,
    #[case] width: u32,
) {
    let err = CacheGeometry::new(ways, sets, block, width).unwrap_err();
    assert!(matches!(err, SimError::InvalidGeometry(_)), "got {err:?}");
}

#[test]
fn display_mentions_every_field() {
    let g = CacheGeometry::new(2, 128, 32, 48).unwrap();
    let text = g.to_string();
    assert!(text.contains("8192 B"));
    assert!(text.contains("2-way"));
    assert!(text.contains("128 sets"));
    assert!(text.contains("32 B blocks"));
    assert!(text.contains("48-bit"));
}
