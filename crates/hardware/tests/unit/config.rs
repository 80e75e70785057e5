//! # Configuration Tests
//!
//! Defaults, JSON deserialization, and geometry validation.

use cachesim_core::SimError;
use cachesim_core::config::{CacheConfig, Config, GeneralConfig};
use pretty_assertions::assert_eq;

#[test]
fn default_config_has_one_direct_mapped_cache() {
    let config = Config::default();
    assert_eq!(config.caches, vec![CacheConfig::default()]);
    assert_eq!(config.general, GeneralConfig::default());
    assert!(config.general.print_summary);
    assert_eq!(config.general.log_file, None);

    let c = config.caches[0];
    assert_eq!((c.ways, c.sets, c.block_size, c.address_width), (1, 64, 64, 48));
}

#[test]
fn empty_document_uses_defaults() {
    assert_eq!(Config::from_json("{}").unwrap(), Config::default());
}

#[test]
fn missing_cache_fields_take_defaults() {
    let config = Config::from_json(r#"{ "caches": [ { "ways": 4 } ] }"#).unwrap();
    assert_eq!(
        config.caches,
        vec![CacheConfig {
            ways: 4,
            ..CacheConfig::default()
        }]
    );
}

#[test]
fn general_section_is_read() {
    let json = r#"{ "general": { "log_file": "out.jsonl", "print_summary": false } }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(config.general.log_file.as_deref(), Some("out.jsonl"));
    assert!(!config.general.print_summary);
}

#[test]
fn explicit_empty_cache_list_is_kept() {
    let config = Config::from_json(r#"{ "caches": [] }"#).unwrap();
    assert!(config.caches.is_empty());
    assert!(config.geometries().unwrap().is_empty());
}

#[test]
fn geometries_validates_every_entry() {
    let json = r#"{ "caches": [ { "sets": 64 }, { "sets": 48 } ] }"#;
    let config = Config::from_json(json).unwrap();
    assert!(matches!(
        config.geometries(),
        Err(SimError::InvalidGeometry(_))
    ));
}

#[test]
fn geometries_in_order() {
    let json = r#"{ "caches": [ { "ways": 2 }, { "ways": 8, "block_size": 32 } ] }"#;
    let geometries = Config::from_json(json).unwrap().geometries().unwrap();
    assert_eq!(geometries.len(), 2);
    assert_eq!(geometries[0].ways(), 2);
    assert_eq!(
        (geometries[1].ways(), geometries[1].block_size()),
        (8, 32)
    );
}

#[test]
fn malformed_json_is_rejected() {
    assert!(Config::from_json("{ caches: ").is_err());
    assert!(Config::from_json(r#"{ "caches": [ { "ways": "two" } ] }"#).is_err());
}
