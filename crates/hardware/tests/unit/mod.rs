//! # Unit Components
//!
//! Tests grouped by simulator component, leaves first.


/// Unit tests for the LRU set store and the cache model.
pub mod cache;

/// Unit tests for configuration defaults, deserialization, and validation.
pub mod config;
