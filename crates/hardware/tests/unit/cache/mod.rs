//! Unit tests for the cache.
