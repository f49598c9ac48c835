//! Chain Layer Tests
//!
//! These tests validate:
//! - Priority routing and aggregation across a resolution chain
//! - Keyed lookups and capability probing
//! - Child scopes of a chain and their release
//! - Overlay scope construction and cleanup on failure
//! - Linked scope release ordering and post-release behaviour

mod resolution_tests;
