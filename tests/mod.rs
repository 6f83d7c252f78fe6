//! Integration tests for boxoffice
//!
//! Tests are organized by component:
//! - omdb_test: OMDB lookups (title/id, payload-driven failures, transport errors)
//! - tmdb_test: TMDB lookups (search-then-details, normalization, stage errors)
//! - batch_test: Sequential batch dispatch and ordering

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
