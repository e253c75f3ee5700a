//! Shared test utilities for docushuttle integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs against an in-memory mail store and a
//!   temp-dir database
//! - Builders for run settings and sent messages

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
