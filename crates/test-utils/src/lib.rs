//! Shared test utilities for the tile-display workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Tile generators with predictable cell values
//! - PNG inspection helpers for rendered output
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{gradient_tile, decode_png};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
