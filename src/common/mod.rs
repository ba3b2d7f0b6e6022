//! Common types and utilities shared across the crate.
//!
//! This module provides the unified error type presented by the batch layer
//! and the length-unit helpers used when placing pictures on slides.

// Submodule declarations
pub mod error;
pub mod unit;

// Re-exports for convenience
pub use error::{Error, ErrorKind, Result};
