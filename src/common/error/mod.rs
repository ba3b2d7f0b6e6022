//! Unified error types for photodeck.
//!
//! This module provides a unified error type that encompasses asset, image
//! and package errors, presenting a consistent API to the batch layer and CLI.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, ErrorKind, Result};
