//! Office Open XML (OOXML) format implementation.
//!
//! This module provides the subset of Office Open XML needed to create
//! PowerPoint (.pptx) decks, append picture slides and read them back.
//!
//! The implementation is based on the Open Packaging Conventions (OPC) and
//! follows the structure of the python-pptx library, adapted for Rust.
//!
//! # Architecture
//!
//! 1. **OPC Layer** (`opc`): Low-level package handling (ZIP, parts, relationships)
//! 2. **Errors** (`error`): Error type shared by the format modules
//! 3. **Format-Specific Modules**:
//!    - `pptx`: PowerPoint presentations
//!
//! # Example
//!
//! ```rust,no_run
//! use photodeck::ooxml::pptx::Package;
//!
//! let pkg = Package::open("base.pptx")?;
//! let pres = pkg.presentation()?;
//! println!("Deck has {} slides", pres.slide_count()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod error;
pub mod opc;
pub mod pptx;

// Re-export commonly used types from OPC layer
pub use opc::{OpcPackage, PackURI};

// Re-export error types
pub use error::{OoxmlError, Result};
