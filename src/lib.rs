//! Photodeck - batch builder for personalized photo slide decks
//!
//! Photodeck takes a set of shared photos plus one personal photo per
//! recipient, normalizes every photo to a fixed resolution, assembles a base
//! PowerPoint deck with one full-bleed slide per shared photo, and derives
//! one deck per recipient with that recipient's photo appended.
//!
//! # Features
//!
//! - **Batch pipeline** (`batch`): folder provisioning, image normalization,
//!   base deck construction, recipient derivation, orchestration
//! - **PPTX writer and reader** (`ooxml::pptx`): create decks from a built-in
//!   template, append picture slides, read slides and pictures back
//! - **OPC packaging** (`ooxml::opc`): parts, relationships, content types,
//!   ZIP reading and writing
//!
//! # Example - Running a batch
//!
//! ```no_run
//! use photodeck::batch::{Config, run};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load("photodeck.yaml")?;
//! let report = run(&config)?;
//! for deck in &report.decks {
//!     println!("wrote {}", deck.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Working with a deck directly
//!
//! ```no_run
//! use photodeck::ooxml::pptx::Package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut deck = Package::open("base.pptx")?;
//! let photo = std::fs::read("Personal_photos/Jack.jpg")?;
//! deck.add_picture_slide(&photo, "Jack.jpg", 0, 0)?;
//! deck.save("Jack.pptx")?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod common;
pub mod ooxml;

pub use batch::{BatchReport, Config};
pub use common::{Error, ErrorKind, Result};
