//! Batch production of personalized photo decks.
//!
//! The pipeline runs strictly in order:
//!
//! 1. [`folder`]: provision the output folder
//! 2. [`normalize`]: resize every photo in place to the target resolution
//! 3. [`base`]: build the base deck from the shared photos
//! 4. [`recipient`]: derive one deck per recipient from the saved base
//!
//! [`orchestrator::run`] drives all four from a [`Config`].
//!
//! # Example
//!
//! ```rust,no_run
//! use photodeck::batch::{Config, run};
//!
//! let config = Config::load("photodeck.yaml")?;
//! let report = run(&config)?;
//! println!("{} decks in {}", report.decks.len(), report.output_dir.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod base;
pub mod config;
pub mod folder;
pub mod normalize;
pub mod orchestrator;
pub mod recipient;

pub use base::build_base_deck;
pub use config::{Canvas, Config};
pub use folder::{ExistingFolder, ensure_output_folder};
pub use normalize::{Resolution, normalize};
pub use orchestrator::{BatchReport, build, derive, run};
pub use recipient::{DeckLayout, derive_for_recipient};
