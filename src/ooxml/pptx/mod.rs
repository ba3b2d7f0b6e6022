//! PowerPoint (.pptx) presentation support.
//!
//! This module creates decks from a built-in template, appends full-bleed
//! picture slides on the blank layout and reads slides back, in the Office
//! Open XML (OOXML) format (.pptx files).
//!
//! - `Package`: The overall .pptx file package
//! - `Presentation`: Read view over the slides, in presentation order
//! - `parts`: Views over individual XML parts (presentation, slide, layout)
//! - `writer`: XML generation for new slides and presentation.xml edits
//!
//! # Example
//!
//! ```rust,no_run
//! use photodeck::ooxml::pptx::Package;
//!
//! let mut package = Package::open("base.pptx")?;
//! let photo = std::fs::read("Personal_photos/Alice.jpg")?;
//! package.add_picture_slide(&photo, "Alice.jpg", 0, 0)?;
//! package.save("Alice.pptx")?;
//!
//! for slide in package.presentation()?.slides()? {
//!     println!("{} ({:?})", slide.partname, slide.layout_name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod format;
pub mod package;
pub mod parts;
pub mod presentation;
pub mod template;
pub mod writer;

pub use format::ImageFormat;
pub use package::Package;
pub use presentation::{Picture, Presentation, SlideInfo};
