//! Writer components for PPTX: generated presentation.xml, picture slides
//! and picture shapes.

pub mod pres;
pub mod shape;
pub mod slide;

// Re-export main types
pub use shape::{PictureShape, native_extent};
pub use slide::PictureSlide;
