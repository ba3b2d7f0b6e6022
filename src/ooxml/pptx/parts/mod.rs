/// Parts for PowerPoint presentation documents.
///
/// This module contains read views over the XML parts of a .pptx package,
/// following the structure of the python-pptx library.
pub mod presentation;
pub mod slide;

pub use presentation::{IdEntry, PresentationPart};
pub use slide::{PictureRef, SlideLayoutPart, SlidePart};
