/// Errors raised by the PresentationML layer.
use thiserror::Error;

/// Result type for PresentationML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

#[derive(Error, Debug)]
pub enum OoxmlError {
    /// Container-level failure: ZIP, part lookup, relationships
    #[error("package: {0}")]
    Opc(#[from] crate::ooxml::opc::error::OpcError),

    /// Part XML that cannot be read or generated
    #[error("XML: {0}")]
    Xml(String),

    #[error("missing part: {0}")]
    PartNotFound(String),

    /// The main part is not a presentation
    #[error("not a presentation: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    /// Image bytes a slide cannot embed
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    /// Well-formed XML that breaks a PresentationML rule
    #[error("invalid presentation: {0}")]
    InvalidFormat(String),
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}
