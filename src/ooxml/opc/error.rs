/// Errors raised while reading, assembling or writing an OPC package.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpcError {
    /// The package file does not exist
    #[error("package not found: {0}")]
    PackageNotFound(String),

    #[error("invalid part name: {0}")]
    InvalidPackUri(String),

    #[error("part not found: {0}")]
    PartNotFound(String),

    #[error("relationship not found: {0}")]
    RelationshipNotFound(String),

    /// Neither an Override nor a Default in [Content_Types].xml covers the part
    #[error("no content type for part {0}")]
    ContentTypeNotFound(String),

    #[error("invalid relationship: {0}")]
    InvalidRelationship(String),

    #[error("malformed package XML: {0}")]
    XmlError(String),

    #[error("ZIP container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("package I/O: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for OpcError {
    fn from(err: quick_xml::Error) -> Self {
        OpcError::XmlError(err.to_string())
    }
}

impl From<std::str::Utf8Error> for OpcError {
    fn from(err: std::str::Utf8Error) -> Self {
        OpcError::XmlError(format!("non-UTF-8 text: {}", err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for OpcError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        OpcError::XmlError(format!("bad attribute: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, OpcError>;
