//! Unified error types for photodeck.
//!
//! Every failure aborts the batch, so the variants carry enough context (the
//! asset path, the recipient) to produce a one-line diagnostic.
use crate::ooxml::error::OoxmlError;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for photodeck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A required image file is absent
    #[error("asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    /// The image codec cannot process a file
    #[error("unsupported format: {}: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Derivation attempted before the base deck exists
    #[error("base deck not built: {} does not exist", .0.display())]
    BaseNotBuilt(PathBuf),

    /// Filesystem write or permission failure
    #[error("write error: {}: {reason}", path.display())]
    WriteError { path: PathBuf, reason: String },

    /// Output folder collision under the strict provisioning policy
    #[error("directory exists: {}", .0.display())]
    DirectoryExists(PathBuf),

    /// Invalid or unreadable manifest
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed presentation package
    #[error("package error: {0}")]
    Package(#[from] OoxmlError),

    /// A failure while producing one recipient's deck
    #[error("recipient '{name}': {source}")]
    Recipient {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for photodeck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of an [`Error`], independent of its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AssetNotFound,
    UnsupportedFormat,
    BaseNotBuilt,
    WriteError,
    DirectoryExists,
    Config,
    Package,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AssetNotFound => "AssetNotFound",
            Self::UnsupportedFormat => "UnsupportedFormat",
            Self::BaseNotBuilt => "BaseNotBuilt",
            Self::WriteError => "WriteError",
            Self::DirectoryExists => "DirectoryExists",
            Self::Config => "Config",
            Self::Package => "Package",
            Self::Io => "Io",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Get the kind of this error.
    ///
    /// Recipient context is looked through, so a missing personal photo
    /// reports `AssetNotFound`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AssetNotFound(_) => ErrorKind::AssetNotFound,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::BaseNotBuilt(_) => ErrorKind::BaseNotBuilt,
            Self::WriteError { .. } => ErrorKind::WriteError,
            Self::DirectoryExists(_) => ErrorKind::DirectoryExists,
            Self::Config(_) => ErrorKind::Config,
            Self::Package(_) => ErrorKind::Package,
            Self::Recipient { source, .. } => source.kind(),
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Build a `WriteError` for `path`.
    pub fn write(path: impl AsRef<Path>, reason: impl fmt::Display) -> Self {
        Self::WriteError {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Build an `UnsupportedFormat` error for `path`.
    pub fn unsupported(path: impl AsRef<Path>, reason: impl fmt::Display) -> Self {
        Self::UnsupportedFormat {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Attach a recipient name to this error.
    pub fn for_recipient(self, name: &str) -> Self {
        Self::Recipient {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_looks_through_recipient() {
        let err = Error::AssetNotFound(PathBuf::from("Personal_photos/Bob.jpg")).for_recipient("Bob");
        assert_eq!(err.kind(), ErrorKind::AssetNotFound);
        let msg = err.to_string();
        assert!(msg.contains("Bob"));
        assert!(msg.contains("Personal_photos/Bob.jpg"));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::BaseNotBuilt.to_string(), "BaseNotBuilt");
        assert_eq!(
            Error::DirectoryExists(PathBuf::from("out")).kind().to_string(),
            "DirectoryExists"
        );
    }
}
