//! Error conversion implementations.
//!
//! This module contains From trait implementations and helpers that convert
//! errors from the package layer and the image codec into the unified Error type.

use super::types::Error;
use image::ImageError;
use std::path::Path;

impl From<crate::ooxml::opc::error::OpcError> for Error {
    fn from(err: crate::ooxml::opc::error::OpcError) -> Self {
        Error::Package(crate::ooxml::error::OoxmlError::Opc(err))
    }
}

impl Error {
    /// Convert an image codec error for the asset at `path`.
    ///
    /// Only read-side failures come through here. Decoding failures become
    /// `UnsupportedFormat`; a vanished file is `AssetNotFound` and any other
    /// IO failure is `Io`, with the path in the message.
    pub(crate) fn from_image_error(path: &Path, err: ImageError) -> Self {
        match err {
            ImageError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Error::AssetNotFound(path.to_path_buf())
            },
            ImageError::IoError(e) => Error::Io(std::io::Error::new(
                e.kind(),
                format!("reading {}: {}", path.display(), e),
            )),
            other => Error::unsupported(path, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;
    use image::error::{ImageFormatHint, UnsupportedError};

    #[test]
    fn test_image_not_found_maps_to_asset_not_found() {
        let err = ImageError::IoError(std::io::Error::from(std::io::ErrorKind::NotFound));
        let converted = Error::from_image_error(Path::new("Photos/c1.jpg"), err);
        assert_eq!(converted.kind(), ErrorKind::AssetNotFound);
    }

    #[test]
    fn test_unreadable_image_maps_to_io() {
        let err = ImageError::IoError(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        let converted = Error::from_image_error(Path::new("Photos/c1.jpg"), err);
        assert_eq!(converted.kind(), ErrorKind::Io);
        assert!(converted.to_string().contains("Photos/c1.jpg"));
    }

    #[test]
    fn test_unsupported_maps_to_unsupported_format() {
        let err = ImageError::Unsupported(UnsupportedError::from(ImageFormatHint::Unknown));
        let converted = Error::from_image_error(Path::new("Photos/notes.txt"), err);
        assert_eq!(converted.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_opc_error_maps_to_package() {
        let err = crate::ooxml::opc::error::OpcError::PartNotFound("/ppt/x.xml".to_string());
        assert_eq!(Error::from(err).kind(), ErrorKind::Package);
    }
}
