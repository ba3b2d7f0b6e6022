//! Base deck construction.
use crate::batch::config::Canvas;
use crate::common::{Error, Result};
use crate::ooxml::pptx::writer::native_extent;
use crate::ooxml::pptx::{ImageFormat, Package};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Build the base deck from the shared photos, one slide per photo in
/// order, and save it to `artifact_path`.
///
/// Every photo is checked before anything is written, so a missing photo
/// leaves no partial artifact behind.
pub fn build_base_deck(shared_photos: &[PathBuf], canvas: Canvas, artifact_path: &Path) -> Result<Package> {
    if let Some(missing) = shared_photos.iter().find(|p| !p.is_file()) {
        return Err(Error::AssetNotFound(missing.clone()));
    }

    let (width, height) = canvas.emu();
    let mut package = Package::new(width, height)?;
    for path in shared_photos {
        append_photo_slide(&mut package, path, (width, height))?;
    }

    package
        .save(artifact_path)
        .map_err(|e| Error::write(artifact_path, e))?;
    info!(
        path = %artifact_path.display(),
        slides = shared_photos.len(),
        "built base deck"
    );
    Ok(package)
}

/// Append a full-bleed slide holding the photo at `path`, at its native size.
///
/// A photo whose native size differs from `canvas` is still placed at
/// (0, 0) unscaled.
pub(crate) fn append_photo_slide(package: &mut Package, path: &Path, canvas: (i64, i64)) -> Result<()> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::AssetNotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    let format = ImageFormat::detect_from_bytes(&bytes).ok_or_else(|| {
        Error::unsupported(path, "not an image format a presentation can embed")
    })?;
    let extent = native_extent(&bytes, format).map_err(|e| Error::unsupported(path, e))?;
    if extent != canvas {
        warn!(
            path = %path.display(),
            extent = ?extent,
            canvas = ?canvas,
            "photo does not cover the slide exactly"
        );
    }

    let description = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let slide = package.add_picture_slide(&bytes, &description, 0, 0)?;
    debug!(photo = %path.display(), slide = %slide, "added picture slide");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorKind;

    fn photo(dir: &Path, name: &str, shade: u8) -> PathBuf {
        let path = dir.join(name);
        image::RgbImage::from_pixel(1152, 648, image::Rgb([shade, 0, 0]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_slide_per_photo_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let photos = vec![photo(dir.path(), "c1.jpg", 10), photo(dir.path(), "c2.jpg", 250)];
        let artifact = dir.path().join("base.pptx");

        build_base_deck(&photos, Canvas::default(), &artifact).unwrap();

        let package = Package::open(&artifact).unwrap();
        let pres = package.presentation().unwrap();
        assert_eq!(pres.slide_width().unwrap(), Some(14_630_400));
        assert_eq!(pres.slide_height().unwrap(), Some(8_229_600));

        let slides = pres.slides().unwrap();
        assert_eq!(slides.len(), 2);
        for (slide, path) in slides.iter().zip(&photos) {
            assert_eq!(slide.layout_name.as_deref(), Some("Blank"));
            let pic = &slide.pictures[0];
            assert_eq!(pic.offset, (0, 0));
            assert_eq!(pic.extent, (14_630_400, 8_229_600));
            assert_eq!(pic.image, std::fs::read(path).unwrap());
        }
    }

    #[test]
    fn test_empty_photo_list() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("base.pptx");
        build_base_deck(&[], Canvas::default(), &artifact).unwrap();
        let package = Package::open(&artifact).unwrap();
        assert_eq!(package.presentation().unwrap().slide_count().unwrap(), 0);
    }

    #[test]
    fn test_missing_photo_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let photos = vec![photo(dir.path(), "c1.jpg", 0), dir.path().join("c2.jpg")];
        let artifact = dir.path().join("base.pptx");

        let err = build_base_deck(&photos, Canvas::default(), &artifact).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AssetNotFound);
        assert!(!artifact.exists());
    }

    #[test]
    fn test_unembeddable_file() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"shopping list").unwrap();

        let err = build_base_deck(&[notes], Canvas::default(), &dir.path().join("base.pptx"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_unwritable_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let photos = vec![photo(dir.path(), "c1.jpg", 0)];
        let artifact = dir.path().join("no-such-dir").join("base.pptx");

        let err = build_base_deck(&photos, Canvas::default(), &artifact).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteError);
    }
}
