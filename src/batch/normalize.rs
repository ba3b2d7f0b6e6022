//! In-place image normalization.
//!
//! Every photo is rescaled to one fixed resolution so that, at 72 dpi, it
//! exactly covers the slide canvas.
use crate::common::{Error, Result};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use serde::Deserialize;
use std::fmt;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::debug;

/// Target size of a normalized image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(1152, 648)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Resize the image at `path` to exactly `target` and overwrite it.
///
/// The aspect ratio is not preserved. The file keeps its path and its format;
/// the format is taken from the content, falling back to the extension.
pub fn normalize(path: &Path, target: Resolution) -> Result<()> {
    if !path.exists() {
        return Err(Error::AssetNotFound(path.to_path_buf()));
    }

    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| Error::from_image_error(path, e.into()))?;
    let format = reader
        .format()
        .ok_or_else(|| Error::unsupported(path, "unrecognized image format"))?;
    let image = reader
        .decode()
        .map_err(|e| Error::from_image_error(path, e))?;

    let (width, height) = (image.width(), image.height());
    let resized = image.resize_exact(target.width, target.height, FilterType::CatmullRom);

    // JPEG has no alpha channel
    let resized = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8()),
        _ => resized,
    };

    let mut bytes = Vec::new();
    resized
        .write_to(&mut Cursor::new(&mut bytes), format)
        .map_err(|e| Error::unsupported(path, e))?;
    replace_contents(path, &bytes).map_err(|e| Error::write(path, e))?;

    debug!(
        path = %path.display(),
        from = %Resolution::new(width, height),
        to = %target,
        "normalized image"
    );
    Ok(())
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
///
/// The original stays intact until the new contents are fully on disk.
fn replace_contents(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".photodeck-")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().set_permissions(std::fs::metadata(path)?.permissions())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
