/// Picture shape generation for PPTX slides.
use crate::common::unit::{DEFAULT_DPI, px_to_emu};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::rel::escape_xml;
use std::fmt::Write as FmtWrite;
use std::io::Cursor;

pub use super::super::format::ImageFormat;

/// A picture placed on a slide, referencing its image through a relationship.
#[derive(Debug, Clone)]
pub struct PictureShape {
    /// Shape ID, unique within the slide
    pub(crate) shape_id: u32,
    /// Relationship ID of the image part
    pub(crate) r_id: String,
    /// Alternative text
    pub(crate) description: String,
    pub(crate) x: i64,
    pub(crate) y: i64,
    pub(crate) width: i64,
    pub(crate) height: i64,
}

impl PictureShape {
    /// Create a picture shape at `(x, y)` with an explicit extent.
    pub fn new(
        shape_id: u32,
        r_id: impl Into<String>,
        description: impl Into<String>,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> Self {
        Self {
            shape_id,
            r_id: r_id.into(),
            description: description.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// Create a picture shape at `(x, y)` sized to the image's native extent.
    pub fn native(
        shape_id: u32,
        r_id: impl Into<String>,
        description: impl Into<String>,
        x: i64,
        y: i64,
        image: &[u8],
        format: ImageFormat,
    ) -> Result<Self> {
        let (width, height) = native_extent(image, format)?;
        Ok(Self::new(shape_id, r_id, description, x, y, width, height))
    }

    /// Append the `<p:pic>` element for this shape to `xml`.
    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<p:pic>");
        xml.push_str("<p:nvPicPr>");
        write!(
            xml,
            r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
            self.shape_id,
            self.shape_id.saturating_sub(1),
            escape_xml(&self.description)
        )
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvPicPr>");

        xml.push_str("<p:blipFill>");
        write!(xml, r#"<a:blip r:embed="{}"/>"#, escape_xml(&self.r_id))
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
        xml.push_str("</p:blipFill>");

        xml.push_str("<p:spPr>");
        xml.push_str("<a:xfrm>");
        write!(xml, r#"<a:off x="{}" y="{}"/>"#, self.x, self.y)
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, self.width, self.height)
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        xml.push_str("</a:xfrm>");
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
        xml.push_str("</p:spPr>");
        xml.push_str("</p:pic>");

        Ok(())
    }
}

/// Native extent `(cx, cy)` of an image in EMUs, at 72 dpi.
///
/// Only the image header is read; pixels are not decoded.
pub fn native_extent(image: &[u8], format: ImageFormat) -> Result<(i64, i64)> {
    let (width, height) = image::ImageReader::with_format(Cursor::new(image), format.codec())
        .into_dimensions()
        .map_err(|e| OoxmlError::UnsupportedImage(format!("cannot read image size: {}", e)))?;

    Ok((px_to_emu(width, DEFAULT_DPI), px_to_emu(height, DEFAULT_DPI)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_native_extent() {
        let bytes = png(1152, 648);
        assert_eq!(
            native_extent(&bytes, ImageFormat::Png).unwrap(),
            (14_630_400, 8_229_600)
        );
    }

    #[test]
    fn test_native_extent_rejects_garbage() {
        assert!(native_extent(b"\x89PNG not really", ImageFormat::Png).is_err());
    }

    #[test]
    fn test_picture_xml() {
        let shape = PictureShape::new(2, "rId2", "c1 <draft>.jpg", 0, 0, 100, 50);
        let mut xml = String::new();
        shape.to_xml(&mut xml).unwrap();

        assert!(xml.starts_with("<p:pic>"));
        assert!(xml.contains(r#"<p:cNvPr id="2" name="Picture 1" descr="c1 &lt;draft&gt;.jpg"/>"#));
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));
        assert!(xml.contains(r#"<a:off x="0" y="0"/><a:ext cx="100" cy="50"/>"#));
    }
}
