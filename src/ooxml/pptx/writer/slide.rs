/// Slide XML generation for picture slides.
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::namespace;
use std::fmt::Write as FmtWrite;

use super::shape::PictureShape;

/// A slide on the blank layout whose content is a list of pictures.
#[derive(Debug, Clone, Default)]
pub struct PictureSlide {
    /// Pictures on the slide, in z-order
    pub(crate) pictures: Vec<PictureShape>,
}

impl PictureSlide {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next picture added to this slide should use.
    ///
    /// Id 1 belongs to the shape tree itself.
    pub fn next_shape_id(&self) -> u32 {
        self.pictures.len() as u32 + 2
    }

    pub fn add_picture(&mut self, picture: PictureShape) -> &mut Self {
        self.pictures.push(picture);
        self
    }

    /// Get the number of pictures on the slide.
    pub fn picture_count(&self) -> usize {
        self.pictures.len()
    }

    /// Generate slide XML content.
    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(1024 + self.pictures.len() * 512);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        let _ = write!(
            xml,
            r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
            namespace::DML_MAIN,
            namespace::OFC_RELATIONSHIPS,
            namespace::PML_MAIN
        );

        xml.push_str("<p:cSld>");
        xml.push_str("<p:spTree>");

        // Group shape properties (required)
        xml.push_str("<p:nvGrpSpPr>");
        xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
        xml.push_str("<p:cNvGrpSpPr/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGrpSpPr>");
        xml.push_str("<p:grpSpPr>");
        xml.push_str("<a:xfrm>");
        xml.push_str(r#"<a:off x="0" y="0"/>"#);
        xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
        xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
        xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
        xml.push_str("</a:xfrm>");
        xml.push_str("</p:grpSpPr>");

        for picture in &self.pictures {
            picture.to_xml(&mut xml)?;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;
    use crate::ooxml::opc::{PackURI, XmlPart};
    use crate::ooxml::pptx::parts::SlidePart;

    #[test]
    fn test_slide_xml_reads_back() {
        let mut slide = PictureSlide::new();
        let id = slide.next_shape_id();
        slide.add_picture(PictureShape::new(id, "rId2", "c1.jpg", 0, 0, 14_630_400, 8_229_600));
        assert_eq!(slide.picture_count(), 1);
        assert_eq!(slide.next_shape_id(), 3);

        let xml = slide.to_xml().unwrap();
        let part = XmlPart::new(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            ct::PML_SLIDE.to_string(),
            xml.into_bytes(),
        );
        let pictures = SlidePart::from_part(&part).unwrap().pictures().unwrap();

        assert_eq!(pictures.len(), 1);
        assert_eq!(pictures[0].r_id, "rId2");
        assert_eq!(pictures[0].description, "c1.jpg");
        assert_eq!(pictures[0].extent, (14_630_400, 8_229_600));
    }
}
