/// Package implementation for PowerPoint presentations.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::error::OpcError;
use crate::ooxml::opc::{BlobPart, OpcPackage, PackURI, PackageWriter, Part, XmlPart};
use crate::ooxml::pptx::format::ImageFormat;
use crate::ooxml::pptx::parts::{PresentationPart, SlideLayoutPart};
use crate::ooxml::pptx::presentation::Presentation;
use crate::ooxml::pptx::template;
use crate::ooxml::pptx::writer::pres::{append_slide_id, presentation_xml};
use crate::ooxml::pptx::writer::{PictureShape, PictureSlide};
use std::path::Path;

const PRESENTATION_PARTNAME: &str = "/ppt/presentation.xml";
const SLIDE_MASTER_PARTNAME: &str = "/ppt/slideMasters/slideMaster1.xml";
const THEME_PARTNAME: &str = "/ppt/theme/theme1.xml";

/// A PowerPoint (.pptx) package.
///
/// This is the main entry point for working with PowerPoint presentations.
/// It wraps an OPC package and provides PowerPoint-specific functionality.
///
/// # Examples
///
/// ```rust,no_run
/// use photodeck::common::unit::inches_to_emu;
/// use photodeck::ooxml::pptx::Package;
///
/// // Create a 16:9 deck and add one picture slide
/// let mut pkg = Package::new(inches_to_emu(16.0), inches_to_emu(9.0))?;
/// let photo = std::fs::read("Photos/Construction1.jpg")?;
/// pkg.add_picture_slide(&photo, "Construction1.jpg", 0, 0)?;
/// pkg.save("base.pptx")?;
///
/// // Read it back
/// let pkg = Package::open("base.pptx")?;
/// println!("Presentation has {} slides", pkg.presentation()?.slide_count()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Package {
    /// The underlying OPC package
    opc: OpcPackage,
}

impl Package {
    /// Create a deck with no slides and the given slide size in EMUs.
    ///
    /// The deck carries one slide master with a "Title Slide" and a "Blank"
    /// layout, a theme, and the document property parts.
    pub fn new(slide_width: i64, slide_height: i64) -> Result<Self> {
        let mut opc = OpcPackage::new();

        let pres_uri = uri(PRESENTATION_PARTNAME)?;
        let master_uri = uri(SLIDE_MASTER_PARTNAME)?;
        let theme_uri = uri(THEME_PARTNAME)?;

        // The master's sldLayoutIdLst refers to its layouts as rId1 and rId2,
        // so the layouts must be related before anything else.
        let mut master = XmlPart::new(
            master_uri.clone(),
            ct::PML_SLIDE_MASTER.to_string(),
            template::default_slide_master_xml().as_bytes().to_vec(),
        );
        for (idx, layout_xml) in template::all_slide_layouts().iter().enumerate() {
            let layout_uri = uri(&format!("/ppt/slideLayouts/slideLayout{}.xml", idx + 1))?;
            let mut layout = XmlPart::new(
                layout_uri.clone(),
                ct::PML_SLIDE_LAYOUT.to_string(),
                layout_xml.as_bytes().to_vec(),
            );
            layout.relate_to(&master_uri, rt::SLIDE_MASTER);
            master.relate_to(&layout_uri, rt::SLIDE_LAYOUT);
            opc.add_part(Box::new(layout));
        }
        master.relate_to(&theme_uri, rt::THEME);
        opc.add_part(Box::new(master));

        let mut pres = XmlPart::new(pres_uri.clone(), ct::PML_PRESENTATION_MAIN.to_string(), Vec::new());
        let master_r_id = pres.relate_to(&master_uri, rt::SLIDE_MASTER);
        pres.set_blob(presentation_xml(&master_r_id, slide_width, slide_height)?.into_bytes());

        let pres_level = [
            ("/ppt/presProps.xml", ct::PML_PRES_PROPS, rt::PRES_PROPS, template::default_pres_props_xml()),
            ("/ppt/viewProps.xml", ct::PML_VIEW_PROPS, rt::VIEW_PROPS, template::default_view_props_xml()),
            (THEME_PARTNAME, ct::OFC_THEME, rt::THEME, template::default_theme_xml()),
            ("/ppt/tableStyles.xml", ct::PML_TABLE_STYLES, rt::TABLE_STYLES, template::default_table_styles_xml()),
        ];
        for (partname, content_type, reltype, xml) in pres_level {
            let partname = uri(partname)?;
            pres.relate_to(&partname, reltype);
            opc.add_part(Box::new(XmlPart::new(
                partname,
                content_type.to_string(),
                xml.as_bytes().to_vec(),
            )));
        }
        opc.add_part(Box::new(pres));
        opc.relate_to(&pres_uri, rt::OFFICE_DOCUMENT);

        let doc_props = [
            ("/docProps/core.xml", ct::OPC_CORE_PROPERTIES, rt::CORE_PROPERTIES, template::default_core_props_xml()),
            ("/docProps/app.xml", ct::OFC_EXTENDED_PROPERTIES, rt::EXTENDED_PROPERTIES, template::default_app_props_xml()),
        ];
        for (partname, content_type, reltype, xml) in doc_props {
            let partname = uri(partname)?;
            opc.relate_to(&partname, reltype);
            opc.add_part(Box::new(XmlPart::new(
                partname,
                content_type.to_string(),
                xml.as_bytes().to_vec(),
            )));
        }

        Ok(Self { opc })
    }

    /// Open a .pptx package from a file path.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use photodeck::ooxml::pptx::Package;
    ///
    /// let pkg = Package::open("base.pptx")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_opc(OpcPackage::open(path)?)
    }

    /// Create a .pptx package from the bytes of the file.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_opc(OpcPackage::from_bytes(data)?)
    }

    fn from_opc(opc: OpcPackage) -> Result<Self> {
        // Verify it's a PowerPoint presentation by checking the main part's content type
        let main_part = opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;

        let content_type = main_part.content_type();
        // Support both regular and macro-enabled presentations
        if content_type != ct::PML_PRESENTATION_MAIN && content_type != ct::PML_PRES_MACRO_MAIN {
            return Err(OoxmlError::InvalidContentType {
                expected: format!(
                    "{} or {}",
                    ct::PML_PRESENTATION_MAIN,
                    ct::PML_PRES_MACRO_MAIN
                ),
                got: content_type.to_string(),
            });
        }

        Ok(Self { opc })
    }

    /// Get the main presentation.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use photodeck::ooxml::pptx::Package;
    ///
    /// let pkg = Package::open("Alice.pptx")?;
    /// for slide in pkg.presentation()?.slides()? {
    ///     for picture in &slide.pictures {
    ///         println!("{}: {}", slide.partname, picture.description);
    ///     }
    /// }
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn presentation(&self) -> Result<Presentation<'_>> {
        let main_part = self
            .opc
            .main_document_part()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;

        let pres_part = PresentationPart::from_part(main_part)?;
        Ok(Presentation::new(pres_part, &self.opc))
    }

    /// Append a slide on the blank layout holding one picture at `(x, y)`.
    ///
    /// The picture keeps the image's native size. `description` becomes the
    /// picture's alternative text. Returns the partname of the new slide.
    pub fn add_picture_slide(
        &mut self,
        image: &[u8],
        description: &str,
        x: i64,
        y: i64,
    ) -> Result<PackURI> {
        let format = ImageFormat::detect_from_bytes(image).ok_or_else(|| {
            OoxmlError::UnsupportedImage(format!("{}: not a PNG, JPEG, GIF, BMP or TIFF image", description))
        })?;

        let layout_uri = self.blank_layout()?;
        let image_uri = self
            .opc
            .next_partname(&format!("/ppt/media/image%d.{}", format.extension()))?;
        let slide_uri = self.opc.next_partname("/ppt/slides/slide%d.xml")?;

        let mut slide_part = XmlPart::new(slide_uri.clone(), ct::PML_SLIDE.to_string(), Vec::new());
        slide_part.relate_to(&layout_uri, rt::SLIDE_LAYOUT);
        let image_r_id = slide_part.relate_to(&image_uri, rt::IMAGE);

        let mut slide = PictureSlide::new();
        let shape_id = slide.next_shape_id();
        slide.add_picture(PictureShape::native(
            shape_id,
            image_r_id,
            description,
            x,
            y,
            image,
            format,
        )?);
        slide_part.set_blob(slide.to_xml()?.into_bytes());

        self.opc.add_part(Box::new(BlobPart::new(
            image_uri,
            format.mime_type().to_string(),
            image.to_vec(),
        )));
        self.opc.add_part(Box::new(slide_part));

        let pres_uri = self.opc.main_document_partname()?;
        let slide_id = PresentationPart::from_part(self.opc.get_part(&pres_uri)?)?.next_slide_id()?;
        let pres = self.opc.get_part_mut(&pres_uri)?;
        let slide_r_id = pres.relate_to(&slide_uri, rt::SLIDE);
        let xml = append_slide_id(pres.blob(), slide_id, &slide_r_id)?;
        pres.set_blob(xml);

        Ok(slide_uri)
    }

    /// Find the blank slide layout reachable from the presentation's masters.
    ///
    /// A layout with `type="blank"` wins; otherwise the first layout named
    /// "Blank" is used.
    fn blank_layout(&self) -> Result<PackURI> {
        let pres = self.opc.main_document_part()?;
        let mut named_blank = None;

        for master_rel in pres.rels().of_type(rt::SLIDE_MASTER) {
            let master = self.opc.get_part(&master_rel.target_partname()?)?;
            for layout_rel in master.rels().of_type(rt::SLIDE_LAYOUT) {
                let layout_uri = layout_rel.target_partname()?;
                let layout = SlideLayoutPart::from_part(self.opc.get_part(&layout_uri)?)?;
                if layout.is_blank()? {
                    return Ok(layout_uri);
                }
                if named_blank.is_none() && layout.name()? == "Blank" {
                    named_blank = Some(layout_uri);
                }
            }
        }

        named_blank.ok_or_else(|| OoxmlError::PartNotFound("blank slide layout".to_string()))
    }

    /// Save the package to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PackageWriter::write(path, &self.opc)?;
        Ok(())
    }

    /// Serialize the package to the bytes of a .pptx file.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(PackageWriter::to_bytes(&self.opc)?)
    }

    /// Get the underlying OPC package.
    ///
    /// This provides access to lower-level package operations.
    #[inline]
    pub fn opc_package(&self) -> &OpcPackage {
        &self.opc
    }
}

fn uri(partname: &str) -> Result<PackURI> {
    PackURI::new(partname).map_err(|e| OoxmlError::Opc(OpcError::InvalidPackUri(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::unit::inches_to_emu;
    use std::io::Cursor;

    fn jpeg(width: u32, height: u32, shade: u8) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbImage::from_pixel(width, height, image::Rgb([shade, shade, shade]))
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
            .unwrap();
        bytes
    }

    fn canvas() -> (i64, i64) {
        (inches_to_emu(16.0), inches_to_emu(9.0))
    }

    #[test]
    fn test_new_deck_is_empty_with_canvas() {
        let (w, h) = canvas();
        let pkg = Package::new(w, h).unwrap();
        let pres = pkg.presentation().unwrap();

        assert_eq!(pres.slide_count().unwrap(), 0);
        assert_eq!(pres.slide_width().unwrap(), Some(14_630_400));
        assert_eq!(pres.slide_height().unwrap(), Some(8_229_600));
        assert!(pres.slides().unwrap().is_empty());
    }

    #[test]
    fn test_blank_layout_is_found() {
        let pkg = Package::new(100, 100).unwrap();
        assert_eq!(
            pkg.blank_layout().unwrap().as_str(),
            "/ppt/slideLayouts/slideLayout2.xml"
        );
    }

    #[test]
    fn test_add_picture_slides_in_order() {
        let (w, h) = canvas();
        let mut pkg = Package::new(w, h).unwrap();
        let first = jpeg(1152, 648, 10);
        let second = jpeg(1152, 648, 200);

        let s1 = pkg.add_picture_slide(&first, "c1.jpg", 0, 0).unwrap();
        let s2 = pkg.add_picture_slide(&second, "c2.jpg", 0, 0).unwrap();
        assert_eq!(s1.as_str(), "/ppt/slides/slide1.xml");
        assert_eq!(s2.as_str(), "/ppt/slides/slide2.xml");

        let slides = pkg.presentation().unwrap().slides().unwrap();
        assert_eq!(slides.len(), 2);
        for (slide, (name, bytes)) in slides.iter().zip([("c1.jpg", &first), ("c2.jpg", &second)]) {
            assert_eq!(slide.layout_name.as_deref(), Some("Blank"));
            assert_eq!(slide.pictures.len(), 1);
            let pic = &slide.pictures[0];
            assert_eq!(pic.description, name);
            assert_eq!(pic.offset, (0, 0));
            assert_eq!(pic.extent, (w, h));
            assert_eq!(pic.content_type, ct::JPEG);
            assert_eq!(&pic.image, bytes);
        }
    }

    #[test]
    fn test_round_trip_through_bytes() {
        let mut pkg = Package::new(100, 100).unwrap();
        pkg.add_picture_slide(&jpeg(8, 4, 0), "tiny.jpg", 0, 0).unwrap();

        let mut reopened = Package::from_bytes(pkg.to_bytes().unwrap()).unwrap();
        assert_eq!(reopened.presentation().unwrap().slide_count().unwrap(), 1);

        reopened.add_picture_slide(&jpeg(8, 4, 255), "Alice.jpg", 0, 0).unwrap();
        let slides = reopened.presentation().unwrap().slides().unwrap();
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].pictures[0].description, "tiny.jpg");
        assert_eq!(slides[1].pictures[0].description, "Alice.jpg");
        assert_eq!(slides[1].pictures[0].extent, (8 * 12_700, 4 * 12_700));
    }

    #[test]
    fn test_save_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.pptx");

        let mut pkg = Package::new(100, 100).unwrap();
        pkg.add_picture_slide(&jpeg(2, 2, 0), "x.jpg", 0, 0).unwrap();
        pkg.save(&path).unwrap();

        let pkg = Package::open(&path).unwrap();
        assert_eq!(pkg.presentation().unwrap().slide_count().unwrap(), 1);
    }

    #[test]
    fn test_rejects_non_image() {
        let mut pkg = Package::new(100, 100).unwrap();
        let err = pkg.add_picture_slide(b"just some text", "notes.txt", 0, 0).unwrap_err();
        assert!(matches!(err, OoxmlError::UnsupportedImage(_)));
        assert_eq!(pkg.presentation().unwrap().slide_count().unwrap(), 0);
    }

    #[test]
    fn test_open_rejects_non_pptx() {
        assert!(Package::from_bytes(b"not a zip".to_vec()).is_err());
    }
}
