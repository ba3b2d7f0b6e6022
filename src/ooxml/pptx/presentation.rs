/// Main presentation object - the read API over a deck's slides.
use crate::ooxml::error::Result;
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::pptx::parts::{PresentationPart, SlideLayoutPart, SlidePart};

/// A picture on a slide, resolved to its image bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    /// Shape name (e.g. "Picture 1")
    pub name: String,
    /// Alternative text
    pub description: String,
    /// Offset `(x, y)` in EMUs
    pub offset: (i64, i64),
    /// Extent `(cx, cy)` in EMUs
    pub extent: (i64, i64),
    /// Partname of the embedded image
    pub image_partname: PackURI,
    /// Content type of the embedded image
    pub content_type: String,
    /// The embedded image bytes
    pub image: Vec<u8>,
}

/// One slide of a presentation, in `sldIdLst` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideInfo {
    /// Partname of the slide part
    pub partname: PackURI,
    /// Name of the slide layout the slide uses, if it has one
    pub layout_name: Option<String>,
    /// Pictures on the slide, in document order
    pub pictures: Vec<Picture>,
}

/// A PowerPoint presentation.
///
/// Not intended to be constructed directly. Use `Package::presentation()` to
/// access a presentation.
///
/// # Examples
///
/// ```rust,no_run
/// use photodeck::ooxml::pptx::Package;
///
/// let pkg = Package::open("base.pptx")?;
/// let pres = pkg.presentation()?;
///
/// if let (Some(width), Some(height)) = (pres.slide_width()?, pres.slide_height()?) {
///     println!("Slide size: {}x{} EMUs", width, height);
/// }
///
/// for slide in pres.slides()? {
///     println!("{}: {} picture(s)", slide.partname, slide.pictures.len());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Presentation<'a> {
    /// The underlying presentation part
    part: PresentationPart<'a>,
    /// Reference to the OPC package for accessing related parts
    package: &'a OpcPackage,
}

impl<'a> Presentation<'a> {
    #[inline]
    pub(crate) fn new(part: PresentationPart<'a>, package: &'a OpcPackage) -> Self {
        Self { part, package }
    }

    /// Get the number of slides in the presentation.
    pub fn slide_count(&self) -> Result<usize> {
        self.part.slide_count()
    }

    /// Get the slide width in EMUs, or None if the slide size is not defined.
    pub fn slide_width(&self) -> Result<Option<i64>> {
        self.part.slide_width()
    }

    /// Get the slide height in EMUs, or None if the slide size is not defined.
    pub fn slide_height(&self) -> Result<Option<i64>> {
        self.part.slide_height()
    }

    /// Get all slides in presentation order.
    pub fn slides(&self) -> Result<Vec<SlideInfo>> {
        let pres_part = self.part.part();
        let slide_rids = self.part.slide_rids()?;
        let mut slides = Vec::with_capacity(slide_rids.len());

        for rid in slide_rids {
            let partname = pres_part.related_partname(&rid)?;
            let slide_part = SlidePart::from_part(self.package.get_part(&partname)?)?;

            slides.push(SlideInfo {
                layout_name: self.layout_name(&slide_part)?,
                pictures: self.pictures(&slide_part)?,
                partname,
            });
        }

        Ok(slides)
    }

    fn layout_name(&self, slide: &SlidePart<'_>) -> Result<Option<String>> {
        let Ok(rel) = slide.part().rels().part_with_reltype(rt::SLIDE_LAYOUT) else {
            return Ok(None);
        };
        let layout = self.package.get_part(&rel.target_partname()?)?;
        Ok(Some(SlideLayoutPart::from_part(layout)?.name()?))
    }

    fn pictures(&self, slide: &SlidePart<'_>) -> Result<Vec<Picture>> {
        slide
            .pictures()?
            .into_iter()
            .map(|pic| {
                let image_partname = slide.part().related_partname(&pic.r_id)?;
                let image_part = self.package.get_part(&image_partname)?;
                Ok(Picture {
                    name: pic.name,
                    description: pic.description,
                    offset: pic.offset,
                    extent: pic.extent,
                    content_type: image_part.content_type().to_string(),
                    image: image_part.blob().to_vec(),
                    image_partname,
                })
            })
            .collect()
    }

    /// Get access to the underlying presentation part.
    #[inline]
    pub fn part(&self) -> &PresentationPart<'a> {
        &self.part
    }
}
