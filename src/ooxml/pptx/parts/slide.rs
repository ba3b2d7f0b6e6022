/// Slide parts and related types.
///
/// This module contains read views for slides and slide layouts.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::part::{Part, attr_value};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// A picture shape (`p:pic`) as it appears in slide XML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PictureRef {
    /// Shape name from `p:cNvPr`
    pub name: String,
    /// Alternative text from `p:cNvPr/@descr`
    pub description: String,
    /// Relationship id of the embedded image (`a:blip/@r:embed`)
    pub r_id: String,
    /// Offset `(x, y)` in EMUs
    pub offset: (i64, i64),
    /// Extent `(cx, cy)` in EMUs
    pub extent: (i64, i64),
}

/// A slide part.
///
/// Corresponds to `/ppt/slides/slideN.xml` in the package.
pub struct SlidePart<'a> {
    /// The underlying OPC part
    part: &'a dyn Part,
}

impl<'a> SlidePart<'a> {
    /// Create a SlidePart from an OPC Part.
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    #[inline]
    fn xml_bytes(&self) -> &[u8] {
        self.part.blob()
    }

    /// Get the slide name from the `<p:cSld>` element.
    pub fn name(&self) -> Result<String> {
        csld_name(self.xml_bytes())
    }

    /// Parse every picture shape on the slide, in document order.
    pub fn pictures(&self) -> Result<Vec<PictureRef>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);

        let mut pictures = Vec::new();
        let mut current: Option<PictureRef> = None;
        let mut in_xfrm = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"pic" => current = Some(PictureRef::default()),
                    b"xfrm" => in_xfrm = true,
                    _ => {
                        if let Some(pic) = current.as_mut() {
                            read_picture_element(pic, e, in_xfrm)?;
                        }
                    },
                },
                Ok(Event::Empty(ref e)) => {
                    if let Some(pic) = current.as_mut() {
                        read_picture_element(pic, e, in_xfrm)?;
                    }
                },
                Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                    b"pic" => {
                        if let Some(pic) = current.take() {
                            pictures.push(pic);
                        }
                    },
                    b"xfrm" => in_xfrm = false,
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(pictures)
    }

    /// Get the underlying OPC part.
    #[inline]
    pub fn part(&self) -> &'a dyn Part {
        self.part
    }
}

/// Fill in the picture fields carried by one element inside `p:pic`.
fn read_picture_element(pic: &mut PictureRef, e: &BytesStart<'_>, in_xfrm: bool) -> Result<()> {
    match e.local_name().as_ref() {
        b"cNvPr" => {
            for attr in e.attributes().flatten() {
                match attr.key.as_ref() {
                    b"name" => pic.name = attr_value(&attr.value)?,
                    b"descr" => pic.description = attr_value(&attr.value)?,
                    _ => {},
                }
            }
        },
        b"blip" => {
            for attr in e.attributes().flatten() {
                if attr.key.local_name().as_ref() == b"embed" {
                    pic.r_id = attr_value(&attr.value)?;
                }
            }
        },
        b"off" if in_xfrm => pic.offset = read_pair(e, b"x", b"y")?,
        b"ext" if in_xfrm => pic.extent = read_pair(e, b"cx", b"cy")?,
        _ => {},
    }
    Ok(())
}

fn read_pair(e: &BytesStart<'_>, first: &[u8], second: &[u8]) -> Result<(i64, i64)> {
    let mut pair = (0, 0);
    for attr in e.attributes().flatten() {
        let key = attr.key.as_ref();
        if key == first || key == second {
            let value = atoi_simd::parse::<i64, false, false>(&attr.value).map_err(|_| {
                OoxmlError::Xml(format!(
                    "Invalid coordinate: '{}'",
                    String::from_utf8_lossy(&attr.value)
                ))
            })?;
            if key == first {
                pair.0 = value;
            } else {
                pair.1 = value;
            }
        }
    }
    Ok(pair)
}

/// The `name` attribute of the first `cSld` element, or an empty string.
fn csld_name(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"cSld" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"name" {
                            return attr_value(&attr.value).map_err(OoxmlError::from);
                        }
                    }
                    return Ok(String::new());
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(String::new())
}

/// A slide layout part.
///
/// Corresponds to `/ppt/slideLayouts/slideLayoutN.xml` in the package.
pub struct SlideLayoutPart<'a> {
    /// The underlying OPC part
    part: &'a dyn Part,
}

impl<'a> SlideLayoutPart<'a> {
    /// Create a SlideLayoutPart from an OPC Part.
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    /// Get the layout name (e.g. "Blank").
    pub fn name(&self) -> Result<String> {
        csld_name(self.part.blob())
    }

    /// Get the `type` attribute of the root `sldLayout` element.
    pub fn layout_type(&self) -> Result<Option<String>> {
        let mut reader = Reader::from_reader(self.part.blob());
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() != b"sldLayout" {
                        return Ok(None);
                    }
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"type" {
                            return Ok(Some(attr_value(&attr.value)?));
                        }
                    }
                    return Ok(None);
                },
                Ok(Event::Eof) => return Ok(None),
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }
    }

    /// Whether this is the blank layout (`type="blank"`).
    pub fn is_blank(&self) -> Result<bool> {
        Ok(self.layout_type()?.as_deref() == Some("blank"))
    }

    /// Get the underlying OPC part.
    #[inline]
    pub fn part(&self) -> &'a dyn Part {
        self.part
    }
}
