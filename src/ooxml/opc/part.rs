use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;
use quick_xml::Reader;
use quick_xml::events::Event;
/// Open Packaging Convention (OPC) objects related to package parts.
///
/// Parts are the units of content in a package: each has a unique partname,
/// a content type, a blob and its own relationships. XML parts additionally
/// offer lightweight streaming queries over their content.
use std::collections::HashMap;

/// Trait representing a part in an OPC package.
pub trait Part {
    /// Get the partname of this part.
    fn partname(&self) -> &PackURI;

    /// Get the content type of this part.
    fn content_type(&self) -> &str;

    /// Get the binary content of this part.
    fn blob(&self) -> &[u8];

    /// Replace the binary content of this part.
    fn set_blob(&mut self, blob: Vec<u8>);

    /// Get the relationships for this part.
    fn rels(&self) -> &Relationships;

    /// Get mutable access to the relationships for this part.
    fn rels_mut(&mut self) -> &mut Relationships;

    /// Add or get a relationship to another part, returning its rId.
    fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        self.rels_mut().get_or_add(reltype, target).r_id().to_string()
    }

    /// Resolve a relationship ID to the partname it targets.
    fn related_partname(&self, r_id: &str) -> Result<PackURI> {
        self.rels()
            .get(r_id)
            .ok_or_else(|| OpcError::RelationshipNotFound(format!("{} in {}", r_id, self.partname())))?
            .target_partname()
    }
}

/// A part that stores opaque binary content, such as an embedded image.
#[derive(Debug)]
pub struct BlobPart {
    /// The partname (URI) of this part
    partname: PackURI,

    /// The content type of this part
    content_type: String,

    /// The binary content of this part
    blob: Vec<u8>,

    /// Relationships from this part to other parts
    rels: Relationships,
}

impl BlobPart {
    /// Create a new BlobPart.
    pub fn new(partname: PackURI, content_type: String, blob: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type,
            blob,
            rels,
        }
    }
}

impl Part for BlobPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.blob
    }

    fn set_blob(&mut self, blob: Vec<u8>) {
        self.blob = blob;
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }
}

/// An XML part with streaming query helpers over its content.
#[derive(Debug)]
pub struct XmlPart {
    /// The partname (URI) of this part
    partname: PackURI,

    /// The content type of this part
    content_type: String,

    /// The XML content as raw UTF-8 bytes
    xml_bytes: Vec<u8>,

    /// Relationships from this part to other parts
    rels: Relationships,
}

impl XmlPart {
    /// Create a new XmlPart.
    pub fn new(partname: PackURI, content_type: String, xml_bytes: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type,
            xml_bytes,
            rels,
        }
    }

    /// Load an XML part from raw data, validating that it is UTF-8.
    pub fn load(partname: PackURI, content_type: String, xml_bytes: Vec<u8>) -> Result<Self> {
        std::str::from_utf8(&xml_bytes)
            .map_err(|e| OpcError::XmlError(format!("Invalid UTF-8 in {}: {}", partname, e)))?;

        Ok(Self::new(partname, content_type, xml_bytes))
    }

    /// Find all elements with the given local name and collect their attributes.
    ///
    /// Attribute keys keep their namespace prefix (e.g. `r:id`).
    pub fn find_elements_with_attrs(
        &self,
        element_name: &str,
    ) -> Result<Vec<HashMap<String, String>>> {
        find_elements_with_attrs(&self.xml_bytes, element_name)
    }
}

impl Part for XmlPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.xml_bytes
    }

    fn set_blob(&mut self, blob: Vec<u8>) {
        self.xml_bytes = blob;
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }
}

/// Find all elements with the given local name in `xml` and collect their attributes.
pub fn find_elements_with_attrs(
    xml: &[u8],
    element_name: &str,
) -> Result<Vec<HashMap<String, String>>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut results = Vec::new();
    let element_name_bytes = element_name.as_bytes();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == element_name_bytes {
                    let mut attrs = HashMap::new();
                    for attr in e.attributes() {
                        let attr = attr?;
                        let key = std::str::from_utf8(attr.key.as_ref())?;
                        attrs.insert(key.to_string(), attr_value(&attr.value)?);
                    }
                    results.push(attrs);
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OpcError::XmlError(format!("XML parse error: {}", e))),
            _ => {},
        }
        buf.clear();
    }

    Ok(results)
}

/// Decode and unescape a raw attribute value.
pub(crate) fn attr_value(raw: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(raw)?;
    quick_xml::escape::unescape(text)
        .map(|value| value.into_owned())
        .map_err(|e| OpcError::XmlError(e.to_string()))
}

/// Factory for creating Part instances based on content type.
pub struct PartFactory;

impl PartFactory {
    /// Load a part from raw data, selecting XmlPart or BlobPart by content type.
    pub fn load(partname: PackURI, content_type: String, blob: Vec<u8>) -> Result<Box<dyn Part>> {
        if Self::is_xml_content_type(&content_type) {
            Ok(Box::new(XmlPart::load(partname, content_type, blob)?))
        } else {
            Ok(Box::new(BlobPart::new(partname, content_type, blob)))
        }
    }

    /// Check if a content type represents XML content.
    #[inline]
    fn is_xml_content_type(content_type: &str) -> bool {
        content_type.ends_with("+xml") || content_type.ends_with("/xml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};

    #[test]
    fn test_blob_part() {
        let partname = PackURI::new("/ppt/media/image1.png").unwrap();
        let content = vec![0x89, 0x50, 0x4E, 0x47];
        let mut part = BlobPart::new(partname, ct::PNG.to_string(), content.clone());

        assert_eq!(part.content_type(), "image/png");
        assert_eq!(part.blob(), content.as_slice());

        part.set_blob(vec![1, 2, 3]);
        assert_eq!(part.blob(), &[1, 2, 3]);
    }

    #[test]
    fn test_find_elements_with_attrs() {
        let partname = PackURI::new("/ppt/presentation.xml").unwrap();
        let xml = br#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldIdLst><p:sldId id="256" r:id="rId2"/><p:sldId id="257" r:id="rId3"/></p:sldIdLst></p:presentation>"#;
        let part = XmlPart::load(partname, ct::PML_PRESENTATION_MAIN.to_string(), xml.to_vec()).unwrap();

        let ids = part.find_elements_with_attrs("sldId").unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0]["id"], "256");
        assert_eq!(ids[1]["r:id"], "rId3");
    }

    #[test]
    fn test_attr_value_rejects_invalid_utf8() {
        let err = attr_value(&[b'r', b'I', b'd', 0xFF]).unwrap_err();
        assert!(matches!(err, OpcError::XmlError(_)));

        assert_eq!(attr_value(b"a &amp; b").unwrap(), "a & b");
    }

    #[test]
    fn test_relate_to_and_resolve() {
        let partname = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        let xml = br#"<p:sld><a:blip r:embed="rId2"/></p:sld>"#.to_vec();
        let mut part = XmlPart::new(partname, ct::PML_SLIDE.to_string(), xml);

        let layout = PackURI::new("/ppt/slideLayouts/slideLayout2.xml").unwrap();
        let image = PackURI::new("/ppt/media/image1.png").unwrap();
        assert_eq!(part.relate_to(&layout, rt::SLIDE_LAYOUT), "rId1");
        assert_eq!(part.relate_to(&image, rt::IMAGE), "rId2");

        assert_eq!(part.related_partname("rId2").unwrap(), image);
        assert!(part.related_partname("rId9").is_err());
    }

    #[test]
    fn test_is_xml_content_type() {
        assert!(PartFactory::is_xml_content_type(ct::XML));
        assert!(PartFactory::is_xml_content_type(ct::PML_SLIDE));
        assert!(!PartFactory::is_xml_content_type(ct::JPEG));
    }

    #[test]
    fn test_attr_value_unescapes() {
        assert_eq!(attr_value(b"Tom &amp; Jerry").unwrap(), "Tom & Jerry");
    }
}
