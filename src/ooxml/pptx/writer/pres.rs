/// presentation.xml generation and slide list editing.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;
use memchr::memmem;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Write as FmtWrite;
use std::io::Cursor;

/// Id of the first slide master in `sldMasterIdLst`.
const FIRST_MASTER_ID: u32 = 2_147_483_648;

/// Generate presentation.xml for a deck with one slide master and no slides.
pub fn presentation_xml(master_r_id: &str, slide_width: i64, slide_height: i64) -> Result<String> {
    let mut xml = String::with_capacity(1024);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        namespace::DML_MAIN,
        namespace::OFC_RELATIONSHIPS,
        namespace::PML_MAIN
    )
    .map_err(|e| OoxmlError::Xml(e.to_string()))?;

    xml.push_str("<p:sldMasterIdLst>");
    write!(
        xml,
        r#"<p:sldMasterId id="{}" r:id="{}"/>"#,
        FIRST_MASTER_ID, master_r_id
    )
    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str("</p:sldMasterIdLst>");

    write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}"/>"#,
        slide_width, slide_height
    )
    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("<p:defaultTextStyle/>");
    xml.push_str("</p:presentation>");

    Ok(xml)
}

/// Append `<p:sldId id="{slide_id}" r:id="{r_id}"/>` as the last slide of
/// the presentation.
///
/// The element goes at the end of `sldIdLst`; an empty `<p:sldIdLst/>` is
/// expanded, and a missing list is created right after the master id lists.
/// Everything else in the document passes through untouched.
pub fn append_slide_id(xml: &[u8], slide_id: u32, r_id: &str) -> Result<Vec<u8>> {
    let has_list = memmem::find(xml, b"sldIdLst").is_some();

    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Cursor::new(Vec::with_capacity(xml.len() + 96)));
    let mut buf = Vec::new();
    let mut r_prefix: Option<String> = None;
    let mut list_prefix: Option<String> = None;
    let mut depth = 0usize;
    let mut inserted = false;

    loop {
        buf.clear();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;

        // A new list goes before the first root child after the master lists
        if !inserted && !has_list {
            let before_child = match &event {
                Event::Start(e) | Event::Empty(e) => {
                    depth == 1 && !is_master_list(e.local_name().as_ref())
                },
                Event::End(_) => depth == 1,
                _ => false,
            };
            if let Some(prefix) = list_prefix.as_deref().filter(|_| before_child) {
                write_new_list(&mut writer, prefix, r_prefix.as_deref(), slide_id, r_id)?;
                inserted = true;
            }
        }

        match event {
            Event::Start(ref e) => {
                if depth == 0 {
                    r_prefix = relationships_prefix(e)?;
                }
                depth += 1;
                write(&mut writer, Event::Start(e.borrow()))?;
            },
            Event::Empty(ref e) if !inserted && has_list && e.local_name().as_ref() == b"sldIdLst" => {
                let prefix = element_prefix(e.name().as_ref());
                write(&mut writer, Event::Start(e.borrow()))?;
                write(&mut writer, slide_id_event(&prefix, r_prefix.as_deref(), slide_id, r_id))?;
                write(&mut writer, Event::End(e.to_end()))?;
                inserted = true;
            },
            Event::Empty(ref e) => {
                if depth == 1 && is_master_list(e.local_name().as_ref()) {
                    list_prefix = Some(element_prefix(e.name().as_ref()));
                }
                write(&mut writer, Event::Empty(e.borrow()))?;
            },
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                let local = e.local_name();
                if !inserted && has_list && local.as_ref() == b"sldIdLst" {
                    let prefix = element_prefix(e.name().as_ref());
                    write(&mut writer, slide_id_event(&prefix, r_prefix.as_deref(), slide_id, r_id))?;
                    inserted = true;
                } else if depth == 1 && is_master_list(local.as_ref()) {
                    list_prefix = Some(element_prefix(e.name().as_ref()));
                }
                write(&mut writer, Event::End(e.borrow()))?;
            },
            Event::Eof => break,
            other => write(&mut writer, other)?,
        }
    }

    if !inserted {
        return Err(OoxmlError::InvalidFormat(
            "presentation has neither sldIdLst nor sldMasterIdLst".to_string(),
        ));
    }

    Ok(writer.into_inner().into_inner())
}

fn is_master_list(local_name: &[u8]) -> bool {
    matches!(
        local_name,
        b"sldMasterIdLst" | b"notesMasterIdLst" | b"handoutMasterIdLst"
    )
}

fn write_new_list(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    prefix: &str,
    r_prefix: Option<&str>,
    slide_id: u32,
    r_id: &str,
) -> Result<()> {
    let list_name = format!("{}sldIdLst", prefix);
    write(writer, Event::Start(BytesStart::new(list_name.as_str())))?;
    write(writer, slide_id_event(prefix, r_prefix, slide_id, r_id))?;
    write(writer, Event::End(BytesEnd::new(list_name.as_str())))
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| OoxmlError::Xml(format!("Failed to write presentation.xml: {}", e)))
}

/// Build the `sldId` element; declares the relationships namespace on the
/// element itself when the document root does not.
fn slide_id_event(
    prefix: &str,
    r_prefix: Option<&str>,
    slide_id: u32,
    r_id: &str,
) -> Event<'static> {
    let mut elem = BytesStart::new(format!("{}sldId", prefix));
    elem.push_attribute(("id", slide_id.to_string().as_str()));
    match r_prefix {
        Some(r) => elem.push_attribute((format!("{}:id", r).as_str(), r_id)),
        None => {
            elem.push_attribute(("xmlns:r", namespace::OFC_RELATIONSHIPS));
            elem.push_attribute(("r:id", r_id));
        },
    }
    Event::Empty(elem)
}

/// `"p:"` for `p:sldIdLst`, empty for an unprefixed name.
fn element_prefix(qname: &[u8]) -> String {
    match memchr::memchr(b':', qname) {
        Some(pos) => format!("{}:", String::from_utf8_lossy(&qname[..pos])),
        None => String::new(),
    }
}

/// The prefix the root element binds to the relationships namespace.
fn relationships_prefix(root: &BytesStart<'_>) -> Result<Option<String>> {
    for attr in root.attributes() {
        let attr = attr.map_err(|e| OoxmlError::Xml(e.to_string()))?;
        let key = attr.key.as_ref();
        if let Some(prefix) = key.strip_prefix(b"xmlns:") {
            if attr.value.as_ref() == namespace::OFC_RELATIONSHIPS.as_bytes() {
                return Ok(Some(String::from_utf8_lossy(prefix).into_owned()));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::content_type as ct;
    use crate::ooxml::opc::{PackURI, XmlPart};
    use crate::ooxml::pptx::parts::{IdEntry, PresentationPart};

    fn entries(xml: Vec<u8>) -> Vec<IdEntry> {
        let part = XmlPart::new(
            PackURI::new("/ppt/presentation.xml").unwrap(),
            ct::PML_PRESENTATION_MAIN.to_string(),
            xml,
        );
        PresentationPart::from_part(&part).unwrap().slide_ids().unwrap()
    }

    #[test]
    fn test_generated_presentation_has_no_slides() {
        let xml = presentation_xml("rId1", 14_630_400, 8_229_600).unwrap();
        assert!(xml.contains(r#"<p:sldSz cx="14630400" cy="8229600"/>"#));
        assert!(xml.contains(r#"<p:sldMasterId id="2147483648" r:id="rId1"/>"#));
        assert!(!xml.contains("sldIdLst"));
    }

    #[test]
    fn test_append_creates_list_after_masters() {
        let xml = presentation_xml("rId1", 100, 100).unwrap();
        let xml = append_slide_id(xml.as_bytes(), 256, "rId6").unwrap();
        let text = String::from_utf8(xml.clone()).unwrap();

        assert!(text.contains(
            r#"</p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId6"/></p:sldIdLst><p:sldSz"#
        ));
        assert_eq!(entries(xml), vec![IdEntry { id: 256, r_id: "rId6".to_string() }]);
    }

    #[test]
    fn test_append_goes_last() {
        let xml = br#"<?xml version="1.0"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:rel="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <p:sldMasterIdLst><p:sldMasterId id="2147483648" rel:id="rId1"/></p:sldMasterIdLst>
  <p:sldIdLst>
    <p:sldId id="256" rel:id="rId2"/>
  </p:sldIdLst>
  <p:sldSz cx="9144000" cy="6858000"/>
</p:presentation>"#;
        let out = append_slide_id(xml, 257, "rId9").unwrap();
        let text = String::from_utf8(out.clone()).unwrap();

        assert!(text.contains(r#"<p:sldId id="257" rel:id="rId9"/></p:sldIdLst>"#));
        assert!(text.contains(r#"<p:sldSz cx="9144000" cy="6858000"/>"#));
        let ids: Vec<u32> = entries(out).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![256, 257]);
    }

    #[test]
    fn test_append_expands_empty_list() {
        let xml = br#"<p:presentation xmlns:p="p" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldIdLst/></p:presentation>"#;
        let out = String::from_utf8(append_slide_id(xml, 256, "rId3").unwrap()).unwrap();
        assert!(out.contains(r#"<p:sldIdLst><p:sldId id="256" r:id="rId3"/></p:sldIdLst>"#));
    }

    #[test]
    fn test_new_list_follows_notes_master_list() {
        let xml = br#"<p:presentation xmlns:p="p" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:notesMasterIdLst><p:notesMasterId r:id="rId2"/></p:notesMasterIdLst><p:sldSz cx="1" cy="1"/></p:presentation>"#;
        let out = String::from_utf8(append_slide_id(xml, 256, "rId5").unwrap()).unwrap();
        assert!(out.contains(
            r#"</p:notesMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId5"/></p:sldIdLst><p:sldSz"#
        ));
    }

    #[test]
    fn test_append_without_lists_fails() {
        assert!(append_slide_id(br#"<p:presentation xmlns:p="p"/>"#, 256, "rId2").is_err());
    }
}
