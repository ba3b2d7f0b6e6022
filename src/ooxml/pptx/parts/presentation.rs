/// Presentation part - the main part in a .pptx package.
///
/// Corresponds to `/ppt/presentation.xml` in the package.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::part::Part;
use quick_xml::Reader;
use quick_xml::events::Event;

/// First id PowerPoint assigns to a slide in `sldIdLst`.
pub const MIN_SLIDE_ID: u32 = 256;

/// Slide ids must stay below this value.
pub const MAX_SLIDE_ID: u32 = 2_147_483_648;

/// An entry of `sldIdLst` or `sldMasterIdLst`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdEntry {
    /// Numeric `id` attribute
    pub id: u32,
    /// Relationship id (`r:id`) of the target part
    pub r_id: String,
}

/// The main presentation part.
///
/// # Example
///
/// ```rust,ignore
/// let pres_part = PresentationPart::from_part(opc_part)?;
/// let slide_count = pres_part.slide_count()?;
/// ```
pub struct PresentationPart<'a> {
    /// The underlying OPC part
    part: &'a dyn Part,
}

impl<'a> PresentationPart<'a> {
    /// Create a PresentationPart from an OPC Part.
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    #[inline]
    fn xml_bytes(&self) -> &[u8] {
        self.part.blob()
    }

    /// Get the number of slides in the presentation.
    pub fn slide_count(&self) -> Result<usize> {
        Ok(self.slide_ids()?.len())
    }

    /// Get the slide size `(cx, cy)` in EMUs, if `sldSz` is present.
    pub fn slide_size(&self) -> Result<Option<(i64, i64)>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == b"sldSz" {
                        let mut cx = None;
                        let mut cy = None;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"cx" => cx = Some(parse_emu(&attr.value, "slide width")?),
                                b"cy" => cy = Some(parse_emu(&attr.value, "slide height")?),
                                _ => {},
                            }
                        }
                        return match (cx, cy) {
                            (Some(cx), Some(cy)) => Ok(Some((cx, cy))),
                            _ => Err(OoxmlError::InvalidFormat(
                                "sldSz without cx and cy".to_string(),
                            )),
                        };
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(None)
    }

    /// Get the slide width in EMUs.
    pub fn slide_width(&self) -> Result<Option<i64>> {
        Ok(self.slide_size()?.map(|(cx, _)| cx))
    }

    /// Get the slide height in EMUs.
    pub fn slide_height(&self) -> Result<Option<i64>> {
        Ok(self.slide_size()?.map(|(_, cy)| cy))
    }

    /// Get the `sldIdLst` entries in presentation order.
    pub fn slide_ids(&self) -> Result<Vec<IdEntry>> {
        self.id_entries(b"sldId")
    }

    /// Get the relationship IDs of all slides in presentation order.
    pub fn slide_rids(&self) -> Result<Vec<String>> {
        Ok(self.slide_ids()?.into_iter().map(|entry| entry.r_id).collect())
    }

    /// Get the relationship IDs of all slide masters.
    pub fn slide_master_rids(&self) -> Result<Vec<String>> {
        Ok(self
            .id_entries(b"sldMasterId")?
            .into_iter()
            .map(|entry| entry.r_id)
            .collect())
    }

    /// Id for a slide appended after the existing ones.
    ///
    /// One more than the largest id in use, or the first unused id once the
    /// largest reaches the upper limit.
    pub fn next_slide_id(&self) -> Result<u32> {
        let used: Vec<u32> = self.slide_ids()?.iter().map(|entry| entry.id).collect();

        let next = used
            .iter()
            .copied()
            .max()
            .map_or(MIN_SLIDE_ID, |max| max.saturating_add(1).max(MIN_SLIDE_ID));
        if next < MAX_SLIDE_ID {
            return Ok(next);
        }

        (MIN_SLIDE_ID..MAX_SLIDE_ID)
            .find(|id| !used.contains(id))
            .ok_or_else(|| OoxmlError::InvalidFormat("no free slide id".to_string()))
    }

    /// Collect `id`/`r:id` pairs of every element with local name `element`.
    fn id_entries(&self, element: &[u8]) -> Result<Vec<IdEntry>> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);

        let mut entries = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.local_name().as_ref() == element {
                        let mut id = None;
                        let mut r_id = None;
                        for attr in e.attributes().flatten() {
                            if attr.key.local_name().as_ref() != b"id" {
                                continue;
                            }
                            // The unprefixed `id` is numeric, the prefixed one is the rId
                            if attr.key.prefix().is_some() {
                                r_id = Some(
                                    std::str::from_utf8(&attr.value)
                                        .map_err(|e| OoxmlError::Xml(e.to_string()))?
                                        .to_string(),
                                );
                            } else {
                                id = Some(atoi_simd::parse::<u32, false, false>(&attr.value).map_err(|_| {
                                    OoxmlError::InvalidFormat(format!(
                                        "invalid id '{}'",
                                        String::from_utf8_lossy(&attr.value)
                                    ))
                                })?);
                            }
                        }
                        if let (Some(id), Some(r_id)) = (id, r_id) {
                            entries.push(IdEntry { id, r_id });
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(entries)
    }

    /// Get the underlying OPC part.
    #[inline]
    pub fn part(&self) -> &'a dyn Part {
        self.part
    }
}

fn parse_emu(raw: &[u8], what: &str) -> Result<i64> {
    atoi_simd::parse::<i64, false, false>(raw).map_err(|_| {
        OoxmlError::Xml(format!(
            "Invalid {}: '{}'",
            what,
            String::from_utf8_lossy(raw)
        ))
    })
}
