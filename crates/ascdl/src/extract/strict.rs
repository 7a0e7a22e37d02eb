//! Strict XML walk over `.cc`, `.ccc` and `.cdl` documents.
//!
//! Unlike the tag scanner this requires well-formed XML, and it returns
//! every ColorCorrection in a collection or decision list rather than only
//! the first. Element names are matched on their local part, so
//! namespace prefixes are ignored.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use tracing::trace;

use super::scan::unescape_text;
use crate::record::{parse_rgb, parse_scalar};
use crate::{CdlError, CdlResult, ColorCorrectionRecord, Format};

/// Fields of one ColorCorrection as they are encountered.
#[derive(Default)]
struct Partial {
    id: Option<String>,
    description: Option<String>,
    slope: Option<[f64; 3]>,
    offset: Option<[f64; 3]>,
    power: Option<[f64; 3]>,
    saturation: Option<f64>,
}

impl Partial {
    fn finish(self, format: Format, index: usize) -> CdlResult<ColorCorrectionRecord> {
        // CDL names a correction by its Description; the id attribute is a fallback.
        let id = match format {
            Format::Cdl => self.description.or(self.id),
            _ => self.id,
        }
        .filter(|id| !id.is_empty());

        match (id, self.slope, self.offset, self.power, self.saturation) {
            (Some(id), Some(slope), Some(offset), Some(power), Some(saturation)) => {
                Ok(ColorCorrectionRecord { id, slope, offset, power, saturation })
            }
            _ => Err(CdlError::MissingField(format!(
                "ColorCorrection #{} in {} input needs an id, Slope, Offset, Power and Saturation",
                index + 1,
                format
            ))),
        }
    }
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).to_string()
}

fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .map(|a| unescape_text(&String::from_utf8_lossy(&a.value)))
        .filter(|s| !s.is_empty())
}

/// Appends the text an entity or character reference stands for.
///
/// Unknown named entities are kept verbatim.
fn push_reference(content: &mut String, e: &BytesRef) -> CdlResult<()> {
    if let Some(ch) = e.resolve_char_ref()? {
        content.push(ch);
        return Ok(());
    }
    let name = e.decode().map_err(quick_xml::Error::from)?;
    match resolve_predefined_entity(&name) {
        Some(value) => content.push_str(value),
        None => {
            content.push('&');
            content.push_str(&name);
            content.push(';');
        }
    }
    Ok(())
}

/// Parses every ColorCorrection in the document, in document order.
///
/// A `.cc` yields exactly one record; extra elements are ignored.
pub(crate) fn extract(text: &str, format: Format) -> CdlResult<Vec<ColorCorrectionRecord>> {
    trace!(%format, len = text.len(), "strict::extract");

    if format == Format::Edl {
        return Err(CdlError::UnsupportedFormat(format.to_string()));
    }

    // Text arrives split around references, so it is trimmed once per element.
    let mut xml = Reader::from_str(text);

    let mut records = Vec::new();
    let mut current: Option<Partial> = None;
    let mut content = String::new();

    loop {
        match xml.read_event()? {
            Event::Start(e) => {
                if local_name(&e) == "ColorCorrection" {
                    current = Some(Partial { id: get_attr(&e, b"id"), ..Default::default() });
                }
                content.clear();
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "ColorCorrection" {
                    if let Some(done) = current.take() {
                        records.push(done.finish(format, records.len())?);
                    }
                } else if let Some(cc) = current.as_mut() {
                    let content = content.trim();
                    match name.as_str() {
                        "Slope" => cc.slope = Some(parse_rgb("Slope", content)?),
                        "Offset" => cc.offset = Some(parse_rgb("Offset", content)?),
                        "Power" => cc.power = Some(parse_rgb("Power", content)?),
                        "Saturation" => {
                            cc.saturation = Some(parse_scalar("Saturation", content)?);
                        }
                        "Description" if cc.description.is_none() => {
                            cc.description = Some(content.to_string());
                        }
                        _ => {}
                    }
                }
                content.clear();
            }
            Event::Text(e) => {
                content.push_str(&e.decode().map_err(quick_xml::Error::from)?);
            }
            Event::GeneralRef(e) => push_reference(&mut content, &e)?,
            Event::Eof => break,
            _ => {}
        }
        if format == Format::Cc && !records.is_empty() {
            break;
        }
    }

    if records.is_empty() {
        return Err(CdlError::MissingField(format!(
            "no complete ColorCorrection element in {format} input"
        )));
    }
    Ok(records)
}
