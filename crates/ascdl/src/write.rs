//! `.cc`, `.ccc` and `.cdl` writers.
//!
//! Each format is described as a small element tree around the same
//! ColorCorrection body, then emitted by one depth-first writer with two
//! spaces of indent per level:
//!
//! ```text
//! <ColorDecisionList xmlns="urn:ASC:CDL:v1.01">
//!   <ColorDecision>
//!     <ColorCorrection>
//!       <SOPNode>
//!         <Description>shot01</Description>
//!         <Slope>1.0 1.0 1.0</Slope>
//!         <Offset>0.0 0.0 0.0</Offset>
//!         <Power>1.0 1.0 1.0</Power>
//!       </SOPNode>
//!       <SatNode>
//!         <Saturation>1.0</Saturation>
//!       </SatNode>
//!     </ColorCorrection>
//!   </ColorDecision>
//! </ColorDecisionList>
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tracing::{debug, trace};

use crate::record::{format_number, format_rgb};
use crate::{CdlError, CdlResult, ColorCorrectionRecord, Format};

/// Namespace of a standalone `.cc`.
pub const CC_NAMESPACE: &str = "urn:ASC:CDL:v1.2";

/// Namespace of `.ccc` and `.cdl` documents.
pub const COLLECTION_NAMESPACE: &str = "urn:ASC:CDL:v1.01";

/// An element with attributes and either text or children.
#[derive(Debug, Clone)]
struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    fn new(name: &'static str) -> Self {
        Self { name, attrs: Vec::new(), text: None, children: Vec::new() }
    }

    fn leaf(name: &'static str, text: String) -> Self {
        Self { text: Some(text), ..Self::new(name) }
    }

    fn attr(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((key, value.into()));
        self
    }

    fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }
}

/// Where the record id goes in a ColorCorrection.
enum IdPlacement {
    Attribute,
    Description,
}

fn color_correction(record: &ColorCorrectionRecord, placement: IdPlacement) -> Element {
    let mut sop = Element::new("SOPNode");
    let mut cc = Element::new("ColorCorrection");
    match placement {
        IdPlacement::Attribute => cc = cc.attr("id", record.id.as_str()),
        IdPlacement::Description => {
            sop = sop.child(Element::leaf("Description", record.id.clone()));
        }
    }
    let sop = sop
        .child(Element::leaf("Slope", format_rgb(&record.slope)))
        .child(Element::leaf("Offset", format_rgb(&record.offset)))
        .child(Element::leaf("Power", format_rgb(&record.power)));
    let sat = Element::new("SatNode")
        .child(Element::leaf("Saturation", format_number(record.saturation)));
    cc.child(sop).child(sat)
}

fn document(record: &ColorCorrectionRecord, format: Format) -> CdlResult<Element> {
    let root = match format {
        Format::Cc => {
            color_correction(record, IdPlacement::Attribute).attr("xmlns", CC_NAMESPACE)
        }
        Format::Ccc => Element::new("ColorCorrectionCollection")
            .attr("xmlns", COLLECTION_NAMESPACE)
            .child(color_correction(record, IdPlacement::Attribute)),
        Format::Cdl => Element::new("ColorDecisionList")
            .attr("xmlns", COLLECTION_NAMESPACE)
            .child(
                Element::new("ColorDecision")
                    .child(color_correction(record, IdPlacement::Description)),
            ),
        Format::Edl => return Err(CdlError::UnsupportedFormat(format.to_string())),
    };
    Ok(root)
}

fn write_element<W: Write>(xml: &mut Writer<W>, el: &Element) -> CdlResult<()> {
    let mut start = BytesStart::new(el.name);
    for (key, value) in &el.attrs {
        start.push_attribute((*key, value.as_str()));
    }
    xml.write_event(Event::Start(start))?;
    if let Some(text) = &el.text {
        xml.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &el.children {
        write_element(xml, child)?;
    }
    xml.write_event(Event::End(BytesEnd::new(el.name)))?;
    Ok(())
}

fn emit<W: Write>(writer: W, root: &Element) -> CdlResult<()> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    write_element(&mut xml, root)?;
    writeln!(xml.get_mut())?;
    Ok(())
}

/// Writes one record as a `format` document to any writer.
pub fn write_to<W: Write>(writer: W, record: &ColorCorrectionRecord, format: Format) -> CdlResult<()> {
    emit(writer, &document(record, format)?)
}

/// Renders one record as a `format` document.
pub fn render(record: &ColorCorrectionRecord, format: Format) -> CdlResult<String> {
    let mut buf = Vec::new();
    write_to(&mut buf, record, format)?;
    String::from_utf8(buf).map_err(|e| CdlError::Parse(format!("rendered non UTF-8 text: {e}")))
}

/// Path `dir/<id>.<ext>` for a record.
///
/// Ids that would escape `dir` or cannot name a file are rejected.
pub fn output_path(dir: &Path, record: &ColorCorrectionRecord, format: Format) -> CdlResult<PathBuf> {
    let id = record.id.trim();
    let unusable = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '\0']);
    if unusable {
        return Err(CdlError::InvalidId(record.id.clone()));
    }
    Ok(dir.join(format!("{id}.{}", format.extension())))
}

/// Writes one record to `dir/<id>.<ext>`, replacing any existing file.
///
/// `dir` must already exist.
pub fn write_file(dir: &Path, record: &ColorCorrectionRecord, format: Format) -> CdlResult<PathBuf> {
    trace!(dir = %dir.display(), id = %record.id, %format, "write::write_file");
    let path = output_path(dir, record, format)?;
    // An unwritable format must not truncate an existing file.
    let root = document(record, format)?;

    let mut out = BufWriter::new(File::create(&path)?);
    emit(&mut out, &root)?;
    out.flush()?;

    debug!(path = %path.display(), "wrote {}", format);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ColorCorrectionRecord {
        ColorCorrectionRecord::new(
            "shot01",
            [1.1, 1.0, 0.9],
            [0.01, 0.0, -0.02],
            [1.0, 1.2, 1.0],
            0.85,
        )
    }

    #[test]
    fn cc_layout() {
        let text = render(&sample(), Format::Cc).unwrap();
        let expected = r#"<ColorCorrection id="shot01" xmlns="urn:ASC:CDL:v1.2">
  <SOPNode>
    <Slope>1.1 1.0 0.9</Slope>
    <Offset>0.01 0.0 -0.02</Offset>
    <Power>1.0 1.2 1.0</Power>
  </SOPNode>
  <SatNode>
    <Saturation>0.85</Saturation>
  </SatNode>
</ColorCorrection>
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn ccc_layout() {
        let text = render(&sample(), Format::Ccc).unwrap();
        let expected = r#"<ColorCorrectionCollection xmlns="urn:ASC:CDL:v1.01">
  <ColorCorrection id="shot01">
    <SOPNode>
      <Slope>1.1 1.0 0.9</Slope>
      <Offset>0.01 0.0 -0.02</Offset>
      <Power>1.0 1.2 1.0</Power>
    </SOPNode>
    <SatNode>
      <Saturation>0.85</Saturation>
    </SatNode>
  </ColorCorrection>
</ColorCorrectionCollection>
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn cdl_layout() {
        let text = render(&ColorCorrectionRecord::identity("shot01"), Format::Cdl).unwrap();
        let expected = r#"<ColorDecisionList xmlns="urn:ASC:CDL:v1.01">
  <ColorDecision>
    <ColorCorrection>
      <SOPNode>
        <Description>shot01</Description>
        <Slope>1.0 1.0 1.0</Slope>
        <Offset>0.0 0.0 0.0</Offset>
        <Power>1.0 1.0 1.0</Power>
      </SOPNode>
      <SatNode>
        <Saturation>1.0</Saturation>
      </SatNode>
    </ColorCorrection>
  </ColorDecision>
</ColorDecisionList>
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn special_characters_are_escaped() {
        let record = ColorCorrectionRecord::identity("A&B <1>");
        let text = render(&record, Format::Cdl).unwrap();
        assert!(text.contains("<Description>A&amp;B &lt;1&gt;</Description>"));
    }

    #[test]
    fn edl_is_not_a_target() {
        assert!(matches!(
            render(&sample(), Format::Edl),
            Err(CdlError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn output_names() {
        let dir = Path::new("/out");
        let path = output_path(dir, &sample(), Format::Ccc).unwrap();
        assert_eq!(path, Path::new("/out/shot01.ccc"));

        for bad in ["", "  ", "..", "a/b", "a\\b"] {
            let record = ColorCorrectionRecord::identity(bad);
            assert!(matches!(
                output_path(dir, &record, Format::Cc),
                Err(CdlError::InvalidId(_))
            ));
        }
    }
}
