//! Tolerant tag scanner for `.cc`, `.ccc` and `.cdl` text.
//!
//! Looks for each field with a pattern search anywhere in the document
//! instead of parsing XML, so broken or namespace-prefixed markup is fine
//! as long as every field can be found. The first match of each pattern
//! wins; later ColorCorrections in a collection are ignored.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::record::{parse_rgb, parse_scalar};
use crate::{CdlError, CdlResult, ColorCorrectionRecord, Format};

struct Patterns {
    /// Any `id="..."` attribute.
    id_attr: Regex,
    /// `id` attribute on a ColorCorrection tag.
    correction_id: Regex,
    description: Regex,
    slope: Regex,
    offset: Regex,
    power: Regex,
    saturation: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            id_attr: Regex::new(r#"\bid\s*=\s*"([^"]*)""#).unwrap(),
            correction_id: Regex::new(
                r#"<(?:[\w.-]+:)?ColorCorrection\b[^>]*?\bid\s*=\s*"([^"]*)""#,
            )
            .unwrap(),
            description: element("Description"),
            slope: element("Slope"),
            offset: element("Offset"),
            power: element("Power"),
            saturation: element("Saturation"),
        }
    }
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(Patterns::new);

/// Content of `<name>...</name>`, with an optional namespace prefix on either tag.
fn element(name: &str) -> Regex {
    Regex::new(&format!(
        r"(?s)<(?:[\w.-]+:)?{name}\s*>(.*?)</(?:[\w.-]+:)?{name}\s*>"
    ))
    .unwrap()
}

fn first_capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Resolves XML entities in captured text, keeping the raw text if it does not unescape.
pub(crate) fn unescape_text(raw: &str) -> String {
    let raw = raw.trim();
    quick_xml::escape::unescape(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn id_label(format: Format) -> &'static str {
    match format {
        Format::Cc => "id attribute",
        Format::Ccc => "ColorCorrection id",
        Format::Cdl | Format::Edl => "Description",
    }
}

/// Extracts the first color correction from CC, CCC or CDL text.
pub(crate) fn extract(text: &str, format: Format) -> CdlResult<ColorCorrectionRecord> {
    trace!(%format, len = text.len(), "scan::extract");

    let p = &*PATTERNS;
    let id_pattern = match format {
        Format::Cc => &p.id_attr,
        Format::Ccc => &p.correction_id,
        Format::Cdl => &p.description,
        Format::Edl => return Err(CdlError::UnsupportedFormat(format.to_string())),
    };

    let id = first_capture(id_pattern, text)
        .map(unescape_text)
        .filter(|id| !id.is_empty());
    let slope = first_capture(&p.slope, text);
    let offset = first_capture(&p.offset, text);
    let power = first_capture(&p.power, text);
    let saturation = first_capture(&p.saturation, text);

    let (Some(id), Some(slope), Some(offset), Some(power), Some(saturation)) =
        (id, slope, offset, power, saturation)
    else {
        return Err(CdlError::MissingField(format!(
            "expected {}, Slope, Offset, Power and Saturation in {} input",
            id_label(format),
            format
        )));
    };

    Ok(ColorCorrectionRecord {
        id,
        slope: parse_rgb("Slope", slope)?,
        offset: parse_rgb("Offset", offset)?,
        power: parse_rgb("Power", power)?,
        saturation: parse_scalar("Saturation", saturation)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CC_SAMPLE: &str = r#"<ColorCorrection id="shot01"><SOPNode><Slope>1.0 1.0 1.0</Slope><Offset>0.0 0.0 0.0</Offset><Power>1.0 1.0 1.0</Power></SOPNode><SatNode><Saturation>1.0</Saturation></SatNode></ColorCorrection>"#;

    const CCC_SAMPLE: &str = r#"<ColorCorrectionCollection xmlns="urn:ASC:CDL:v1.01">
  <ColorCorrection id="cc0001">
    <SOPNode>
      <Slope>1.0 1.0 0.9</Slope>
      <Offset>-0.03 -0.02 0</Offset>
      <Power>1.25 1 1</Power>
    </SOPNode>
    <SatNode>
      <Saturation>1.7</Saturation>
    </SatNode>
  </ColorCorrection>
  <ColorCorrection id="cc0002">
    <SOPNode>
      <Slope>0.9 0.7 0.6</Slope>
      <Offset>0.1 0.1 0.1</Offset>
      <Power>0.9 0.9 0.9</Power>
    </SOPNode>
    <SatNode>
      <Saturation>0.7</Saturation>
    </SatNode>
  </ColorCorrection>
</ColorCorrectionCollection>"#;

    const CDL_SAMPLE: &str = r#"<ColorDecisionList xmlns="urn:ASC:CDL:v1.01">
  <ColorDecision>
    <ColorCorrection>
      <SOPNode>
        <Description>A001C003_220101</Description>
        <Slope>1.1 1.0 0.9</Slope>
        <Offset>0.0 0.01 0.0</Offset>
        <Power>1.0 1.0 1.0</Power>
      </SOPNode>
      <SatNode>
        <Saturation>1.2</Saturation>
      </SatNode>
    </ColorCorrection>
  </ColorDecision>
</ColorDecisionList>"#;

    #[test]
    fn scan_cc() {
        let r = extract(CC_SAMPLE, Format::Cc).unwrap();
        assert_eq!(r, ColorCorrectionRecord::identity("shot01"));
    }

    #[test]
    fn scan_ccc_takes_first_entry() {
        let r = extract(CCC_SAMPLE, Format::Ccc).unwrap();
        assert_eq!(r.id, "cc0001");
        assert_eq!(r.slope, [1.0, 1.0, 0.9]);
        assert_eq!(r.offset, [-0.03, -0.02, 0.0]);
        assert_eq!(r.power, [1.25, 1.0, 1.0]);
        assert_eq!(r.saturation, 1.7);
    }

    #[test]
    fn ccc_id_ignores_collection_attributes() {
        let text = r#"<ColorCorrectionCollection id="reel" xmlns="urn:ASC:CDL:v1.01">
<ColorCorrection id="inner"><SOPNode><Slope>1 1 1</Slope><Offset>0 0 0</Offset>
<Power>1 1 1</Power></SOPNode><SatNode><Saturation>1</Saturation></SatNode></ColorCorrection>
</ColorCorrectionCollection>"#;
        assert_eq!(extract(text, Format::Ccc).unwrap().id, "inner");
    }

    #[test]
    fn scan_cdl_uses_description() {
        let r = extract(CDL_SAMPLE, Format::Cdl).unwrap();
        assert_eq!(r.id, "A001C003_220101");
        assert_eq!(r.slope, [1.1, 1.0, 0.9]);
        assert_eq!(r.offset, [0.0, 0.01, 0.0]);
        assert_eq!(r.saturation, 1.2);
    }

    #[test]
    fn tolerates_malformed_markup() {
        // Unclosed SOPNode, no root end tag, fields out of order.
        let text = r#"<ColorCorrection id="broken" <SatNode><Saturation> 0.8 </Saturation>
<SOPNode><Power>1 1 1</Power>
<Slope>
  1.2 1.1 1.0
</Slope><Offset>0 0 0</Offset>"#;
        let r = extract(text, Format::Cc).unwrap();
        assert_eq!(r.id, "broken");
        assert_eq!(r.slope, [1.2, 1.1, 1.0]);
        assert_eq!(r.saturation, 0.8);
    }

    #[test]
    fn tolerates_namespace_prefixes() {
        let text = r#"<cdl:ColorCorrection id="ns" xmlns:cdl="urn:ASC:CDL:v1.2">
<cdl:SOPNode><cdl:Slope>2 2 2</cdl:Slope><cdl:Offset>0.1 0.1 0.1</cdl:Offset>
<cdl:Power>1 1 1</cdl:Power></cdl:SOPNode>
<cdl:SatNode><cdl:Saturation>0.5</cdl:Saturation></cdl:SatNode></cdl:ColorCorrection>"#;
        let r = extract(text, Format::Cc).unwrap();
        assert_eq!(r.id, "ns");
        assert_eq!(r.slope, [2.0, 2.0, 2.0]);
        assert_eq!(r.saturation, 0.5);
    }

    #[test]
    fn missing_power_is_missing_field() {
        let text = CC_SAMPLE.replace("<Power>1.0 1.0 1.0</Power>", "");
        let err = extract(&text, Format::Cc).unwrap_err();
        assert!(matches!(err, CdlError::MissingField(_)));
        assert!(err.to_string().starts_with("unable to extract required elements"));
    }

    #[test]
    fn empty_id_is_missing_field() {
        let text = CC_SAMPLE.replace(r#"id="shot01""#, r#"id="""#);
        assert!(matches!(extract(&text, Format::Cc), Err(CdlError::MissingField(_))));
    }

    #[test]
    fn bad_numbers_are_parse_errors() {
        let text = CC_SAMPLE.replace("<Slope>1.0 1.0 1.0</Slope>", "<Slope>1.0 1.0</Slope>");
        assert!(matches!(extract(&text, Format::Cc), Err(CdlError::Parse(_))));
    }

    #[test]
    fn entities_in_id_are_resolved() {
        let text = CC_SAMPLE.replace("shot01", "R&amp;D");
        assert_eq!(extract(&text, Format::Cc).unwrap().id, "R&D");
    }
}
