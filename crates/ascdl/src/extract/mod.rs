//! Record extraction from EDL, CC, CCC and CDL text.
//!
//! # Strategies
//!
//! - [`ParseMode::Tolerant`] (default) - pattern search for each field.
//!   Survives malformed markup; CC/CCC/CDL always yield one record.
//! - [`ParseMode::Strict`] - well-formed XML walk; collections yield one
//!   record per ColorCorrection.
//!
//! EDL input is always line-scanned and yields one record per graded clip.
//!
//! # Example
//!
//! ```rust
//! use ascdl::{extract, Format, ParseMode};
//!
//! let text = r#"<ColorCorrection id="shot01"><SOPNode><Slope>1.0 1.0 1.0</Slope>
//! <Offset>0.0 0.0 0.0</Offset><Power>1.0 1.0 1.0</Power></SOPNode>
//! <SatNode><Saturation>1.0</Saturation></SatNode></ColorCorrection>"#;
//!
//! let records = extract(text, Format::Cc, ParseMode::Tolerant).unwrap();
//! assert_eq!(records[0].id, "shot01");
//! ```

mod edl;
mod scan;
mod strict;

pub use edl::strip_extension;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{CdlResult, ColorCorrectionRecord, Format};

/// How CC, CCC and CDL documents are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Pattern search; first match of each field wins.
    #[default]
    Tolerant,
    /// Well-formed XML walk over every ColorCorrection.
    Strict,
}

/// Converts `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Extracts records from document text.
///
/// Returns at least one record, or an error; never a partial record.
pub fn extract(
    text: &str,
    format: Format,
    mode: ParseMode,
) -> CdlResult<Vec<ColorCorrectionRecord>> {
    let text = normalize_line_endings(text);
    let records = match (format, mode) {
        (Format::Edl, _) => edl::extract(&text)?,
        (_, ParseMode::Tolerant) => vec![scan::extract(&text, format)?],
        (_, ParseMode::Strict) => strict::extract(&text, format)?,
    };
    debug!(%format, ?mode, count = records.len(), "extracted records");
    Ok(records)
}

/// Reads a whole file and extracts its records.
pub fn read_records<P: AsRef<Path>>(
    path: P,
    format: Format,
    mode: ParseMode,
) -> CdlResult<Vec<ColorCorrectionRecord>> {
    let text = fs::read_to_string(path.as_ref())?;
    extract(&text, format, mode)
}
