//! Canonical color correction record and its numeric text forms.

use std::fmt;

use crate::{CdlError, CdlResult};

/// A single ASC color correction, independent of the file it came from.
///
/// Every extractor produces these and every serializer consumes them.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCorrectionRecord {
    /// Identifier. Also the base name of any file written for this record.
    pub id: String,
    /// Slope (multiply) per channel [R, G, B].
    pub slope: [f64; 3],
    /// Offset (add) per channel [R, G, B].
    pub offset: [f64; 3],
    /// Power (exponent) per channel [R, G, B].
    pub power: [f64; 3],
    /// Saturation (1.0 = no change).
    pub saturation: f64,
}

impl Default for ColorCorrectionRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            slope: [1.0, 1.0, 1.0],
            offset: [0.0, 0.0, 0.0],
            power: [1.0, 1.0, 1.0],
            saturation: 1.0,
        }
    }
}

impl ColorCorrectionRecord {
    /// Creates a record from all of its parts.
    pub fn new(
        id: impl Into<String>,
        slope: [f64; 3],
        offset: [f64; 3],
        power: [f64; 3],
        saturation: f64,
    ) -> Self {
        Self { id: id.into(), slope, offset, power, saturation }
    }

    /// Identity grade with the given id.
    pub fn identity(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }
}

impl fmt::Display for ColorCorrectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: slope ({}) offset ({}) power ({}) sat {}",
            self.id,
            format_rgb(&self.slope),
            format_rgb(&self.offset),
            format_rgb(&self.power),
            format_number(self.saturation),
        )
    }
}

// ============================================================================
// Text forms
// ============================================================================

/// Renders a number in its natural decimal form.
///
/// Shortest text that parses back to the same value, always with a
/// fractional part: `1.0`, `0.25`, `-0.0`.
pub fn format_number(v: f64) -> String {
    let s = v.to_string();
    if v.is_finite() && !s.contains(['.', 'e', 'E']) {
        format!("{s}.0")
    } else {
        s
    }
}

/// Renders a triple as space-separated numbers.
pub fn format_rgb(v: &[f64; 3]) -> String {
    v.iter().map(|c| format_number(*c)).collect::<Vec<_>>().join(" ")
}

/// Parses a whitespace-separated triple.
pub fn parse_rgb(field: &str, s: &str) -> CdlResult<[f64; 3]> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(CdlError::Parse(format!(
            "{field}: expected 3 values, got {} in '{}'",
            parts.len(),
            s.trim()
        )));
    }
    Ok([
        parse_component(field, "R", parts[0])?,
        parse_component(field, "G", parts[1])?,
        parse_component(field, "B", parts[2])?,
    ])
}

/// Parses a single number.
pub fn parse_scalar(field: &str, s: &str) -> CdlResult<f64> {
    let s = s.trim();
    s.parse()
        .map_err(|e| CdlError::Parse(format!("{field}: invalid value '{s}': {e}")))
}

fn parse_component(field: &str, channel: &str, s: &str) -> CdlResult<f64> {
    s.parse()
        .map_err(|e| CdlError::Parse(format!("{field}: invalid {channel} '{s}': {e}")))
}
