//! Color corrections embedded in EDL comment tags.
//!
//! ```text
//! 001  A001C003 V     C        01:00:00:00 01:00:04:00 00:00:00:00 00:00:04:00
//! *ASC_SOP (1.05 1.0 0.98)(0.01 0.0 -0.01)(1.0 1.0 1.1)
//! *ASC_SAT 0.9
//! *SOURCE FILE: A001C003_220101.mov
//! ```
//!
//! Tags are collected into three independent sequences in scan order and
//! then paired by position: the i-th `*ASC_SOP`, `*ASC_SAT` and
//! `*SOURCE FILE:` lines describe clip i. Event numbers and timecodes are
//! not consulted.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::record::parse_scalar;
use crate::{CdlError, CdlResult, ColorCorrectionRecord};

const SOP_TAG: &str = "*ASC_SOP";
const SAT_TAG: &str = "*ASC_SAT";
const SOURCE_TAG: &str = "*SOURCE FILE:";

/// One `(R G B)` group.
static SOP_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    const NUM: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";
    Regex::new(&format!(r"\(\s*({NUM})\s+({NUM})\s+({NUM})\s*\)")).unwrap()
});

static SAT_VALUE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*ASC_SAT\s+(\S+)").unwrap());

static SOURCE_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*SOURCE FILE:\s*(.*?)\s*$").unwrap());

/// Slope, offset and power of one `*ASC_SOP` line.
type Sop = ([f64; 3], [f64; 3], [f64; 3]);

fn parse_sop(line_no: usize, line: &str) -> CdlResult<Sop> {
    let payload = line.split_once(SOP_TAG).map(|(_, rest)| rest).unwrap_or(line);
    let mut groups = [[0.0; 3]; 3];
    let mut found = 0;
    for caps in SOP_GROUP.captures_iter(payload).take(3) {
        for (c, slot) in groups[found].iter_mut().enumerate() {
            *slot = parse_scalar(SOP_TAG, &caps[c + 1])?;
        }
        found += 1;
    }
    if found < 3 {
        return Err(CdlError::MissingField(format!(
            "line {line_no}: {SOP_TAG} needs (slope)(offset)(power) triples, found {found}"
        )));
    }
    Ok((groups[0], groups[1], groups[2]))
}

fn parse_sat(line_no: usize, line: &str) -> CdlResult<f64> {
    let token = SAT_VALUE
        .captures(line)
        .and_then(|c| c.get(1))
        .ok_or_else(|| {
            CdlError::MissingField(format!("line {line_no}: {SAT_TAG} has no value"))
        })?;
    parse_scalar(SAT_TAG, token.as_str())
}

fn parse_source(line_no: usize, line: &str) -> CdlResult<String> {
    let name = SOURCE_FILE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            CdlError::MissingField(format!("line {line_no}: {SOURCE_TAG} has no file name"))
        })?;
    Ok(strip_extension(name).to_string())
}

/// Drops the media extension from a clip file name.
///
/// A leading dot is not an extension, and dots in directory names are kept.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) => {
            let stem = &name[..dot];
            let is_ext = !name[dot..].contains(['/', '\\'])
                && !stem.is_empty()
                && !stem.ends_with(['/', '\\']);
            if is_ext { stem } else { name }
        }
        None => name,
    }
}

/// Extracts one record per graded clip, in file order.
///
/// `text` must already have normalized line endings.
pub(crate) fn extract(text: &str) -> CdlResult<Vec<ColorCorrectionRecord>> {
    trace!(len = text.len(), "edl::extract");

    let mut sops = Vec::new();
    let mut sats = Vec::new();
    let mut names = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.contains(SOP_TAG) {
            sops.push(parse_sop(line_no, line)?);
        }
        if line.contains(SAT_TAG) {
            sats.push(parse_sat(line_no, line)?);
        }
        if line.contains(SOURCE_TAG) {
            names.push(parse_source(line_no, line)?);
        }
    }

    debug!(sop = sops.len(), sat = sats.len(), source = names.len(), "EDL tags collected");

    if sops.len() != sats.len() || sops.len() != names.len() {
        return Err(CdlError::MissingField(format!(
            "EDL tags do not pair up: {} {SOP_TAG}, {} {SAT_TAG}, {} {SOURCE_TAG}",
            sops.len(),
            sats.len(),
            names.len()
        )));
    }
    if sops.is_empty() {
        return Err(CdlError::MissingField(format!(
            "EDL contains no {SOP_TAG}/{SAT_TAG}/{SOURCE_TAG} entries"
        )));
    }

    Ok(sops
        .into_iter()
        .zip(sats)
        .zip(names)
        .map(|(((slope, offset, power), saturation), id)| ColorCorrectionRecord {
            id,
            slope,
            offset,
            power,
            saturation,
        })
        .collect())
}
