//! File format identification.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::{CdlError, CdlResult};

/// One of the four representations of an ASC CDL grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Edit Decision List with `*ASC_SOP` / `*ASC_SAT` comment tags.
    Edl,
    /// Single ColorCorrection (`.cc`).
    Cc,
    /// ColorCorrectionCollection (`.ccc`).
    Ccc,
    /// ColorDecisionList (`.cdl`).
    Cdl,
}

impl Format {
    /// All formats, sources first.
    pub const ALL: [Format; 4] = [Format::Edl, Format::Cc, Format::Ccc, Format::Cdl];

    /// Lowercase token and file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Edl => "edl",
            Format::Cc => "cc",
            Format::Ccc => "ccc",
            Format::Cdl => "cdl",
        }
    }

    /// Detects the format from a file extension (case-insensitive).
    pub fn from_path<P: AsRef<Path>>(path: P) -> CdlResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse()
    }

    /// Whether files of this format can be written.
    pub fn is_writable(self) -> bool {
        !matches!(self, Format::Edl)
    }

    /// Target used when the caller names none.
    ///
    /// EDL has no default; its target must be given explicitly.
    pub fn default_target(self) -> Option<Format> {
        match self {
            Format::Cc | Format::Ccc => Some(Format::Cdl),
            Format::Cdl => Some(Format::Cc),
            Format::Edl => None,
        }
    }

    /// Checks that `target` can be produced from `self`.
    ///
    /// EDL cannot be written, and converting a format to itself is rejected.
    pub fn check_target(self, target: Format) -> CdlResult<()> {
        if !target.is_writable() || target == self {
            return Err(CdlError::UnsupportedFormat(target.to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = CdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().trim_start_matches('.').to_lowercase();
        Format::ALL
            .into_iter()
            .find(|f| f.extension() == token)
            .ok_or_else(|| CdlError::UnsupportedFormat(s.to_string()))
    }
}
