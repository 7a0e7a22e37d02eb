//! Conversion driver: one extractor, one serializer, one file per record.

use std::path::{Path, PathBuf};

use tracing::{debug, info, trace, warn};

use crate::extract::{ParseMode, read_records};
use crate::write::write_file;
use crate::{CdlError, CdlResult, ColorCorrectionRecord, Format};

/// Options for a conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// How CC, CCC and CDL sources are read.
    pub mode: ParseMode,
}

/// Outcome of converting one source file.
#[derive(Debug, Default)]
pub struct ConversionReport {
    /// Files written, in record order.
    pub written: Vec<PathBuf>,
    /// Records whose file could not be written, with the reason.
    pub failed: Vec<(String, CdlError)>,
}

impl ConversionReport {
    /// True when every record was written.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of records processed.
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }
}

/// Writes each record to `output_dir` as `target`.
///
/// Every record is attempted; a failed write does not stop later records
/// and does not remove files already written.
pub fn write_records(
    records: &[ColorCorrectionRecord],
    output_dir: &Path,
    target: Format,
) -> ConversionReport {
    let mut report = ConversionReport::default();
    for record in records {
        match write_file(output_dir, record, target) {
            Ok(path) => report.written.push(path),
            Err(e) => {
                warn!(id = %record.id, error = %e, "failed to write {}", target);
                report.failed.push((record.id.clone(), e));
            }
        }
    }
    report
}

/// Converts `input` from `source` to `target`, writing into `output_dir`.
///
/// Extraction is all-or-nothing: nothing is written unless every record
/// was extracted. A single-record source returns its write error directly;
/// multi-record sources (EDL, strict collections) report failures per
/// record in the returned [`ConversionReport`].
pub fn convert_file(
    input: &Path,
    output_dir: &Path,
    source: Format,
    target: Format,
    options: ConvertOptions,
) -> CdlResult<ConversionReport> {
    trace!(input = %input.display(), output = %output_dir.display(), %source, %target, "convert::convert_file");

    source.check_target(target)?;

    let records = read_records(input, source, options.mode)?;
    debug!(count = records.len(), "records extracted");

    let mut report = write_records(&records, output_dir, target);
    if records.len() == 1 {
        if let Some((_, err)) = report.failed.pop() {
            return Err(err);
        }
    }

    info!(
        input = %input.display(),
        written = report.written.len(),
        failed = report.failed.len(),
        "converted {} -> {}",
        source,
        target
    );
    Ok(report)
}

/// [`convert_file`] with format names instead of [`Format`] values.
///
/// Names are case-insensitive; an unknown name is echoed in the error.
pub fn convert_named(
    input: &Path,
    output_dir: &Path,
    source: &str,
    target: &str,
    options: ConvertOptions,
) -> CdlResult<ConversionReport> {
    let source: Format = source.parse()?;
    let target: Format = target.parse()?;
    convert_file(input, output_dir, source, target, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts() {
        let mut report = ConversionReport::default();
        assert!(report.is_success());
        report.written.push(PathBuf::from("a.cc"));
        report.failed.push(("b".into(), CdlError::InvalidId("b/".into())));
        assert!(!report.is_success());
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn rejects_same_format_before_reading() {
        // The input does not exist; the pair check must fail first.
        let err = convert_file(
            Path::new("/nonexistent/in.cc"),
            Path::new("/nonexistent"),
            Format::Cc,
            Format::Cc,
            ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CdlError::UnsupportedFormat(ref t) if t == "cc"));
    }

    #[test]
    fn unknown_names_are_echoed() {
        let err = convert_named(
            Path::new("in.cc"),
            Path::new("."),
            "cc",
            "xyz",
            ConvertOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "unsupported format 'xyz'");
    }
}
