//! CDL conversion error types.

use thiserror::Error;

/// Result type for CDL operations.
pub type CdlResult<T> = Result<T, CdlError>;

/// Errors that can occur while extracting, rendering or writing color corrections.
#[derive(Debug, Error)]
pub enum CdlError {
    /// One or more required elements could not be located in the source.
    ///
    /// The message lists what was expected, not which element was absent.
    #[error("unable to extract required elements: {0}")]
    MissingField(String),

    /// Unknown format token, or a (source, target) pair that is not supported.
    #[error("unsupported format '{0}'")]
    UnsupportedFormat(String),

    /// A located field does not hold the expected number(s).
    #[error("parse error: {0}")]
    Parse(String),

    /// A record id that cannot be used as an output file name.
    #[error("invalid correction id '{0}': not usable as a file name")]
    InvalidId(String),

    /// Malformed XML in strict mode, or a failure while emitting XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
