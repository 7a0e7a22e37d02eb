//! # ascdl
//!
//! Conversion between the four representations of an ASC CDL grade.
//!
//! # Formats
//!
//! - `.edl` - Edit Decision List with `*ASC_SOP` / `*ASC_SAT` / `*SOURCE FILE:` tags
//! - `.cc` - single ColorCorrection
//! - `.ccc` - ColorCorrectionCollection
//! - `.cdl` - ColorDecisionList
//!
//! Every source is read into [`ColorCorrectionRecord`]s (one per graded
//! clip for EDL, one per file otherwise) and every record is written as
//! its own `.cc`, `.ccc` or `.cdl` file named after the record id.
//!
//! # Usage
//!
//! ```rust,no_run
//! use ascdl::{convert_file, ConvertOptions, Format};
//! use std::path::Path;
//!
//! let report = convert_file(
//!     Path::new("reel1.edl"),
//!     Path::new("grades"),
//!     Format::Edl,
//!     Format::Cdl,
//!     ConvertOptions::default(),
//! ).unwrap();
//! for path in &report.written {
//!     println!("{}", path.display());
//! }
//! ```
//!
//! # Modules
//!
//! - [`extract`] - tolerant and strict record extraction
//! - [`write`] - XML serializers
//! - [`annotate`] - EDL clip-name annotation
//! - [`convert`] - conversion driver
//!
//! # Dependencies
//!
//! - [`regex`] - tolerant tag scanning and EDL tag parsing
//! - [`quick_xml`] - strict parsing and XML output
//! - [`thiserror`] - error handling
//! - [`tracing`] - diagnostics

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod format;
mod record;
pub mod annotate;
pub mod convert;
pub mod extract;
pub mod write;

pub use error::{CdlError, CdlResult};
pub use format::Format;
pub use record::{ColorCorrectionRecord, format_number, format_rgb, parse_rgb, parse_scalar};
pub use extract::{ParseMode, extract, normalize_line_endings, read_records};
pub use write::{render, write_file, write_to};
pub use annotate::{annotate_edl, annotate_file};
pub use convert::{ConversionReport, ConvertOptions, convert_file, convert_named, write_records};
