//! Format conversion command.
//!
//! Extracts every grade from the input and writes each one as its own
//! `.cc`, `.ccc` or `.cdl` file named after the grade id.

use crate::ConvertArgs;
use anyhow::{Context, Result, bail};
use ascdl::{ConvertOptions, convert_file};
use tracing::{info, trace};

/// Runs the convert command.
pub fn run(args: ConvertArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), "convert::run");

    let source = super::source_format(&args.input, args.from.as_deref())?;
    let target = super::target_format(source, args.to.as_deref())?;
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| super::parent_dir(&args.input));
    let options = ConvertOptions { mode: super::parse_mode(args.strict) };

    info!(
        input = %args.input.display(),
        output = %output_dir.display(),
        %source,
        %target,
        mode = ?options.mode,
        "Converting"
    );

    if verbose > 0 {
        println!(
            "Converting {} ({}) -> {} in {}",
            args.input.display(),
            source,
            target,
            output_dir.display()
        );
    }

    let report = convert_file(&args.input, &output_dir, source, target, options)
        .with_context(|| format!("Failed to convert: {}", args.input.display()))?;

    for path in &report.written {
        println!("Wrote {}", path.display());
    }
    for (id, err) in &report.failed {
        eprintln!("Error: {}: {}", id, err);
    }

    if !report.is_success() {
        bail!(
            "{} of {} grades from {} could not be written",
            report.failed.len(),
            report.total(),
            args.input.display()
        );
    }

    if verbose > 0 {
        println!("Done.");
    }

    Ok(())
}
