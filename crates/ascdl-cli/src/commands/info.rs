//! Grade listing command

use crate::InfoArgs;
use anyhow::{Context, Result};
use ascdl::read_records;
use tracing::trace;

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), "info::run");

    let source = super::source_format(&args.input, args.from.as_deref())?;
    let mode = super::parse_mode(args.strict);

    let records = read_records(&args.input, source, mode)
        .with_context(|| format!("Failed to read: {}", args.input.display()))?;

    if verbose > 0 {
        println!("{} ({}, {:?}): {} grade(s)", args.input.display(), source, mode, records.len());
    }
    for record in &records {
        println!("{}", record);
    }

    Ok(())
}
