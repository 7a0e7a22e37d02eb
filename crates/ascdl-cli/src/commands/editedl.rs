//! EDL clip-name annotation command.
//!
//! Rewrites each EDL in place, adding a `* <clip name>` comment below every
//! `* FROM CLIP NAME:` line that does not already have one.

use crate::EditedlArgs;
use anyhow::{Result, bail};
use ascdl::annotate_file;
use tracing::{info, trace, warn};

/// Runs the editedl command.
pub fn run(args: EditedlArgs, verbose: u8) -> Result<()> {
    trace!(inputs = args.input.len(), "editedl::run");

    let files = super::expand_inputs(&args.input)?;
    info!(files = files.len(), "Annotating EDLs");

    let mut failed = 0;
    for path in &files {
        match annotate_file(path) {
            Ok(inserted) => {
                if verbose > 0 {
                    println!("{}: {} line(s) added", path.display(), inserted);
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "annotation failed");
                eprintln!("Error: {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} EDL files could not be annotated", failed, files.len());
    }

    println!("EDL file modification complete!");
    Ok(())
}
