//! EDL clip-name annotation (`editedl`).
//!
//! Copies every `* FROM CLIP NAME:` value onto a comment line of its own
//! directly below the tag, for conform tools that only read plain `*`
//! comments:
//!
//! ```text
//! * FROM CLIP NAME: A001C003_220101
//! * A001C003_220101
//! ```
//!
//! This is a line patch, not an EDL parser. Nothing is inserted when the
//! tag line mentions a `.mov` source or when the next line is already a
//! `*` comment, so running the pass twice changes nothing.

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::CdlResult;
use crate::extract::normalize_line_endings;

/// Tag that carries the clip name.
pub const CLIP_NAME_TAG: &str = "* FROM CLIP NAME:";

/// Result of annotating one EDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
    /// Rewritten text, `\n` line endings.
    pub text: String,
    /// Number of comment lines inserted.
    pub inserted: usize,
}

/// Clip name of a tag line: the text between the first and second `:`.
fn clip_name(line: &str) -> &str {
    line.split(':').nth(1).unwrap_or_default().trim()
}

/// Annotates EDL text.
pub fn annotate_edl(text: &str) -> Annotated {
    let text = normalize_line_endings(text);
    let lines: Vec<&str> = text.split('\n').collect();

    let mut out = Vec::with_capacity(lines.len());
    let mut inserted = 0;
    for (i, line) in lines.iter().enumerate() {
        out.push((*line).to_string());
        if !line.contains(CLIP_NAME_TAG) {
            continue;
        }
        let next_is_comment = lines
            .get(i + 1)
            .is_some_and(|next| next.trim().starts_with('*'));
        if line.contains(".mov") || next_is_comment {
            continue;
        }
        out.push(format!("* {}", clip_name(line)));
        inserted += 1;
    }

    Annotated { text: out.join("\n"), inserted }
}

/// Annotates an EDL file in place.
///
/// The file is only rewritten when its content changes. Returns the number
/// of inserted lines.
pub fn annotate_file<P: AsRef<Path>>(path: P) -> CdlResult<usize> {
    let path = path.as_ref();
    trace!(path = %path.display(), "annotate::annotate_file");

    let original = fs::read_to_string(path)?;
    let annotated = annotate_edl(&original);
    if annotated.text != original {
        fs::write(path, &annotated.text)?;
    }

    debug!(path = %path.display(), inserted = annotated.inserted, "annotated EDL");
    Ok(annotated.inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_clip_name_comment() {
        let edl = "001  A001C003 V C 01:00:00:00 01:00:04:00 00:00:00:00 00:00:04:00\n\
                   * FROM CLIP NAME: A001C003_220101\n\
                   002  A002C010 V C 02:10:00:00 02:10:02:12 00:00:04:00 00:00:06:12\n";
        let out = annotate_edl(edl);
        assert_eq!(out.inserted, 1);
        assert_eq!(
            out.text,
            "001  A001C003 V C 01:00:00:00 01:00:04:00 00:00:00:00 00:00:04:00\n\
             * FROM CLIP NAME: A001C003_220101\n\
             * A001C003_220101\n\
             002  A002C010 V C 02:10:00:00 02:10:02:12 00:00:04:00 00:00:06:12\n"
        );
    }

    #[test]
    fn skips_when_next_line_is_comment() {
        let edl = "* FROM CLIP NAME: A001\n*ASC_SOP (1 1 1)(0 0 0)(1 1 1)\n";
        let out = annotate_edl(edl);
        assert_eq!(out.inserted, 0);
        assert_eq!(out.text, edl);
    }

    #[test]
    fn skips_mov_sources() {
        let edl = "* FROM CLIP NAME: interview.mov\nnext\n";
        assert_eq!(annotate_edl(edl).inserted, 0);
    }

    #[test]
    fn tag_on_last_line() {
        let out = annotate_edl("* FROM CLIP NAME: LAST");
        assert_eq!(out.text, "* FROM CLIP NAME: LAST\n* LAST");
    }

    #[test]
    fn name_stops_at_second_colon() {
        assert_eq!(clip_name("* FROM CLIP NAME:  take 1: alt "), "take 1");
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let edl = "* FROM CLIP NAME: A\r\n\r\n* FROM CLIP NAME: B\r\nEND";
        let first = annotate_edl(edl);
        assert_eq!(first.inserted, 2);
        let second = annotate_edl(&first.text);
        assert_eq!(second.inserted, 0);
        assert_eq!(second.text, first.text);
    }
}
