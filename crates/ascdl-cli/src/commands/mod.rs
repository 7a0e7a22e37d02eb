//! CLI command implementations

pub mod convert;
pub mod editedl;
pub mod info;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use ascdl::{Format, ParseMode};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `-v`. The returned guard flushes the log file on drop.
pub fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Log path has no file name: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

/// Source format from `--from`, or from the input extension.
pub fn source_format(input: &Path, from: Option<&str>) -> Result<Format> {
    match from {
        Some(token) => Ok(token.parse::<Format>()?),
        None => Format::from_path(input).with_context(|| {
            format!("Cannot detect the format of {}; pass --from", input.display())
        }),
    }
}

/// Target format from `--to`, or the source's default target.
pub fn target_format(source: Format, to: Option<&str>) -> Result<Format> {
    match to {
        Some(token) => Ok(token.parse::<Format>()?),
        None => source
            .default_target()
            .with_context(|| format!("--to is required for {} input", source)),
    }
}

pub fn parse_mode(strict: bool) -> ParseMode {
    if strict { ParseMode::Strict } else { ParseMode::Tolerant }
}

/// Directory holding `path`, `.` for bare file names.
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expands arguments that are not existing paths as glob patterns.
pub fn expand_inputs(args: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for arg in args {
        let path = Path::new(arg);
        if path.exists() {
            files.push(path.to_path_buf());
            continue;
        }
        let matched: Vec<PathBuf> = glob::glob(arg)
            .with_context(|| format!("Invalid pattern: {}", arg))?
            .filter_map(|r| r.ok())
            .collect();
        if matched.is_empty() {
            bail!("No files match: {}", arg);
        }
        files.extend(matched);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn formats_from_flags_and_extensions() {
        let input = Path::new("grades/shot01.CCC");
        assert_eq!(source_format(input, None).unwrap(), Format::Ccc);
        assert_eq!(source_format(input, Some("cdl")).unwrap(), Format::Cdl);
        assert!(source_format(Path::new("shot01.xml"), None).is_err());

        assert_eq!(target_format(Format::Ccc, None).unwrap(), Format::Cdl);
        assert_eq!(target_format(Format::Ccc, Some("CC")).unwrap(), Format::Cc);
        assert!(target_format(Format::Edl, None).is_err());
        let err = target_format(Format::Cc, Some("xyz")).unwrap_err();
        assert!(err.to_string().contains("'xyz'"));
    }

    #[test]
    fn parent_of_bare_name() {
        assert_eq!(parent_dir(Path::new("shot.cc")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("a/b/shot.cc")), PathBuf::from("a/b"));
    }

    #[test]
    fn expands_globs() {
        let tmp = tempfile::TempDir::new().unwrap();
        for name in ["r1.edl", "r2.edl", "notes.txt"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }
        let pattern = format!("{}/*.edl", tmp.path().display());
        let mut files = expand_inputs(&[pattern]).unwrap();
        files.sort();
        assert_eq!(files, [tmp.path().join("r1.edl"), tmp.path().join("r2.edl")]);

        let literal = tmp.path().join("notes.txt").display().to_string();
        assert_eq!(expand_inputs(&[literal]).unwrap().len(), 1);

        let none = format!("{}/*.cdl", tmp.path().display());
        assert!(expand_inputs(&[none]).is_err());
    }
}
