//! ascdl - ASC CDL grade converter
//!
//! Moves grades between EDL comment tags and `.cc` / `.ccc` / `.cdl` files.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "ascdl")]
#[command(author, version, about = "ASC CDL grade converter")]
#[command(long_about = "
Converts ASC CDL grades between EDL comment tags and .cc, .ccc and .cdl files.
Every grade is written to its own file, named after its id.

Examples:
  ascdl convert shot01.cc                 # shot01.cdl next to the input
  ascdl convert grade.cdl -t ccc -o out/  # out/<Description>.ccc
  ascdl convert reel1.edl -t cc -o grades # one .cc per graded clip
  ascdl convert reel.ccc --strict -t cc   # one .cc per ColorCorrection
  ascdl info reel1.edl                    # list grades, write nothing
  ascdl editedl 'conform/*.edl'           # add clip-name comments in place
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a grade file to another format
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Print the grades found in a file
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Copy FROM CLIP NAME values onto their own comment lines, in place
    Editedl(EditedlArgs),
}

#[derive(Args)]
struct ConvertArgs {
    /// Input file (.edl, .cc, .ccc, .cdl)
    input: PathBuf,

    /// Output directory (default: the input's directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Source format: edl, cc, ccc, cdl (default: from the input extension)
    #[arg(short, long)]
    from: Option<String>,

    /// Target format: cc, ccc, cdl (default: cdl for cc/ccc, cc for cdl)
    #[arg(short, long)]
    to: Option<String>,

    /// Parse XML strictly and convert every ColorCorrection in a collection
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Input file (.edl, .cc, .ccc, .cdl)
    input: PathBuf,

    /// Source format (default: from the input extension)
    #[arg(short, long)]
    from: Option<String>,

    /// Parse XML strictly and list every ColorCorrection
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct EditedlArgs {
    /// EDL files or glob patterns
    #[arg(required = true)]
    input: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = commands::init_logging(cli.verbose, cli.log.as_deref())?;

    match cli.command {
        Commands::Convert(args) => commands::convert::run(args, cli.verbose),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Editedl(args) => commands::editedl::run(args, cli.verbose),
    }
}
