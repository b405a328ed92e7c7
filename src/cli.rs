//! Command line arguments

use clap::Parser;
use std::path::PathBuf;

/// Convert an Excellon drill file into a G-code drilling program
#[derive(Parser, Debug, Clone)]
#[command(name = "e2g", author, version, about, long_about = None)]
pub struct Args {
    /// Excellon drill file
    pub input: PathBuf,

    /// Output file [default: <INPUT>-gcode.nc]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Settings file (.toml or .json) [default: platform config dir]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Do not write output when a line has a malformed numeric field
    #[arg(long)]
    pub strict: bool,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only report errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

/// Log verbosity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Warnings and errors
    Normal,
    /// Everything down to debug
    Verbose,
}

impl Args {
    /// Verbosity from the `--quiet`/`--verbose` flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}
