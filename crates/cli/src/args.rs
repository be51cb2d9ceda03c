//! Command line arguments, grouped by concern.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, ValueHint};

use crate::options::OutputFormat;
use crate::parsers;

/// Top-level CLI arguments parsed via clap.
#[derive(Parser, Debug)]
#[command(
    name = "stampindex",
    version = crate::VERSION,
    about = "Index files whose names start with an ISO date or date+time stamp",
    long_about = "Walks one or more folders and writes an Org-mode outline with one \
                  timestamped entry per file whose name starts with a stamp such as \
                  \"2010-03-29T20.12 Divegraph.tiff\", \"2011-08-29T08.23.59_test.pdf\" \
                  or \"2010-12-31_report.txt\".\n\n\
                  For date-only names the time of day is taken from the file's \
                  modification time when it falls on the same day.\n\n\
                  Editor backup files ending in ~ are ignored."
)]
pub struct Args {
    #[command(flatten)]
    pub scan: ScanOptions,

    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub log: LogOptions,
}

/// Which folders are walked.
#[derive(ClapArgs, Debug)]
pub struct ScanOptions {
    /// Folder to search for stamped file names (repeatable: -f /path1 -f /path2)
    #[arg(
        short = 'f',
        long = "folder",
        required = true,
        value_parser = parsers::parse_non_empty_path,
        value_hint = ValueHint::DirPath,
        help_heading = "Scan"
    )]
    pub folders: Vec<PathBuf>,

    /// Folder to leave out together with everything below it (repeatable)
    #[arg(
        short = 'x',
        long = "exclude",
        value_parser = parsers::parse_non_empty_path,
        value_hint = ValueHint::DirPath,
        help_heading = "Scan"
    )]
    pub exclude: Vec<PathBuf>,

    /// Follow symbolic links to directories
    #[arg(short = 'l', long = "follow-links", help_heading = "Scan")]
    pub follow_links: bool,
}

/// Where and how records are written.
#[derive(ClapArgs, Debug)]
pub struct OutputOptions {
    /// Output file (stdout when omitted)
    #[arg(short = 'o', long = "output", value_hint = ValueHint::FilePath, help_heading = "Output")]
    pub output: Option<PathBuf>,

    /// Append to the output file, skipping entries it already contains
    #[arg(short = 'a', long = "append", requires = "output", help_heading = "Output")]
    pub append: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "org", help_heading = "Output")]
    pub format: OutputFormat,

    /// Tag of the top-level Org heading
    #[arg(
        short = 't',
        long = "tag",
        default_value = "filedatestamps",
        value_parser = parsers::parse_tag,
        help_heading = "Output"
    )]
    pub tag: String,

    /// Write inactive Org timestamps ([...]) instead of active ones (<...>)
    #[arg(long = "inactive-time-stamps", help_heading = "Output")]
    pub inactive_timestamps: bool,
}

/// Diagnostics on stderr.
#[derive(ClapArgs, Debug)]
pub struct LogOptions {
    /// Log excluded folders and every entry found
    #[arg(short = 'v', long, conflicts_with = "suppress_messages", help_heading = "Logging")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short = 's', long = "suppress-messages", help_heading = "Logging")]
    pub suppress_messages: bool,
}
