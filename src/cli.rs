use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelforge")]
#[command(author, version, about = "Convert between Reel shot lists and editorial timelines")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a Reel file into timeline JSON
    Read {
        /// Reel file to read
        #[arg(required = true)]
        input: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep media paths relative to the Reel file
        #[arg(long)]
        relative_paths: bool,

        /// Do not run ffprobe; use fixed probe values
        #[arg(long)]
        dry_run: bool,
    },

    /// Write timeline JSON as Reel file(s)
    Write {
        /// Timeline JSON to write
        #[arg(required = true)]
        input: PathBuf,

        /// Reel file to create; indexed when the input holds several timelines
        #[arg(short, long, required = true)]
        output: PathBuf,

        /// Write media paths relative to the output directory
        #[arg(long)]
        relative_paths: bool,
    },

    /// Show how each line of a Reel file is classified
    Inspect {
        /// Reel file to inspect
        #[arg(required = true)]
        input: PathBuf,
    },

    /// Probe a media file and display what the converter sees
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses --config or defaults if not specified)
        path: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
