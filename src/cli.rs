use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidsweep")]
#[command(author, version, about = "Convert every video in a directory and remove the originals")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options for a batch run (the default action).
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Directory whose files are converted [default: incoming_to_cut/clear_to_cut/video_icp]
    #[arg(long, value_name = "PATH")]
    pub source_dir: Option<PathBuf>,

    /// Suffix of the files to convert [default: .ogv]
    #[arg(long, value_name = "EXT")]
    pub from_ext: Option<String>,

    /// Suffix given to converted files [default: .mp4]
    #[arg(long, value_name = "EXT")]
    pub to_ext: Option<String>,

    /// Show what would be converted without running the tool
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the transcoding tool is available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
