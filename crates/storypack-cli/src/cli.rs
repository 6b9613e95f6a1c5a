use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "storypack",
    about = "Package stories into deduplicated chapter archives and unpack them again",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file overriding export file names and compression
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Export a story into per-chapter and story archives
    Export(ExportArgs),
    /// Unpack an exported story next to its header document
    Import(ImportArgs),
    /// Unpack a single chapter archive
    Restore(RestoreArgs),
    /// Show the contents of a header document
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct ExportArgs {
    /// Story root holding the index document
    #[arg(default_value = ".")]
    pub root: PathBuf,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Path to the header document (content.elp)
    pub header: PathBuf,
    /// Directory the story folder is created in
    pub destination: PathBuf,
}

#[derive(Args)]
pub struct RestoreArgs {
    pub archive: PathBuf,
    pub target: PathBuf,
}

#[derive(Args)]
pub struct InspectArgs {
    pub header: PathBuf,
}
