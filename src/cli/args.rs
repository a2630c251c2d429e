//! Command-line argument structures for eza-history

use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct SaveArgs {
    /// Analysis result JSON file ("-" for stdin)
    #[arg(short = 'r', long, value_name = "FILE")]
    pub result: PathBuf,

    /// File holding the analyzed text ("-" for stdin)
    #[arg(short = 'i', long, value_name = "FILE", conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Analyzed text given inline
    #[arg(short = 't', long)]
    pub text: Option<String>,

    /// Print the stored entry as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Maximum number of entries to show
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Only entries carrying this tag
    #[arg(short = 'T', long)]
    pub tag: Option<String>,

    /// Only entries whose title, text or tags contain this term
    #[arg(short = 's', long)]
    pub search: Option<String>,

    /// Output as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Entry id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output the whole entry as JSON
    #[arg(long, conflicts_with = "result_only")]
    pub json: bool,

    /// Output only the stored analysis result
    #[arg(long)]
    pub result_only: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Entry id
    #[arg(value_name = "ID")]
    pub id: String,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm deletion without prompting
    #[arg(short = 'F', long)]
    pub force: bool,
}

#[derive(Args)]
pub struct BrowseArgs {
    /// Start with this filter applied
    #[arg(short = 'T', long)]
    pub tag: Option<String>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Show the effective configuration (the default)
    #[arg(long, conflicts_with_all = ["init", "validate"])]
    pub show: bool,

    /// Write a configuration file with defaults
    #[arg(long, conflicts_with = "validate")]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(short = 'F', long, requires = "init")]
    pub force: bool,

    /// Check the configuration file and fail if it is invalid
    #[arg(long)]
    pub validate: bool,
}
