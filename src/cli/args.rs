//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, merge::MergeArgs, sections::SectionsArgs, tree::TreeArgs,
};

#[derive(Parser)]
#[command(name = "bommerge")]
#[command(author, version, about = "Bill-of-materials rollup across assembly spreadsheets")]
#[command(long_about = "Resolves a tree of assembly spreadsheets, multiplies quantities along every \
path from the root, and reports total part quantities with a parent/child/item traceability table.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output and logging
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose logging (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file layered over the global and local ones
    #[arg(long, global = true, env = "BOMMERGE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge part quantities across an assembly tree
    Merge(MergeArgs),

    /// Show the resolved assembly tree with effective quantities
    Tree(TreeArgs),

    /// Show what each section of one spreadsheet yields
    Sections(SectionsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Configured default, otherwise markdown
    #[default]
    Auto,
    /// Markdown tables
    Md,
    /// Aligned columns for the terminal
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// JSON format (for programming)
    Json,
}
