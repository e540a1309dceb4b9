//! CLI commands and argument parsing

use crate::source::{ParamKind, SortDirection};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Adaptive-batch pagination over record files
#[derive(Parser, Debug)]
#[command(name = "adaptive-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Limits configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through a record file and print one JSON record per line
    Page(PageArgs),

    /// Load and validate the limits configuration
    CheckConfig,
}

/// Arguments of the `page` command
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Record file (.json array, .jsonl lines, or .yaml sequence)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path of the field records are paged by (e.g. `$.created_at`)
    #[arg(short, long)]
    pub param: String,

    /// How to read the parameter field
    #[arg(short, long, default_value = "number")]
    pub kind: KindArg,

    /// Walk direction
    #[arg(short, long, default_value = "desc")]
    pub order: OrderArg,

    /// Base batch size (overrides the config file)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Batch size ceiling (overrides the config file)
    #[arg(long)]
    pub max_limit: Option<usize>,

    /// Stop after this many records
    #[arg(long)]
    pub take: Option<usize>,

    /// Print pagination statistics to stderr when done
    #[arg(long)]
    pub stats: bool,
}

/// Parameter field kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    /// JSON number
    Number,
    /// JSON string
    Text,
    /// RFC 3339 string or unix seconds
    Timestamp,
}

impl From<KindArg> for ParamKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Number => ParamKind::Number,
            KindArg::Text => ParamKind::Text,
            KindArg::Timestamp => ParamKind::Timestamp,
        }
    }
}

/// Walk direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OrderArg {
    /// Highest parameter first
    Desc,
    /// Lowest parameter first
    Asc,
}

impl From<OrderArg> for SortDirection {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Desc => SortDirection::Descending,
            OrderArg::Asc => SortDirection::Ascending,
        }
    }
}
