//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Folio CLI - Turn analyzed documents into flat records.
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Record database path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text (default)
    Text,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze documents and store one record per document
    Ingest(IngestArgs),

    /// Convert a saved analysis result into a record
    Convert(ConvertArgs),

    /// Show a stored record
    Show(ShowArgs),
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// Documents to ingest
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Analysis service endpoint
    #[arg(long, env = "FR_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Analysis service key
    #[arg(long, env = "FR_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Model to analyze with
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Arguments for the convert command.
#[derive(Debug, Parser)]
pub struct ConvertArgs {
    /// Saved analysis result (operation envelope or bare result JSON)
    pub result: PathBuf,

    /// Source name recorded as provenance (defaults to the result's file name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Also store the record
    #[arg(long)]
    pub store: bool,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Record id
    pub id: String,
}
