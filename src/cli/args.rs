//! Command line argument parsing for the Pilum CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::document::converter::jsonl::DEFAULT_ID_FIELD;

/// Pilum - index documents and query terms and completions
#[derive(Parser, Debug, Clone)]
#[command(name = "pilum")]
#[command(about = "An embeddable indexing and completion-suggestion engine for Rust")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PilumArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PilumArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Find documents containing an exact term
    Term(TermArgs),

    /// Suggest completions for a prefix
    Suggest(SuggestArgs),

    /// Show collection statistics
    Stats(StatsArgs),
}

/// Where the documents come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Mapping file (JSON)
    #[arg(short, long, value_name = "MAPPING_FILE")]
    pub mapping: PathBuf,

    /// Documents file (JSONL, one object per line)
    #[arg(short, long, value_name = "DOCS_FILE")]
    pub docs: PathBuf,

    /// Field holding each document's id
    #[arg(long, default_value = DEFAULT_ID_FIELD)]
    pub id_field: String,

    /// Name of the in-memory collection
    #[arg(long, default_value = "docs")]
    pub collection: String,
}

/// Arguments for a term query
#[derive(Args, Debug, Clone)]
pub struct TermArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Text field to search
    #[arg(value_name = "FIELD")]
    pub field: String,

    /// Exact term to look up (not analyzed)
    #[arg(value_name = "VALUE")]
    pub value: String,

    /// Maximum number of hits
    #[arg(short = 'n', long, default_value = "10")]
    pub size: usize,
}

/// Arguments for a completion suggestion
#[derive(Args, Debug, Clone)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Completion field to suggest from
    #[arg(value_name = "FIELD")]
    pub field: String,

    /// Prefix typed so far
    #[arg(value_name = "PREFIX")]
    pub prefix: String,

    /// Maximum number of suggestions
    #[arg(short = 'n', long, default_value = "5")]
    pub size: usize,
}

/// Arguments for collection statistics
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity() {
        let base = ["pilum", "stats", "-m", "m.json", "-d", "d.jsonl"];

        let args = PilumArgs::try_parse_from(base).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = PilumArgs::try_parse_from(base.iter().copied().chain(["-vv"])).unwrap();
        assert_eq!(args.verbosity(), 3);

        let args = PilumArgs::try_parse_from(base.iter().copied().chain(["--quiet"])).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_suggest_args() {
        let args = PilumArgs::try_parse_from([
            "pilum",
            "--format",
            "json",
            "suggest",
            "--mapping",
            "m.json",
            "--docs",
            "d.jsonl",
            "name_suggest",
            "ad",
            "-n",
            "3",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        if let Command::Suggest(suggest) = args.command {
            assert_eq!(suggest.field, "name_suggest");
            assert_eq!(suggest.prefix, "ad");
            assert_eq!(suggest.size, 3);
            assert_eq!(suggest.source.id_field, "_id");
        } else {
            panic!("Expected Suggest command");
        }
    }

    #[test]
    fn test_term_requires_sources() {
        assert!(PilumArgs::try_parse_from(["pilum", "term", "name", "advil"]).is_err());
    }
}
