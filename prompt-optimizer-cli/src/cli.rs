//! Command-line argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::config::ConfigCommands;
use crate::output::OutputFormat;

/// Generate rewrites of a prompt, score their responses and keep the best one
#[derive(Debug, Parser)]
#[command(name = "prompt-optimizer", version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "PROMPT_OPTIMIZER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Optimize a prompt for a task category
    Optimize(OptimizeArgs),

    /// Score a single prompt/response pair without calling the generator
    Score(ScoreArgs),

    /// List the task categories and their scoring profiles
    Profiles,

    /// Show stored optimization runs
    History(HistoryArgs),

    /// Aggregate statistics over stored runs
    Stats,

    /// Export stored runs as CSV
    Export(ExportArgs),

    /// Delete all stored runs
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Inspect configuration
    Config(ConfigCommands),
}

#[derive(Debug, Args)]
pub struct OptimizeArgs {
    /// Prompt to optimize; read from stdin when omitted
    pub prompt: Option<String>,

    /// Task category (question_answering, summarization, explanation, code_generation)
    #[arg(short = 'C', long)]
    pub category: String,

    /// Number of rewrites to request
    #[arg(short = 'n', long)]
    pub variants: Option<usize>,

    /// Do not store the result
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Task category
    #[arg(short = 'C', long)]
    pub category: String,

    /// Prompt the response answers
    #[arg(short, long)]
    pub prompt: String,

    /// Response text
    #[arg(short, long, conflicts_with = "response_file", required_unless_present = "response_file")]
    pub response: Option<String>,

    /// File containing the response text
    #[arg(long)]
    pub response_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Only runs of this category
    #[arg(short = 'C', long)]
    pub category: Option<String>,

    /// Maximum number of runs to show, newest first
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Destination CSV file
    pub path: PathBuf,
}
