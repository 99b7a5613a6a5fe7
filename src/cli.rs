// ============================================
// src/cli.rs
// Command-line arguments
// ============================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::activity::ActivityType;

/// Connect Activity Generator: classroom starter activities in seconds.
///
/// Enter a year level, subject area and unit topic; get a title, a prompt
/// and four discussion questions.
#[derive(Parser, Debug)]
#[command(name = "connect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Simulated generation delay in milliseconds
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive form (default).
    Tui,

    /// Generate one activity from flags and print it.
    Generate(GenerateArgs),

    /// Ask for each field in turn, then print the activity.
    Prompt(PromptArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[arg(long, default_value = "")]
    pub year_level: String,

    /// Any subject; Mathematics and Science get their own prompts
    #[arg(long, default_value = "")]
    pub subject_area: String,

    #[arg(long, default_value = "")]
    pub unit_topic: String,

    /// Use this activity type instead of a random one
    #[arg(long, value_enum)]
    pub activity: Option<ActivityType>,

    /// Seed for the random activity draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the service response as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct PromptArgs {
    /// Seed for the random activity draw
    #[arg(long)]
    pub seed: Option<u64>,
}
