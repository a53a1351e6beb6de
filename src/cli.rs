//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure
//! - [`OutputFormat`] - How the decoded conversation is printed

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

/// Decode a Telegram Desktop personal chat export (result.json).
#[derive(Parser, Debug, Clone)]
#[command(name = "tgchat")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    tgchat result.json
    tgchat result.json -f text
    tgchat result.json -f json -o conversation.json
    tgchat huge_export.json --streaming
    RUST_LOG=tgchat=debug tgchat result.json")]
pub struct Args {
    /// Path to the export file
    pub input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Keep service events (calls, pins) in the message list
    #[arg(long)]
    pub keep_service: bool,

    /// Stream messages one record at a time (always prints text lines)
    #[arg(long)]
    pub streaming: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options.
///
/// # Example
///
/// ```rust
/// use tgchat::cli::OutputFormat;
///
/// assert_eq!(OutputFormat::default(), OutputFormat::Summary);
/// assert_eq!(OutputFormat::Json.to_string(), "JSON");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Partner, first person, and message counts
    #[default]
    Summary,
    /// One line per message
    Text,
    /// The full conversation as pretty-printed JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Summary => write!(f, "summary"),
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}
