use std::path::PathBuf;

use charmap::DEFAULT_MAX_INDEX;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Largest value accepted by `--max-index`.
pub const MAX_INDEX_LIMIT: i64 = 65_536;

/// Encode text files into character-map index tokens and decode them back.
///
/// Any path argument made only of digits, such as `5`, refers to `5.txt`.
#[derive(Debug, Parser)]
#[command(name = "charmap", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load a character map and show its table and diagnostics
    Load {
        /// Character map definition (index<TAB>character per line)
        #[arg(value_name = "MAP")]
        map: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Fail on the first malformed definition line
        #[arg(long)]
        strict: bool,

        /// Highest index accepted in the definition (1 to 65536)
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_INDEX,
            value_parser = clap::value_parser!(u32).range(1..=MAX_INDEX_LIMIT)
        )]
        max_index: u32,
    },

    /// Encode a file into space-separated index tokens
    Encode {
        /// Character map definition (index<TAB>character per line)
        #[arg(short, long, value_name = "MAP")]
        map: PathBuf,

        /// File to encode
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Where to write the token text
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Output format for the result report
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Fail on the first malformed definition line
        #[arg(long)]
        strict: bool,

        /// Highest index accepted in the definition (1 to 65536)
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_INDEX,
            value_parser = clap::value_parser!(u32).range(1..=MAX_INDEX_LIMIT)
        )]
        max_index: u32,
    },

    /// Decode index tokens back into text
    Decode {
        /// Character map definition (index<TAB>character per line)
        #[arg(short, long, value_name = "MAP")]
        map: PathBuf,

        /// Token text to decode
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Where to write the decoded bytes
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Output format for the result report
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Fail on the first malformed definition line
        #[arg(long)]
        strict: bool,

        /// Highest index accepted in the definition (1 to 65536)
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_INDEX,
            value_parser = clap::value_parser!(u32).range(1..=MAX_INDEX_LIMIT)
        )]
        max_index: u32,
    },

    /// Interactive menu: load, encode and decode within one session
    Menu {
        /// Fail on the first malformed definition line
        #[arg(long)]
        strict: bool,

        /// Highest index accepted in the definition (1 to 65536)
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_INDEX,
            value_parser = clap::value_parser!(u32).range(1..=MAX_INDEX_LIMIT)
        )]
        max_index: u32,
    },
}

/// Output format for reports.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
}
