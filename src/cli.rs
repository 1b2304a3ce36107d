//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// ShardSync - push timestamp shards to git and summarize result dumps
///
/// Examples:
///   shardsync results --dir ./results
///   shardsync results --dir ./results --format json --output summary.json
///   shardsync sync --repo https://github.com/owner/shards.git --username alice
///   shardsync --config config.json sync
///   shardsync --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .shardsync.toml in the current directory.
    /// A .json path is read in the legacy config.json layout.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .shardsync.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Parse and summarize the JSON result files in a directory
    Results(ResultsArgs),
    /// Clone or pull the shard repository, write info files, commit and push
    Sync(SyncArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ResultsArgs {
    /// Path to the directory containing the result files
    #[arg(long, value_name = "DIRECTORY_PATH")]
    pub dir: PathBuf,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Symbols listed per section in the text summary
    #[arg(long, value_name = "COUNT")]
    pub max_symbols: Option<usize>,

    /// Date entries listed per category in the text summary
    #[arg(long, value_name = "COUNT")]
    pub max_entries: Option<usize>,

    /// Write sample files when the directory has none of a kind
    #[arg(long)]
    pub create_dummy: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SyncArgs {
    /// Remote repository URL
    #[arg(short, long, value_name = "URL")]
    pub repo: Option<String>,

    /// Local working copy path
    #[arg(long, value_name = "DIR")]
    pub local_path: Option<PathBuf>,

    /// Username for HTTPS authentication
    #[arg(short, long, env = "SHARDSYNC_GIT_USERNAME")]
    pub username: Option<String>,

    /// Personal access token for HTTPS authentication
    #[arg(long, env = "SHARDSYNC_GIT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Branch to pull from and push to
    #[arg(short, long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Commit message
    #[arg(short, long, value_name = "MESSAGE")]
    pub message: Option<String>,

    /// Number of info files to write
    #[arg(long, value_name = "COUNT")]
    pub file_count: Option<usize>,

    /// Hide the clone progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Output format for the results report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable bounded summary (default)
    #[default]
    Text,
    /// Full JSON document
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.init_config {
            return Ok(());
        }

        match &self.command {
            None => Err("A subcommand is required (results or sync); see --help".to_string()),
            Some(Commands::Results(results)) => results.validate(),
            Some(Commands::Sync(sync)) => sync.validate(),
        }
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

impl ResultsArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.dir.exists() {
            return Err(format!("Directory not found at path: {}", self.dir.display()));
        }
        if !self.dir.is_dir() {
            return Err(format!("Path is not a directory: {}", self.dir.display()));
        }
        if self.max_symbols == Some(0) {
            return Err("Max symbols must be at least 1".to_string());
        }
        if self.max_entries == Some(0) {
            return Err("Max entries must be at least 1".to_string());
        }
        Ok(())
    }
}

impl SyncArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.file_count == Some(0) {
            return Err("File count must be at least 1".to_string());
        }
        if let Some(ref branch) = self.branch {
            if branch.trim().is_empty() {
                return Err("Branch name cannot be empty".to_string());
            }
        }
        Ok(())
    }
}
