//! ShardSync - shard repository sync and result summaries
//!
//! Two independent commands:
//!   `results` parses a directory of JSON result dumps and prints a summary.
//!   `sync` clones or pulls a repository, writes timestamped info files,
//!   and pushes them back, force-pushing after a rebase if rejected.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Invalid arguments, missing directory, config error, or failed sync

mod analysis;
mod cli;
mod config;
mod errors;
mod models;
mod parser;
mod repo;
mod report;
mod scanner;

use anyhow::{Context, Result};
use cli::{Args, Commands, OutputFormat, ResultsArgs, SyncArgs};
use config::{Config, DEFAULT_CONFIG_FILE};
use repo::{Credentials, GitCli, PushOutcome, RepoUpdater};
use report::SummaryLimits;
use scanner::{seed, ResultScanner};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("ShardSync v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        "Config: {:?}, verbose: {}, quiet: {}",
        args.config, args.verbose, args.quiet
    );

    match dispatch(&args) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Run the selected subcommand and return its exit code.
fn dispatch(args: &Args) -> Result<i32> {
    match &args.command {
        Some(Commands::Results(results)) => run_results(args, results),
        Some(Commands::Sync(sync)) => run_sync(args, sync),
        None => anyhow::bail!("A subcommand is required (results or sync); see --help"),
    }
}

/// Handle --init-config: generate a default .shardsync.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to set the repository, credentials, and summary limits.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so that reports on stdout stay machine-readable.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

/// Parse every result file in the directory and report the aggregate.
fn run_results(args: &Args, results: &ResultsArgs) -> Result<i32> {
    let mut config = load_config(args)?;
    config.merge_results_args(results);

    info!("Results directory specified: {}", results.dir.display());
    let scanner = ResultScanner::new(&results.dir)?;

    let mut files = scanner.scan()?;
    info!(
        "Identified {} history files and {} other JSON files",
        files.history.len(),
        files.other.len()
    );

    if results.create_dummy {
        seed::seed_missing(scanner.root(), &mut files)?;
    } else if files.is_empty() {
        warn!(
            "No JSON files found in {}; pass --create-dummy to generate samples",
            results.dir.display()
        );
    }

    let aggregator = analysis::aggregate_files(&files);
    if aggregator.history().is_empty() && aggregator.other().is_empty() {
        warn!("No usable data was loaded");
    }
    if files.unreadable > 0 {
        warn!("{} directory entries could not be read", files.unreadable);
    }
    if aggregator.failed_files() > 0 {
        warn!(
            "{} of {} files could not be used",
            aggregator.failed_files(),
            files.total()
        );
    }

    let output = match results.format {
        OutputFormat::Text => report::generate_text_report(
            &aggregator,
            SummaryLimits {
                max_symbols: config.results.max_symbols,
                max_entries: config.results.max_entries_per_category,
            },
        ),
        OutputFormat::Json => report::generate_json_report(&aggregator)?,
    };

    match results.output {
        Some(ref path) => {
            report::write_report(&output, path)?;
            println!("✅ Report saved to: {}", path.display());
        }
        None => println!("{}", output),
    }

    Ok(0)
}

/// Bring the shard repository up to date and push fresh info files.
fn run_sync(args: &Args, sync: &SyncArgs) -> Result<i32> {
    let mut config = load_config(args)?;
    config.merge_sync_args(sync);
    let settings = config.sync;

    if settings.repo_url.trim().is_empty() {
        anyhow::bail!("No repository URL configured; pass --repo or set sync.repo_url");
    }

    let credentials = Credentials::new(settings.username.clone(), settings.token.clone());
    if let Err(e) = credentials.validate() {
        anyhow::bail!("{}. Will not run with missing or placeholder credentials.", e);
    }

    info!(
        "Syncing {} as '{}' into '{}'",
        settings.repo_url,
        settings.username,
        settings.local_path.display()
    );

    let show_progress = !sync.no_progress && !args.quiet;
    let updater = RepoUpdater::new(GitCli::new(credentials, show_progress), settings);

    match updater.run()? {
        PushOutcome::NothingToCommit => println!("✅ Repository already up to date; nothing to push."),
        PushOutcome::Pushed => println!("✅ Info files committed and pushed."),
        PushOutcome::ForcePushed => {
            println!("✅ Info files committed and force-pushed after rebasing onto the remote.")
        }
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_without_command_reports_usage() {
        let args = Args {
            command: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        };

        let err = dispatch(&args).unwrap_err();
        assert!(err.to_string().contains("subcommand is required"));
    }
}
