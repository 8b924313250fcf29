//! Concierge CLI - concierge command

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use cli_lib::config::{self, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod cmd;

/// Concierge - list views over a partial-update backend
#[derive(Parser)]
#[command(name = "concierge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ./concierge.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the PATCH payload between two versions of a record
    Diff {
        /// Record as loaded
        original: PathBuf,
        /// Record as edited
        updated: PathBuf,
        /// Print payload and ignored clears as JSON
        #[arg(long)]
        json: bool,
        /// Number of context lines (default: 3)
        #[arg(short = 'U', long, default_value = "3")]
        context: usize,
    },
    /// Strip empty fields from a record
    Clean {
        /// Record file
        record: PathBuf,
    },
    /// Resolve the relations of a page of records
    Hydrate {
        /// Screen whose relations to resolve
        #[arg(short, long)]
        screen: String,
        /// JSON array of records, or a page object
        page: PathBuf,
    },
    /// Print the page-number list for a pagination bar
    Pages {
        /// Current page (1-based)
        #[arg(long)]
        current: u32,
        /// Total number of pages
        #[arg(long)]
        total: u32,
    },
    /// View and check configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List screens and their relations
    List,
    /// Show the config file path
    Path,
    /// Print an example configuration
    Example,
    /// Validate the configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config only matters to commands that read it
    let loaded = config::load(cli.config.as_deref());
    let _guard = init_logging(
        cli.verbose,
        cli.log_dir.as_deref(),
        loaded.as_ref().ok().map(|config| &config.logging),
    )?;

    match cli.command {
        Commands::Diff { original, updated, json, context } => {
            cmd::diff::run(&original, &updated, json, context).await
        }
        Commands::Clean { record } => cmd::clean::run(&record).await,
        Commands::Hydrate { screen, page } => cmd::hydrate::run(&loaded?, &screen, &page).await,
        Commands::Pages { current, total } => cmd::pages::run(current, total).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list(&loaded?).await,
            ConfigCommands::Path => cmd::config::run_path(cli.config.as_deref()).await,
            ConfigCommands::Example => cmd::config::run_example().await,
            ConfigCommands::Check => cmd::config::run_check(&loaded?).await,
        },
    }
}

/// Install the fmt subscriber
///
/// `-v` flags override the configured level. `RUST_LOG` directives are
/// applied on top.
fn init_logging(
    verbose: u8,
    log_dir: Option<&Path>,
    logging: Option<&LoggingConfig>,
) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        // An unknown configured level is reported by `config check`
        0 => logging
            .and_then(|logging| logging.level().ok())
            .unwrap_or(Level::WARN),
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let directory = log_dir.or_else(|| logging.and_then(|l| l.directory.as_deref()));
    match directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, "concierge.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}
