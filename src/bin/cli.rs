//! internwatch CLI
//!
//! Runs one watch pass and exits; schedule it with cron or a CI workflow.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use internwatch::{
    error::{AppError, Result},
    models::{Config, SourceDocument},
    notify::{self, ConsoleNotifier},
    pipeline::{self, WatchOptions},
    sources::{DocumentSupplier, GithubSupplier, LocalFileSupplier},
    storage::{LocalSeenStore, MemorySeenStore, SeenStore},
    utils::http,
};

/// internwatch - regional internship posting watcher
#[derive(Parser, Debug)]
#[command(
    name = "internwatch",
    version,
    about = "Watches GitHub internship lists for new regional postings"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "internwatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check all configured repositories and deliver a digest of new postings
    Run {
        /// Print the digest instead of delivering it; the seen set is untouched
        #[arg(long)]
        dry_run: bool,
    },

    /// Scan a local markdown file and print new postings
    Scan {
        /// File to scan
        file: PathBuf,

        /// Source name used for ids (default: the file path)
        #[arg(long)]
        source: Option<String>,

        /// Do not read or update the seen set
        #[arg(long)]
        no_store: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Show seen-set and source info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // `run` and `validate` must see the real file; a broken one is fatal.
    let config = match cli.command {
        Command::Run { .. } | Command::Validate => Config::load(&cli.config).inspect_err(|e| {
            log::error!("Failed to load config from {}: {}", cli.config.display(), e)
        })?,
        Command::Scan { .. } | Command::Info => Config::load_or_default(&cli.config),
    };
    log::debug!("Configuration: {:?}", config);

    match cli.command {
        Command::Run { dry_run } => {
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            let client = http::create_async_client(&config.crawler)?;
            let supplier = GithubSupplier::new(client.clone(), &config.github);
            let store = LocalSeenStore::new(&config.storage.seen_file);
            let notifier = notify::from_config(&config.notify, client)?;

            let outcome = pipeline::run_watch(
                &config,
                &config.sources.repositories,
                &supplier,
                &store,
                notifier.as_ref(),
                WatchOptions { dry_run },
            )
            .await?;

            log::info!(
                "Run complete: {} documents scanned, {} new postings, delivered: {}",
                outcome.documents,
                outcome.records.len(),
                outcome.delivered
            );
        }

        Command::Scan {
            file,
            source,
            no_store,
        } => {
            let path = file.to_string_lossy().to_string();
            let content = LocalFileSupplier::default()
                .fetch(&path)
                .await?
                .ok_or_else(|| AppError::fetch(path.as_str(), "no content"))?;
            let documents = vec![SourceDocument::new(source.unwrap_or(path), content)];

            let store: Box<dyn SeenStore> = if no_store {
                Box::new(MemorySeenStore::new())
            } else {
                Box::new(LocalSeenStore::new(&config.storage.seen_file))
            };

            let outcome = pipeline::process_documents(
                &config,
                &documents,
                store.as_ref(),
                &ConsoleNotifier,
                WatchOptions::default(),
            )
            .await?;

            log::info!("{} new postings", outcome.records.len());
        }

        Command::Validate => {
            log::info!("Validating {}...", cli.config.display());

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} sources, notify via {:?})",
                config.sources.repositories.len(),
                config.notify.method
            );
        }

        Command::Info => {
            let store = LocalSeenStore::new(&config.storage.seen_file);
            let seen = store.load().await;

            log::info!("Seen set: {} ({} postings)", store.location(), seen.len());
            log::info!("Region: {}", config.region.name);
            for repo in &config.sources.repositories {
                log::info!("Source: {}", repo);
            }
        }
    }

    Ok(())
}
