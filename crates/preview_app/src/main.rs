//! Command line front end for the apnews link preview engine.
//!
//! `status` and `clear` operate on the shared preview cache the same way the
//! extension popup does. `scan` runs a one-shot page activation against a
//! live URL and prints the preview every link would show.

mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use preview_engine::{CacheStore, FileCacheStore};
use preview_logging::preview_error;

use config::{load_config, report_loaded, CONFIG_FILENAME};

#[derive(Debug, Parser)]
#[command(name = "apnews-preview", version, about)]
struct Cli {
    /// Path to the RON configuration file.
    #[arg(long, env = "APNEWS_PREVIEW_CONFIG", default_value = CONFIG_FILENAME)]
    config: PathBuf,
    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show how much space cached previews use.
    Status,
    /// Remove every cached preview.
    Clear,
    /// Build previews for every link on a page.
    Scan {
        /// Page to scan, for example an apnews.com article.
        url: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, warning) = load_config(&cli.config);

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    preview_logging::initialize(config.log.into(), level);
    report_loaded(&cli.config, warning);

    let store: Arc<dyn CacheStore> = Arc::new(FileCacheStore::new(config.cache_dir));
    let result = match cli.command {
        Command::Status => commands::status(store.as_ref()).await,
        Command::Clear => commands::clear(store.as_ref()).await,
        Command::Scan { url } => commands::scan(&url, store).await,
    };
    if let Err(err) = &result {
        preview_error!("{:#}", err);
    }
    result
}
