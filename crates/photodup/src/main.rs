//! Photodup CLI - find duplicate, cropped and resized photos.
//!
//! Photodup fingerprints every image in a photo collection and groups the
//! ones that are the same picture. It can run a scan directly or serve the
//! scan job API over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Scan the whole collection, with a progress bar
//! photodup scan --root ~/Pictures
//!
//! # Scan one album inline and save the groups
//! photodup scan --album holiday --sync --output dupes.json
//!
//! # Serve the job-control API
//! photodup serve --bind 0.0.0.0:8000
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// Photodup - find duplicate, cropped and resized photos.
#[derive(Parser, Debug)]
#[command(name = "photodup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "PHOTODUP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Find duplicate photos in the collection
    Scan(cli::scan::ScanArgs),

    /// Count the image photos a scan would consider
    Count(cli::count::CountArgs),

    /// Serve the scan job API over HTTP
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(photodup_core::Config::default_path);

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let loaded = if config_path.exists() {
        photodup_core::Config::load_from(&config_path)
    } else {
        Ok(photodup_core::Config::default())
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `photodup config path`."
            );
            photodup_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Photodup v{}", photodup_core::VERSION);

    match cli.command {
        Commands::Scan(args) => cli::scan::execute(args, &config).await,
        Commands::Count(args) => cli::count::execute(args, &config).await,
        Commands::Serve(args) => cli::serve::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args, &config_path).await,
    }
}
