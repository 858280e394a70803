//! The `photodup config` command for configuration management.

use clap::{Args, Subcommand};
use photodup_core::Config;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command against the file at `config_path`.
pub async fn execute(args: ConfigArgs, config_path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => println!("{}", effective_toml(config_path)?),

        ConfigCommand::Path => println!("{}", config_path.display()),

        ConfigCommand::Init { force } => {
            init(config_path, force)?;
            tracing::info!("Config file created at: {}", config_path.display());
            println!("Configuration initialized at: {}", config_path.display());
        }
    }

    Ok(())
}

/// The config at `path` (or the defaults when it doesn't exist) as TOML.
fn effective_toml(path: &Path) -> anyhow::Result<String> {
    let config = if path.exists() {
        Config::load_from(path)?
    } else {
        Config::default()
    };
    Ok(config.to_toml()?)
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}
