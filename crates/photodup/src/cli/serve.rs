//! The `photodup serve` command.

use clap::Args;
use photodup_core::{Config, FingerprintComputer};
use photodup_server::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (defaults to `server.bind`)
    #[arg(short, long, env = "PHOTODUP_BIND")]
    pub bind: Option<String>,

    /// Photo collection root (defaults to `store.root`)
    #[arg(long, env = "PHOTODUP_ROOT")]
    pub root: Option<PathBuf>,
}

/// Execute the serve command. Runs until Ctrl-C.
pub async fn execute(args: ServeArgs, config: &Config) -> anyhow::Result<()> {
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address {bind:?}: {e}"))?;

    if !FingerprintComputer::is_available() {
        tracing::warn!("Built without perceptual hashing: scans will never report duplicates");
    }

    let registry = super::open_registry(config, args.root);
    photodup_server::serve(addr, AppState::new(registry)).await?;
    Ok(())
}
