//! The `photodup count` command.

use clap::Args;
use photodup_core::Config;
use std::path::PathBuf;

/// Arguments for the `count` command.
#[derive(Args, Debug)]
pub struct CountArgs {
    /// Only count photos in this album
    #[arg(short, long)]
    pub album: Option<String>,

    /// Photo collection root (defaults to `store.root`)
    #[arg(long, env = "PHOTODUP_ROOT")]
    pub root: Option<PathBuf>,
}

/// Execute the count command. Prints `{"count": n}`.
pub async fn execute(args: CountArgs, config: &Config) -> anyhow::Result<()> {
    let registry = super::open_registry(config, args.root);
    let album = args.album;
    let count =
        tokio::task::spawn_blocking(move || registry.photo_count(album.as_deref())).await??;
    println!("{}", serde_json::json!({ "count": count }));
    Ok(())
}
