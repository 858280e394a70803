//! The `photodup scan` command.
//!
//! By default a background job is started and a progress bar follows it by
//! polling, the same way an API client would. `--sync` runs the scan inline
//! instead, which is simpler for small albums.

use clap::Args;
use photodup_core::{Config, DuplicateGroup, JobRegistry, ScanOutcome};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Arguments for the `scan` command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Only scan photos in this album (a first-level directory under the root)
    #[arg(short, long)]
    pub album: Option<String>,

    /// Run the scan inline instead of as a polled background job
    #[arg(long)]
    pub sync: bool,

    /// Photo collection root (defaults to `store.root`)
    #[arg(long, env = "PHOTODUP_ROOT")]
    pub root: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the result JSON
    #[arg(long)]
    pub pretty: bool,

    /// Milliseconds between progress polls
    #[arg(long, default_value = "200")]
    pub poll_interval: u64,
}

/// Execute the scan command.
pub async fn execute(args: ScanArgs, config: &Config) -> anyhow::Result<()> {
    let registry = super::open_registry(config, args.root.clone());
    let start = Instant::now();

    let outcome = if args.sync {
        let registry = registry.clone();
        let album = args.album.clone();
        tokio::task::spawn_blocking(move || registry.run_sync(album.as_deref())).await??
    } else {
        run_polled(&registry, args.album.as_deref(), args.poll_interval).await?
    };

    let json = render(&outcome, args.pretty)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))?;
            tracing::info!("Wrote {} groups to {}", outcome.groups.len(), path.display());
        }
        None => println!("{json}"),
    }

    print_summary(&outcome, start.elapsed());
    Ok(())
}

/// Start a background job and follow it to completion.
async fn run_polled(
    registry: &JobRegistry,
    album: Option<&str>,
    poll_interval: u64,
) -> anyhow::Result<ScanOutcome> {
    let ticket = registry.start(album).await?;
    tracing::debug!("Started scan job {}", ticket.job_id);

    let pb = create_progress_bar();
    loop {
        let status = registry.poll(&ticket.job_id)?;
        pb.set_position(u64::from(status.percent));
        pb.set_message(format!("{}/{} fingerprinted", status.scanned, status.total));

        if status.done {
            if let Some(error) = status.error {
                pb.abandon_with_message("failed");
                anyhow::bail!("Scan {} failed: {}", ticket.job_id, error);
            }
            pb.finish_with_message(format!("{} photos scanned", status.scanned));
            return Ok(ScanOutcome {
                groups: status.groups,
                scanned: status.scanned,
            });
        }
        tokio::time::sleep(Duration::from_millis(poll_interval.max(10))).await;
    }
}

/// Result JSON: `{"groups": [[photo, ...], ...], "scanned": n}`.
fn render(outcome: &ScanOutcome, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(outcome)
    } else {
        serde_json::to_string(outcome)
    }
}

fn create_progress_bar() -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Print a summary table to stderr after a scan.
fn print_summary(outcome: &ScanOutcome, elapsed: Duration) {
    let duplicates: usize = outcome.groups.iter().map(DuplicateGroup::len).sum();
    let largest = outcome.groups.iter().map(DuplicateGroup::len).max().unwrap_or(0);

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Scanned:      {:>8}", outcome.scanned);
    eprintln!("    Groups:       {:>8}", outcome.groups.len());
    if !outcome.groups.is_empty() {
        eprintln!("    In groups:    {:>8}", duplicates);
        eprintln!("    Largest:      {:>8}", largest);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use photodup_core::Photo;

    fn outcome() -> ScanOutcome {
        ScanOutcome {
            groups: vec![DuplicateGroup(vec![
                Photo::image("trip/1.jpg", "1.jpg").in_album("trip"),
                Photo::image("trip/2.jpg", "2.jpg").in_album("trip"),
            ])],
            scanned: 5,
        }
    }

    #[test]
    fn test_render_compact_json() {
        let json = render(&outcome(), false).unwrap();
        assert!(!json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["scanned"], 5);
        assert_eq!(value["groups"][0][1]["id"], "trip/2.jpg");
        assert_eq!(value["groups"][0][0]["media_type"], "image");
    }

    #[test]
    fn test_render_pretty_json() {
        let json = render(&outcome(), true).unwrap();
        assert!(json.contains('\n'));
        let parsed: ScanOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, outcome());
    }

    #[tokio::test]
    async fn test_polled_scan_of_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        let registry = super::super::open_registry(&Config::default(), Some(dir.path().into()));
        let outcome = run_polled(&registry, None, 10).await.unwrap();
        assert!(outcome.groups.is_empty());
        assert_eq!(outcome.scanned, 0);
    }

    #[tokio::test]
    async fn test_polled_scan_of_missing_root_fails() {
        let registry = super::super::open_registry(
            &Config::default(),
            Some(PathBuf::from("/definitely/not/a/photo/root")),
        );
        assert!(run_polled(&registry, None, 10).await.is_err());
    }
}
