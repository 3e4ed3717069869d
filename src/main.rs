//! CLI entry point for the drive-mirror tool.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use drive_mirror_core::{DriveClient, Mirror, TransferLedger, load_access_token};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("drive-mirror starting");

    // Credential bootstrapping is the one pre-traversal step that may fail
    // fatally; everything past the root listing degrades per-file instead.
    let token = load_access_token(&args.token_file)?;
    let remote = Arc::new(DriveClient::new(token));

    let ledger = TransferLedger::load(&args.ledger)
        .await
        .with_context(|| format!("loading ledger {}", args.ledger.display()))?;
    info!(
        ledger = %args.ledger.display(),
        already_downloaded = ledger.len(),
        "ledger loaded"
    );

    let mut mirror = Mirror::new(remote, ledger).with_progress(!args.no_progress && !args.quiet);

    let stats = mirror
        .run(&args.root, &args.output)
        .await
        .with_context(|| format!("mirroring folder {} into {}", args.root, args.output.display()))?;

    // Per-file failures are not fatal: they were logged during the run and
    // will be retried on the next invocation via the ledger.
    info!(
        transferred = stats.transferred(),
        skipped = stats.skipped(),
        failed = stats.failed(),
        folders = stats.folders(),
        "mirror complete"
    );

    Ok(())
}
