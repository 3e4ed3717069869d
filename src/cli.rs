//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Default remote root folder id ("root" is the Drive alias for My Drive).
pub const DEFAULT_ROOT_FOLDER_ID: &str = "root";

/// Default local base directory for the mirrored tree.
pub const DEFAULT_OUTPUT_DIR: &str = "Downloaded_Drive";

/// Default ledger file recording completed transfers.
pub const DEFAULT_LEDGER_FILE: &str = "download_log.txt";

/// Default stored credential file.
pub const DEFAULT_TOKEN_FILE: &str = "token.json";

/// Mirror a Google Drive folder tree onto the local filesystem.
///
/// Runs are incremental: files recorded in the ledger from a prior run are
/// skipped, so re-running after an interruption or failure only fetches
/// what is missing. With no arguments the tool mirrors My Drive into
/// `Downloaded_Drive` using `download_log.txt` as the ledger.
#[derive(Parser, Debug)]
#[command(name = "drive-mirror")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Remote folder id to mirror from
    #[arg(long, default_value = DEFAULT_ROOT_FOLDER_ID)]
    pub root: String,

    /// Local base directory the tree is mirrored into
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Ledger file recording already-downloaded file ids
    #[arg(long, default_value = DEFAULT_LEDGER_FILE)]
    pub ledger: PathBuf,

    /// Stored access token file (DRIVE_ACCESS_TOKEN env var overrides it)
    #[arg(long, default_value = DEFAULT_TOKEN_FILE)]
    pub token_file: PathBuf,

    /// Disable per-file progress bars
    #[arg(long)]
    pub no_progress: bool,
}
