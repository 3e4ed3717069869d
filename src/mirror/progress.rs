//! Per-file transfer progress rendering.
//!
//! Purely an observable side effect: nothing here feeds back into control
//! flow or the ledger. When the content length is known the bar shows a
//! percentage per chunk; otherwise a spinner with a byte count.

use indicatif::{ProgressBar, ProgressStyle};

pub(crate) struct TransferProgress {
    bar: ProgressBar,
}

impl TransferProgress {
    /// Starts progress rendering for one file. With `enabled` false the bar
    /// is hidden, which keeps call sites unconditional.
    pub(crate) fn start(file_name: &str, total: Option<u64>, enabled: bool) -> Self {
        let bar = if !enabled {
            ProgressBar::hidden()
        } else if let Some(total) = total {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template("{msg} [{bar:30}] {percent}%")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} {msg} {bytes}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        };
        bar.set_message(format!("Downloading {file_name}"));
        Self { bar }
    }

    /// Advances the bar by one chunk's worth of bytes.
    pub(crate) fn advance(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    /// Removes the bar from the terminal.
    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
