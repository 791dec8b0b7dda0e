// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use libmons::Progress;
use parking_lot::Mutex;

fn bytes_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  {msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("  {spinner:.cyan} {msg} {bytes}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// one bar per transfer, cleared when the transfer ends.
///
/// falls back to a spinner when the server sends no content length.
#[derive(Default)]
pub struct DownloadProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl Progress for DownloadProgress {
    fn start(&self, label: &str, total: Option<u64>) {
        let bar = match total {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(bytes_style());
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(spinner_style());
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            }
        };
        bar.set_message(label.to_string());

        if let Some(previous) = self.bar.lock().replace(bar) {
            previous.finish_and_clear();
        }
    }

    fn advance(&self, bytes: u64) {
        if let Some(bar) = self.bar.lock().as_ref() {
            bar.inc(bytes);
        }
    }

    fn finish(&self) {
        if let Some(bar) = self.bar.lock().take() {
            bar.finish_and_clear();
        }
    }
}
