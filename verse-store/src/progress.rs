//! Progress reporting for corpus embedding.
//!
//! `NoopProgress` for tests and headless runs, `IndicatifProgress` when the
//! process is attached to a terminal.

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

/// Minimal progress interface used while embedding the corpus.
pub trait Progress: Send + Sync {
    /// Set known total steps.
    fn set_total(&self, _n: u64) {}
    /// Advance by `n` steps and show a short message.
    fn advance(&self, _n: u64, _msg: &str) {}
    /// Finish the UI.
    fn finish(&self, _msg: &str) {}
}

/// No-op reporter.
#[derive(Default, Clone, Copy)]
pub struct NoopProgress;
impl Progress for NoopProgress {}

/// Indicatif-based bar.
pub struct IndicatifProgress {
    pb: ProgressBar,
}

impl IndicatifProgress {
    /// Bounded bar (known total).
    pub fn bar(len: u64) -> Self {
        let pb = ProgressBar::new(len);
        let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        Self { pb }
    }
}

impl Progress for IndicatifProgress {
    fn set_total(&self, n: u64) {
        self.pb.set_length(n);
    }
    fn advance(&self, n: u64, msg: &str) {
        self.pb.inc(n);
        self.pb.set_message(msg.to_string());
    }
    fn finish(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }
}

/// Bar on a TTY, nothing otherwise.
pub fn for_terminal(len: u64) -> Box<dyn Progress> {
    if std::io::stderr().is_terminal() {
        Box::new(IndicatifProgress::bar(len))
    } else {
        Box::new(NoopProgress)
    }
}
