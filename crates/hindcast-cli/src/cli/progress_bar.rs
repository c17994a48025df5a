//! Terminal progress bar fed by the batch reporter.

use hindcast_core::scheduler::{ProgressSink, ProgressStats};
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta}) {msg}";

pub struct BarSink {
    bar: ProgressBar,
}

impl BarSink {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .map(|s| s.progress_chars("##-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        let bar = ProgressBar::new(0);
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressSink for BarSink {
    fn start(&mut self, expected: u64) {
        self.bar.set_length(expected);
    }

    fn advance(&mut self, delta: u64, stats: &ProgressStats) {
        self.bar.inc(delta);
        if stats.failed > 0 {
            self.bar.set_message(format!("{} failed", stats.failed));
        }
    }

    fn finish(&mut self, stats: &ProgressStats) {
        self.bar.finish_with_message(format!("{} failed", stats.failed));
    }
}
