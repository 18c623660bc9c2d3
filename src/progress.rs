//! 進捗表示
//!
//! インポーターは [`ProgressReporter`] に現在位置を通知するだけで、
//! 表示結果が処理の流れに影響することはない。

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

pub trait ProgressReporter {
    /// `current` of `total` rows processed.
    fn report(&mut self, current: u64, total: u64, prefix: &str, suffix: &str);

    /// Called once after the last row.
    fn finish(&mut self) {}
}

/// Reports nothing (`--no-progress`, JSON output)
#[derive(Debug, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report(&mut self, _current: u64, _total: u64, _prefix: &str, _suffix: &str) {}
}

const BAR_TEMPLATE: &str = "{prefix}[{bar:20.cyan/blue}] {percent:>3}% {msg}";

/// indicatif progress bar on stderr
///
/// The bar is created on the first report so that its length is known.
/// Nothing is drawn when stderr is not a terminal.
pub struct BarProgress {
    draw_target: Option<ProgressDrawTarget>,
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            draw_target: Some(target),
            bar: None,
        }
    }

    fn bar(&mut self, total: u64) -> &ProgressBar {
        let draw_target = &mut self.draw_target;
        let bar = self.bar.get_or_insert_with(|| {
            let target = draw_target.take().unwrap_or_else(ProgressDrawTarget::hidden);
            let bar = ProgressBar::with_draw_target(Some(total), target);
            if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                bar.set_style(style.progress_chars("█▉ "));
            }
            bar
        });
        if bar.length() != Some(total) {
            bar.set_length(total);
        }
        bar
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarProgress {
    fn report(&mut self, current: u64, total: u64, prefix: &str, suffix: &str) {
        let bar = self.bar(total);
        bar.set_prefix(prefix.to_string());
        bar.set_message(suffix.to_string());
        bar.set_position(current);
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Records every report for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub reports: Vec<(u64, u64, String, String)>,
    pub finished: bool,
}

#[cfg(test)]
impl ProgressReporter for RecordingProgress {
    fn report(&mut self, current: u64, total: u64, prefix: &str, suffix: &str) {
        self.reports
            .push((current, total, prefix.to_string(), suffix.to_string()));
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
