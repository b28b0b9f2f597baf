// file: src/pipeline/progress.rs
// description: spinner reporting which pipeline step is running
// reference: uses indicatif for progress feedback during blocking service calls

use crate::utils::logging::format_step;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

pub const TOTAL_STEPS: usize = 4;

pub struct StepProgress {
    bar: ProgressBar,
    step: usize,
    total: usize,
}

impl StepProgress {
    pub fn new(total: usize, visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        } else {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        };

        Self {
            bar,
            step: 0,
            total,
        }
    }

    /// A requested spinner is only drawn when stderr is a terminal.
    pub fn should_draw(requested: bool) -> bool {
        requested && std::io::stderr().is_terminal()
    }

    pub fn hidden(total: usize) -> Self {
        Self::new(total, false)
    }

    pub fn advance(&mut self, message: &str) {
        self.step = (self.step + 1).min(self.total);
        self.bar
            .set_message(format_step(self.step, self.total, message));
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for StepProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
