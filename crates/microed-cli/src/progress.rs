use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use microed_core::pipeline::{PipelineStage, ProgressReporter};

/// Drives an indicatif bar from pipeline progress events.
pub struct BarReporter {
    bar: ProgressBar,
    stage: Mutex<Option<PipelineStage>>,
}

impl BarReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar().template("{msg:20} [{bar:40}] {pos}/{len}") {
            bar.set_style(style.progress_chars("=> "));
        }
        Self {
            bar,
            stage: Mutex::new(None),
        }
    }

    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        if let Ok(mut current) = self.stage.lock() {
            *current = Some(stage);
        }
        self.bar.set_message(stage.to_string());
        self.bar.set_length(total_items.unwrap_or(1) as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        if let Some(len) = self.bar.length() {
            self.bar.set_position(len);
        }
        if let Ok(current) = self.stage.lock() {
            if let Some(stage) = *current {
                tracing::debug!(%stage, "Stage finished");
            }
        }
    }
}
