// file: src/pipeline/progress.rs
// description: progress reporting and statistics for highlight imports
// reference: uses indicatif for progress bars

use crate::utils::telemetry::throughput;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportStats {
    pub extracted: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl ImportStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconciled(&self) -> usize {
        self.created + self.updated + self.skipped
    }

    pub fn highlights_per_second(&self) -> f64 {
        throughput(self.reconciled(), self.duration)
    }

    /// Share of reconciled highlights that were already up to date, in percent.
    pub fn unchanged_rate(&self) -> f64 {
        let total = self.reconciled();
        if total == 0 {
            return 0.0;
        }
        (self.skipped as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    created: AtomicUsize,
    updated: AtomicUsize,
    skipped: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self::with_color(total, true)
    }

    pub fn with_color(total: usize, colored: bool) -> Self {
        Self::build(MultiProgress::new(), total, colored)
    }

    /// A tracker that draws nothing, for tests and non-interactive runs.
    pub fn hidden(total: usize) -> Self {
        Self::build(
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            total,
            false,
        )
    }

    fn build(multi_progress: MultiProgress, total: usize, colored: bool) -> Self {
        let main_bar = create_progress_bar(&multi_progress, total as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            created: AtomicUsize::new(0),
            updated: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn inc_created(&self) {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.advance();
    }

    pub fn inc_updated(&self) {
        self.updated.fetch_add(1, Ordering::SeqCst);
        self.advance();
    }

    pub fn inc_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
        self.advance();
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Import complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> ImportStats {
        ImportStats {
            extracted: self.main_bar.length().unwrap_or(0) as usize,
            created: self.created.load(Ordering::SeqCst),
            updated: self.updated.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
            duration: self.start_time.elapsed(),
        }
    }

    fn advance(&self) {
        self.main_bar.inc(1);

        let message = format!(
            "New: {} | Updated: {} | Unchanged: {}",
            self.created.load(Ordering::SeqCst),
            self.updated.load(Ordering::SeqCst),
            self.skipped.load(Ordering::SeqCst)
        );
        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            "█▓▒░",
        )
    } else {
        ("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}", "=>-")
    };

    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        bar.set_style(style.progress_chars(chars));
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
